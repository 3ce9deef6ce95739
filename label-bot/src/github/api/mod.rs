mod read;
mod write;

use crate::utils::ResponseExt;
use hyper_old_types::header::{Link, RelationType};
use log::trace;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{
    Method, StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use std::borrow::Cow;
use std::fmt;

pub(crate) use read::{GitHubApiRead, GithubRead};
pub(crate) use write::GitHubWrite;

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub(crate) fn from_token(token: &SecretString) -> anyhow::Result<Self> {
        let mut map = HeaderMap::default();
        let mut auth = HeaderValue::from_str(&format!("token {}", token.expose_secret()))?;
        auth.set_sensitive(true);

        map.insert(header::AUTHORIZATION, auth);
        map.insert(
            header::USER_AGENT,
            HeaderValue::from_static(crate::USER_AGENT),
        );
        map.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        Ok(Self {
            client: reqwest::blocking::ClientBuilder::default()
                .default_headers(map)
                .build()?,
        })
    }

    fn req(&self, method: Method, url: &str) -> RequestBuilder {
        let url = api_url(url);
        trace!("http request: {} {}", method, url);
        self.client.request(method, url.as_ref())
    }

    fn execute(&self, method: &Method, url: &str, req: RequestBuilder) -> Result<Response, ApiError> {
        req.send()
            .map_err(|err| ApiError::from_transport(method.clone(), api_url(url).into_owned(), err))?
            .api_error_for_status(method)
    }

    pub(crate) fn send<T: serde::Serialize + fmt::Debug>(
        &self,
        method: Method,
        url: &str,
        body: &T,
    ) -> Result<Response, ApiError> {
        let req = self.req(method.clone(), url).json(body);
        self.execute(&method, url, req)
    }

    pub(crate) fn rest_paginated<F, T>(
        &self,
        method: &Method,
        url: String,
        mut f: F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(Vec<T>) -> anyhow::Result<()>,
        T: DeserializeOwned,
    {
        let mut next = Some(url);
        while let Some(next_url) = next.take() {
            let resp = self.execute(method, &next_url, self.req(method.clone(), &next_url))?;

            // Extract the next page
            if let Some(links) = resp.headers().get(header::LINK) {
                let links: Link = links.to_str()?.parse()?;
                for link in links.values() {
                    if link
                        .rel()
                        .map(|r| r.iter().any(|r| *r == RelationType::Next))
                        .unwrap_or(false)
                    {
                        next = Some(link.link().to_string());
                        break;
                    }
                }
            }

            f(resp.json_annotated()?)?;
        }
        Ok(())
    }
}

fn api_url(url: &str) -> Cow<'_, str> {
    if url.starts_with("https://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("https://api.github.com/{url}"))
    }
}

/// Whether retrying a failed request later can succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network trouble, rate limits and server errors.
    Transient,
    /// Authentication, permission and other client errors.
    Permanent,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiErrorKind::Transient => write!(f, "transient"),
            ApiErrorKind::Permanent => write!(f, "permanent"),
        }
    }
}

/// A failed call to the GitHub API.
#[derive(Debug, thiserror::Error)]
#[error("{kind} failure on {method} request to '{url}': {message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    method: Method,
    url: String,
    status: Option<StatusCode>,
    message: String,
    #[source]
    source: Option<reqwest::Error>,
}

impl ApiError {
    pub(crate) fn from_status(
        method: Method,
        url: String,
        status: StatusCode,
        rate_limit_exhausted: bool,
        body: String,
    ) -> Self {
        ApiError {
            kind: classify_status(status, rate_limit_exhausted),
            method,
            url,
            status: Some(status),
            message: format!("{status}, body: {body:?}"),
            source: None,
        }
    }

    pub(crate) fn from_transport(method: Method, url: String, err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            ApiErrorKind::Permanent
        } else {
            ApiErrorKind::Transient
        };
        ApiError {
            kind,
            method,
            url,
            status: err.status(),
            message: "the request could not be sent".to_string(),
            source: Some(err),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ApiErrorKind::Transient
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

fn classify_status(status: StatusCode, rate_limit_exhausted: bool) -> ApiErrorKind {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ApiErrorKind::Transient
    } else if status == StatusCode::FORBIDDEN && rate_limit_exhausted {
        // GitHub reports the primary rate limit as a 403
        ApiErrorKind::Transient
    } else {
        ApiErrorKind::Permanent
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct PullRequest {
    pub(crate) number: u64,
    pub(crate) title: String,
    #[serde(rename = "user", deserialize_with = "login")]
    pub(crate) author: String,
}

fn login<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let user = Login::deserialize(deserializer)?;
    Ok(user.login)
}

/// An object with a `login` field
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct Login {
    login: String,
}

/// A label as returned by the issues API
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Label {
    pub(crate) name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(classify_status(status, false), ApiErrorKind::Transient);
        }
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, true),
            ApiErrorKind::Transient
        );
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert_eq!(classify_status(status, false), ApiErrorKind::Permanent);
        }
    }

    #[test]
    fn error_message() {
        let err = ApiError::from_status(
            Method::PUT,
            "https://api.github.com/repos/cockpit-project/cockpit/issues/1/labels".to_string(),
            StatusCode::UNAUTHORIZED,
            false,
            "{\"message\":\"Bad credentials\"}".to_string(),
        );
        assert!(!err.is_transient());
        assert_eq!(err.kind(), ApiErrorKind::Permanent);
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        insta::assert_snapshot!(err, @r#"permanent failure on PUT request to 'https://api.github.com/repos/cockpit-project/cockpit/issues/1/labels': 401 Unauthorized, body: "{\"message\":\"Bad credentials\"}""#);
    }

    #[test]
    fn pull_request_from_json() {
        let pr: PullRequest = serde_json::from_str(
            r#"{
                "number": 12400,
                "title": "shell: Fix the navigation",
                "state": "open",
                "user": { "login": "martinpitt", "id": 1 },
                "labels": [{ "name": "bot" }]
            }"#,
        )
        .unwrap();
        assert_eq!(
            pr,
            PullRequest {
                number: 12400,
                title: "shell: Fix the navigation".to_string(),
                author: "martinpitt".to_string(),
            }
        );
    }

    #[test]
    fn urls_are_relative_to_the_api() {
        assert_eq!(
            api_url("repos/weldr/lorax/pulls"),
            "https://api.github.com/repos/weldr/lorax/pulls"
        );
        assert_eq!(
            api_url("https://api.github.com/repositories/1/pulls?page=2"),
            "https://api.github.com/repositories/1/pulls?page=2"
        );
    }
}
