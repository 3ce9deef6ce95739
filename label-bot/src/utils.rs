use crate::github::api::ApiError;
use anyhow::Context;
use reqwest::Method;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use std::str::FromStr;

pub trait ResponseExt {
    fn api_error_for_status(self, method: &Method) -> Result<Response, ApiError>;
    fn json_annotated<T: DeserializeOwned>(self) -> anyhow::Result<T>;
}

impl ResponseExt for Response {
    /// Turns non-success responses into an [`ApiError`] that carries the body,
    /// which usually explains what GitHub didn't like.
    fn api_error_for_status(self, method: &Method) -> Result<Response, ApiError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }
        let url = self.url().to_string();
        let rate_limit_exhausted = self
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        let body = self.text().unwrap_or_default();
        Err(ApiError::from_status(
            method.clone(),
            url,
            status,
            rate_limit_exhausted,
            body,
        ))
    }

    /// Try to load the response as JSON. If it fails, include the response body
    /// as text in the error message, so that it is easier to understand what was
    /// the problem.
    fn json_annotated<T: DeserializeOwned>(self) -> anyhow::Result<T> {
        let text = self.text()?;

        serde_json::from_str::<T>(&text).with_context(|| {
            // Try to at least deserialize as generic JSON, to provide a more readable
            // visualization of the response body.
            let body_content = serde_json::Value::from_str(&text)
                .and_then(|v| serde_json::to_string_pretty(&v))
                .unwrap_or(text);

            format!(
                "Cannot deserialize type `{}` from the following response body:\n{body_content}",
                std::any::type_name::<T>(),
            )
        })
    }
}
