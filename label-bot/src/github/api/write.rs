use log::debug;
use reqwest::Method;

use crate::Repository;
use crate::github::api::{ApiError, HttpClient};

pub(crate) struct GitHubWrite {
    client: HttpClient,
    dry_run: bool,
}

impl GitHubWrite {
    pub(crate) fn new(client: HttpClient, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Replace all the labels of a pull request
    pub(crate) fn set_labels(
        &self,
        repo: &Repository,
        number: u64,
        labels: &[String],
    ) -> Result<(), ApiError> {
        #[derive(serde::Serialize, Debug)]
        struct Req<'a> {
            labels: &'a [String],
        }
        debug!("Setting the labels of {repo}#{number} to {labels:?}");
        if !self.dry_run {
            self.client.send(
                Method::PUT,
                &format!("repos/{repo}/issues/{number}/labels"),
                &Req { labels },
            )?;
        }

        Ok(())
    }

    /// Comment on a pull request
    pub(crate) fn add_comment(
        &self,
        repo: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        #[derive(serde::Serialize, Debug)]
        struct Req<'a> {
            body: &'a str,
        }
        debug!("Commenting on {repo}#{number}: {body}");
        if !self.dry_run {
            self.client.send(
                Method::POST,
                &format!("repos/{repo}/issues/{number}/comments"),
                &Req { body },
            )?;
        }

        Ok(())
    }
}
