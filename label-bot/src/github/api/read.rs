use crate::Repository;
use crate::github::api::{HttpClient, Label, PullRequest};
use reqwest::Method;

pub(crate) trait GithubRead {
    /// Get the open pull requests of a repo
    fn open_pull_requests(&self, repo: &Repository) -> anyhow::Result<Vec<PullRequest>>;

    /// Get the names of the labels attached to a pull request
    fn labels_of(&self, repo: &Repository, pr: &PullRequest) -> anyhow::Result<Vec<String>>;
}

pub(crate) struct GitHubApiRead {
    client: HttpClient,
}

impl GitHubApiRead {
    pub(crate) fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

impl GithubRead for GitHubApiRead {
    fn open_pull_requests(&self, repo: &Repository) -> anyhow::Result<Vec<PullRequest>> {
        let mut pulls = Vec::new();

        self.client.rest_paginated(
            &Method::GET,
            format!("repos/{repo}/pulls?state=open&per_page=100"),
            |resp: Vec<PullRequest>| {
                pulls.extend(resp);
                Ok(())
            },
        )?;

        Ok(pulls)
    }

    fn labels_of(&self, repo: &Repository, pr: &PullRequest) -> anyhow::Result<Vec<String>> {
        let mut labels = Vec::new();

        self.client.rest_paginated(
            &Method::GET,
            format!("repos/{repo}/issues/{}/labels?per_page=100", pr.number),
            |resp: Vec<Label>| {
                labels.extend(resp.into_iter().map(|l| l.name));
                Ok(())
            },
        )?;

        Ok(labels)
    }
}
