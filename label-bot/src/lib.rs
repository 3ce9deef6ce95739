mod github;
mod utils;

pub use crate::github::api::{ApiError, ApiErrorKind};

use crate::github::api::GitHubWrite;
use crate::github::{GitHubApiRead, HttpClient, label_all};
use anyhow::bail;
use log::{info, warn};
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

const USER_AGENT: &str = "cockpit bots (https://github.com/cockpit-project/bots)";

pub const DEFAULT_REPO: &str = "cockpit-project/cockpit";
pub const DEFAULT_LABEL: &str = "needs-rebase";
pub const DEFAULT_COMMENT: &str = "Needs to rebase to master since #12367 changed tests names";

/// A GitHub repository, `org/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub org: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.split_once('/') {
            Some((org, name)) if !org.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Repository {
                    org: org.to_string(),
                    name: name.to_string(),
                })
            }
            _ => bail!("`{s}` is not of the form `org/repo`"),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.name)
    }
}

/// Put a label on every open pull request of a repository, and explain why in
/// a comment.
#[derive(Debug, Clone)]
pub struct LabelAll {
    pub repo: Repository,
    pub label: String,
    pub comment: String,
}

pub fn run_label_all(
    token: SecretString,
    config: &LabelAll,
    dry_run: bool,
    only_print_plan: bool,
) -> anyhow::Result<()> {
    if dry_run {
        warn!("label-bot is running in dry mode, no changes will be applied.");
    }

    info!("looking for open pull requests in {}", config.repo);
    let client = HttpClient::from_token(&token)?;
    let gh_read = GitHubApiRead::from_client(client.clone());
    let gh_write = GitHubWrite::new(client, dry_run);
    let labeled = label_all(&gh_read, &gh_write, config, only_print_plan)?;
    if labeled > 0 && !dry_run {
        info!("labeled {labeled} pull requests");
    }

    Ok(())
}
