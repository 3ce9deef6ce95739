pub(crate) mod api;
#[cfg(test)]
mod tests;

use crate::github::api::{GitHubWrite, GithubRead};
use crate::{LabelAll, Repository};
use log::{debug, info};

pub(crate) use self::api::{GitHubApiRead, HttpClient};

/// Plans the labeling of a repository and, unless only the plan is wanted,
/// applies it. Returns the number of pull requests that were labeled.
pub(crate) fn label_all(
    github: &dyn GithubRead,
    writer: &GitHubWrite,
    config: &LabelAll,
    only_print_plan: bool,
) -> anyhow::Result<usize> {
    let plan = create_plan(github, config)?;
    if plan.is_empty() {
        info!("every open pull request already has the `{}` label", config.label);
        return Ok(0);
    }
    plan.log();

    if only_print_plan {
        return Ok(0);
    }
    plan.apply(writer)
}

/// Works out which open pull requests still lack the label.
pub(crate) fn create_plan(github: &dyn GithubRead, config: &LabelAll) -> anyhow::Result<LabelPlan> {
    let mut pulls = Vec::new();
    for pr in github.open_pull_requests(&config.repo)? {
        let mut labels = github.labels_of(&config.repo, &pr)?;
        if labels.contains(&config.label) {
            debug!(
                "{}#{} already has the `{}` label",
                config.repo, pr.number, config.label
            );
            continue;
        }
        labels.push(config.label.clone());
        pulls.push(LabelPullRequest {
            number: pr.number,
            title: pr.title,
            author: pr.author,
            labels,
            comment: config.comment.clone(),
        });
    }

    Ok(LabelPlan {
        repo: config.repo.clone(),
        pulls,
    })
}

#[derive(Debug)]
pub(crate) struct LabelPlan {
    repo: Repository,
    pulls: Vec<LabelPullRequest>,
}

impl LabelPlan {
    pub(crate) fn is_empty(&self) -> bool {
        self.pulls.is_empty()
    }

    pub(crate) fn apply(self, github: &GitHubWrite) -> anyhow::Result<usize> {
        let count = self.pulls.len();
        for pr in self.pulls {
            pr.apply(&self.repo, github)?;
        }

        Ok(count)
    }

    /// Print out the plan to the logs
    pub(crate) fn log(&self) {
        for pr in &self.pulls {
            pr.log(&self.repo);
        }
    }
}

#[derive(Debug)]
struct LabelPullRequest {
    number: u64,
    title: String,
    author: String,
    /// The complete set of labels after the change
    labels: Vec<String>,
    comment: String,
}

impl LabelPullRequest {
    fn apply(self, repo: &Repository, github: &GitHubWrite) -> anyhow::Result<()> {
        github.set_labels(repo, self.number, &self.labels)?;
        github.add_comment(repo, self.number, &self.comment)?;
        Ok(())
    }

    fn log(&self, repo: &Repository) {
        info!("🏷️ Labeling pull request {}#{}:", repo, self.number);
        info!("  Title: {}", self.title);
        info!("  Author: {}", self.author);
        info!("  Labels: {}", self.labels.join(", "));
        info!("  Comment: {}", self.comment);
    }
}
