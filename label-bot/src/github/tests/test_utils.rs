use std::collections::HashMap;

use derive_builder::Builder;
use secrecy::SecretString;

use crate::github::api::{GitHubWrite, GithubRead, PullRequest};
use crate::github::{HttpClient, LabelPlan, create_plan, label_all};
use crate::{DEFAULT_COMMENT, DEFAULT_LABEL, DEFAULT_REPO, LabelAll, Repository};

/// Represents the open pull requests of the repository.
/// In tests, you should fill the model with pull requests and their labels,
/// and then call `gh_model` to construct a corresponding GitHub mock.
/// After that, you can modify the data model further, then generate a plan
/// and assert that it has the expected value.
#[derive(Default, Clone)]
pub struct RepoModel {
    pulls: Vec<PullRequestData>,
}

impl RepoModel {
    pub fn create_pull(&mut self, pr: PullRequestDataBuilder) {
        let pr = pr.build().expect("Cannot build pull request");
        self.pulls.push(pr);
    }

    pub fn get_pull(&mut self, number: u64) -> &mut PullRequestData {
        self.pulls
            .iter_mut()
            .find(|pr| pr.number == number)
            .expect("Pull request not found")
    }

    /// Creates a GitHub model from the current pull requests.
    pub fn gh_model(&self) -> GithubMock {
        let pulls = self
            .pulls
            .iter()
            .map(|pr| PullRequest {
                number: pr.number,
                title: pr.title.clone(),
                author: pr.author.clone(),
            })
            .collect();
        let labels = self
            .pulls
            .iter()
            .map(|pr| (pr.number, pr.labels.clone()))
            .collect();

        GithubMock { pulls, labels }
    }

    pub fn plan(&self, github: GithubMock) -> LabelPlan {
        create_plan(&github, &default_config()).expect("Cannot create plan")
    }

    pub fn label_all(
        &self,
        github: GithubMock,
        writer: &GitHubWrite,
        only_print_plan: bool,
    ) -> anyhow::Result<usize> {
        label_all(&github, writer, &default_config(), only_print_plan)
    }
}

/// A writer with a token GitHub would reject, so any request it actually
/// sends fails.
pub fn writer(dry_run: bool) -> GitHubWrite {
    let token = SecretString::from("ghp_not_a_real_token".to_string());
    let client = HttpClient::from_token(&token).expect("Cannot build client");
    GitHubWrite::new(client, dry_run)
}

pub fn default_config() -> LabelAll {
    LabelAll {
        repo: DEFAULT_REPO.parse().unwrap(),
        label: DEFAULT_LABEL.to_string(),
        comment: DEFAULT_COMMENT.to_string(),
    }
}

#[derive(Clone, Builder)]
#[builder(pattern = "owned")]
pub struct PullRequestData {
    number: u64,
    #[builder(default = "Fix the tests".to_string())]
    title: String,
    #[builder(default = "martinpitt".to_string())]
    author: String,
    #[builder(default)]
    labels: Vec<String>,
}

impl PullRequestData {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(number: u64) -> PullRequestDataBuilder {
        PullRequestDataBuilder::default().number(number)
    }

    pub fn add_label(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }
}

impl PullRequestDataBuilder {
    pub fn label(mut self, label: &str) -> Self {
        let mut labels = self.labels.clone().unwrap_or_default();
        labels.push(label.to_string());
        self.labels = Some(labels);
        self
    }
}

/// Pull requests and their labels, as GitHub would report them.
pub struct GithubMock {
    pulls: Vec<PullRequest>,
    labels: HashMap<u64, Vec<String>>,
}

impl GithubMock {
    pub fn close_pull(&mut self, number: u64) {
        self.pulls.retain(|pr| pr.number != number);
    }

    pub fn add_label(&mut self, number: u64, label: &str) {
        self.labels
            .entry(number)
            .or_default()
            .push(label.to_string());
    }
}

impl GithubRead for GithubMock {
    fn open_pull_requests(&self, repo: &Repository) -> anyhow::Result<Vec<PullRequest>> {
        assert_eq!(repo.to_string(), DEFAULT_REPO);
        Ok(self.pulls.clone())
    }

    fn labels_of(&self, _repo: &Repository, pr: &PullRequest) -> anyhow::Result<Vec<String>> {
        Ok(self.labels.get(&pr.number).cloned().unwrap_or_default())
    }
}
