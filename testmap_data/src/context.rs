use std::fmt;
use std::str::FromStr;

/// The branch whose contexts are qualified without a branch suffix.
pub const DEFAULT_BRANCH: &str = "master";

/// The bots' own unit test, required for every image refresh.
pub const SELF_TEST_CONTEXT: &str = "host";

const PSEUDO_BRANCH_PREFIX: char = '_';

/// Pseudo-branches such as `_manual` hold contexts that only run when somebody
/// explicitly triggers them.
pub fn is_pseudo_branch(branch: &str) -> bool {
    branch.starts_with(PSEUDO_BRANCH_PREFIX)
}

/// Splits a context like `fedora-30/selenium-chrome` into its image and
/// optional variant. Everything after the first `/` is the variant.
pub fn split_context(context: &str) -> (&str, Option<&str>) {
    match context.split_once('/') {
        Some((image, variant)) => (image, Some(variant)),
        None => (context, None),
    }
}

pub fn image_of(context: &str) -> &str {
    split_context(context).0
}

/// Builds `context@project`, or `context@project/branch` for anything but the
/// default branch.
pub fn qualify(context: &str, project: &str, branch: &str) -> String {
    if branch == DEFAULT_BRANCH {
        format!("{context}@{project}")
    } else {
        format!("{context}@{project}/{branch}")
    }
}

/// A parsed `context@org/repo[/branch]` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedContext {
    pub context: String,
    pub project: String,
    pub branch: String,
}

impl QualifiedContext {
    pub fn new(context: &str, project: &str, branch: &str) -> Self {
        QualifiedContext {
            context: context.to_string(),
            project: project.to_string(),
            branch: branch.to_string(),
        }
    }

    pub fn image(&self) -> &str {
        image_of(&self.context)
    }
}

impl fmt::Display for QualifiedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&qualify(&self.context, &self.project, &self.branch))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQualifiedContextError(String);

impl fmt::Display for ParseQualifiedContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not of the form `context@org/repo[/branch]`",
            self.0
        )
    }
}

impl std::error::Error for ParseQualifiedContextError {}

impl FromStr for QualifiedContext {
    type Err = ParseQualifiedContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQualifiedContextError(s.to_string());
        let (context, target) = s.split_once('@').ok_or_else(err)?;
        let mut parts = target.splitn(3, '/');
        let org = parts.next().filter(|p| !p.is_empty()).ok_or_else(err)?;
        let repo = parts.next().filter(|p| !p.is_empty()).ok_or_else(err)?;
        let branch = match parts.next() {
            Some("") => return Err(err()),
            Some(branch) => branch,
            None => DEFAULT_BRANCH,
        };
        if context.is_empty() {
            return Err(err());
        }
        Ok(QualifiedContext::new(context, &format!("{org}/{repo}"), branch))
    }
}
