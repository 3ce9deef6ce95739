//! Types of the static JSON API generated by `cockpit-testmap static-api`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Contexts run on pull requests against each branch.
    pub branches: IndexMap<String, Vec<String>>,
    /// Contexts that only run when triggered by hand.
    pub manual: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projects {
    #[serde(flatten)]
    pub projects: IndexMap<String, Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    /// Set for Atomic images, which are built in a sibling image.
    pub build_image: Option<String>,
    /// Qualified contexts to run when the image is refreshed, sorted.
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomicBuildImages {
    #[serde(flatten)]
    pub images: IndexMap<String, String>,
}
