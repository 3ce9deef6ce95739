use crate::context::{image_of, is_pseudo_branch, qualify, SELF_TEST_CONTEXT};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Branch name -> contexts, in authored order.
pub type BranchContexts = IndexMap<String, Vec<String>>;

/// The registry of test contexts.
///
/// Loaded once and never mutated afterwards: every query takes `&self` and is
/// free of side effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TestMap {
    #[serde(default)]
    projects: IndexMap<String, BranchContexts>,
    /// The Atomic variants can't build their own packages, so they are built
    /// in their non-Atomic siblings.
    #[serde(default)]
    atomic_build_images: IndexMap<String, String>,
    /// Only auxiliary images belong here, triggers for the OS images are
    /// computed from `projects`.
    #[serde(default)]
    image_refresh_triggers: IndexMap<String, Vec<String>>,
}

impl TestMap {
    pub fn new(
        projects: IndexMap<String, BranchContexts>,
        atomic_build_images: IndexMap<String, String>,
        image_refresh_triggers: IndexMap<String, Vec<String>>,
    ) -> Self {
        TestMap {
            projects,
            atomic_build_images,
            image_refresh_triggers,
        }
    }

    /// All projects we run tests for.
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(|p| p.as_str())
    }

    /// The branch -> contexts map of a project, empty when the project is unknown.
    pub fn tests_for_project(&self, project: &str) -> BranchContexts {
        self.projects.get(project).cloned().unwrap_or_default()
    }

    pub fn atomic_build_images(&self) -> &IndexMap<String, String> {
        &self.atomic_build_images
    }

    pub fn image_refresh_triggers(&self) -> &IndexMap<String, Vec<String>> {
        &self.image_refresh_triggers
    }

    /// Every (project, branch, context) triple, pseudo-branches included.
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.projects.iter().flat_map(|(project, branches)| {
            branches.iter().flat_map(move |(branch, contexts)| {
                contexts
                    .iter()
                    .map(move |context| (project.as_str(), branch.as_str(), context.as_str()))
            })
        })
    }

    /// Contexts of a project that only run when triggered by hand.
    pub fn manual_contexts(&self, project: &str) -> Vec<&str> {
        self.projects
            .get(project)
            .into_iter()
            .flatten()
            .filter(|(branch, _)| is_pseudo_branch(branch))
            .flat_map(|(_, contexts)| contexts.iter().map(|c| c.as_str()))
            .collect()
    }

    /// The image the packages of an Atomic image are built in.
    pub fn build_image_of(&self, atomic: &str) -> Option<&str> {
        self.atomic_build_images.get(atomic).map(|i| i.as_str())
    }

    /// Every image named anywhere in the map.
    pub fn images(&self) -> BTreeSet<&str> {
        let mut images: BTreeSet<&str> = self.contexts().map(|(_, _, c)| image_of(c)).collect();
        for (atomic, build) in &self.atomic_build_images {
            images.insert(atomic);
            images.insert(build);
        }
        images.extend(self.image_refresh_triggers.keys().map(|i| i.as_str()));
        images
    }

    /// The qualified contexts that must run when `image` is refreshed.
    ///
    /// Always contains [`SELF_TEST_CONTEXT`], so an unknown image yields just
    /// that.
    pub fn tests_for_image(&self, image: &str) -> BTreeSet<String> {
        let mut tests = BTreeSet::new();
        self.collect_image_tests(image, &mut Vec::new(), &mut tests);
        tests.insert(SELF_TEST_CONTEXT.to_string());
        tests
    }

    fn collect_image_tests<'a>(
        &'a self,
        image: &'a str,
        visiting: &mut Vec<&'a str>,
        tests: &mut BTreeSet<String>,
    ) {
        if visiting.contains(&image) {
            return;
        }
        visiting.push(image);

        if let Some(triggers) = self.image_refresh_triggers.get(image) {
            tests.extend(triggers.iter().cloned());
        }

        for (project, branch, context) in self.contexts() {
            if is_pseudo_branch(branch) {
                continue;
            }
            if image_of(context) == image {
                tests.insert(qualify(context, project, branch));
            }
        }

        // A build image for Atomic also has to pass the Atomic tests.
        for (atomic, build) in &self.atomic_build_images {
            if build == image {
                self.collect_image_tests(atomic, visiting, tests);
            }
        }

        visiting.pop();
    }
}
