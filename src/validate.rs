use crate::data::Data;
use anyhow::{bail, Error};
use log::{error, warn};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use testmap_data::{image_of, is_pseudo_branch, QualifiedContext, DEFAULT_BRANCH};

#[allow(clippy::type_complexity)]
static CHECKS: &[(&str, fn(&Data, &mut Vec<String>))] = &[
    ("validate_project_names", validate_project_names),
    ("validate_branches", validate_branches),
    ("validate_contexts", validate_contexts),
    ("validate_image_names", validate_image_names),
    ("validate_duplicate_contexts", validate_duplicate_contexts),
    ("validate_atomic_build_images", validate_atomic_build_images),
    ("validate_refresh_triggers", validate_refresh_triggers),
];

pub(crate) fn validate(data: &Data, skip: &[&str]) -> Result<(), Error> {
    for name in skip {
        if !CHECKS.iter().any(|(check, _)| check == name) {
            bail!("unknown validation step: {}", name);
        }
    }

    let mut errors = Vec::new();
    for (name, check) in CHECKS {
        if skip.contains(name) {
            warn!("skipped check: {}", name);
            continue;
        }
        check(data, &mut errors);
    }

    if !errors.is_empty() {
        errors.sort();
        errors.dedup();
        for err in &errors {
            error!("validation error: {}", err);
        }

        bail!("{} validation errors found", errors.len());
    }

    Ok(())
}

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

/// Ensure projects are named like GitHub repositories
fn validate_project_names(data: &Data, errors: &mut Vec<String>) {
    for project in data.testmap().projects() {
        if !PROJECT_NAME.is_match(project) {
            errors.push(format!(
                "project `{}` is not of the form `org/repo`",
                project
            ));
        }
    }
}

/// Ensure every project tests its default branch and branch names are sane
fn validate_branches(data: &Data, errors: &mut Vec<String>) {
    for project in data.testmap().projects() {
        let branches = data.testmap().tests_for_project(project);
        if !branches.contains_key(DEFAULT_BRANCH) {
            errors.push(format!(
                "project `{}` has no `{}` branch",
                project, DEFAULT_BRANCH
            ));
        }
        for branch in branches.keys() {
            if branch.trim().is_empty() || branch == "_" {
                errors.push(format!("project `{}` has an empty branch name", project));
            }
        }
    }
}

/// Ensure contexts name an image and can be qualified unambiguously
fn validate_contexts(data: &Data, errors: &mut Vec<String>) {
    for (project, branch, context) in data.testmap().contexts() {
        if image_of(context).is_empty() {
            errors.push(format!(
                "context `{}` in `{}` branch `{}` doesn't name an image",
                context, project, branch
            ));
        }
        if context.contains('@') {
            errors.push(format!(
                "context `{}` in `{}` branch `{}` contains `@`",
                context, project, branch
            ));
        }
        if context.chars().any(char::is_whitespace) {
            errors.push(format!(
                "context `{}` in `{}` branch `{}` contains whitespace",
                context, project, branch
            ));
        }
    }
}

/// Image names end up in file names of the static API, and in contexts.
fn image_name_problem(image: &str) -> Option<&'static str> {
    if image.is_empty() {
        Some("is empty")
    } else if image.contains('/') {
        Some("contains `/`")
    } else if image.contains('@') {
        Some("contains `@`")
    } else if image.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if image.contains("..") {
        Some("contains `..`")
    } else {
        None
    }
}

/// Ensure the image names of the Atomic and refresh trigger tables are usable
fn validate_image_names(data: &Data, errors: &mut Vec<String>) {
    let testmap = data.testmap();
    let mut check = |image: &str, table: &str| {
        if let Some(problem) = image_name_problem(image) {
            errors.push(format!("image `{}` in `[{}]` {}", image, table, problem));
        }
    };
    for (atomic, build) in testmap.atomic_build_images() {
        check(atomic, "atomic-build-images");
        check(build, "atomic-build-images");
    }
    for image in testmap.image_refresh_triggers().keys() {
        check(image, "image-refresh-triggers");
    }
    for (project, branch, context) in testmap.contexts() {
        if image_of(context).contains("..") {
            errors.push(format!(
                "context `{}` in `{}` branch `{}` contains `..`",
                context, project, branch
            ));
        }
    }
}

/// Ensure a context isn't listed twice for the same branch
fn validate_duplicate_contexts(data: &Data, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for (project, branch, context) in data.testmap().contexts() {
        if !seen.insert((project, branch, context)) {
            errors.push(format!(
                "context `{}` is listed more than once in `{}` branch `{}`",
                context, project, branch
            ));
        }
    }
}

/// Ensure the Atomic build images resolve one level deep and unambiguously
fn validate_atomic_build_images(data: &Data, errors: &mut Vec<String>) {
    let atomics = data.testmap().atomic_build_images();
    let mut build_images: HashMap<&str, &str> = HashMap::new();
    for (atomic, build) in atomics {
        if atomic == build {
            errors.push(format!("Atomic image `{}` is built in itself", atomic));
        } else if atomics.contains_key(build) {
            errors.push(format!(
                "Atomic image `{}` is built in `{}`, which is an Atomic image too",
                atomic, build
            ));
        }
        if let Some(other) = build_images.insert(build, atomic) {
            errors.push(format!(
                "Atomic images `{}` and `{}` are both built in `{}`",
                other, atomic, build
            ));
        }
    }
}

/// Ensure refresh triggers point to registered projects and branches
fn validate_refresh_triggers(data: &Data, errors: &mut Vec<String>) {
    for (image, triggers) in data.testmap().image_refresh_triggers() {
        if triggers.is_empty() {
            errors.push(format!("image `{}` has no refresh triggers", image));
        }
        for trigger in triggers {
            let qualified: QualifiedContext = match trigger.parse() {
                Ok(qualified) => qualified,
                Err(err) => {
                    errors.push(format!("refresh trigger of image `{}`: {}", image, err));
                    continue;
                }
            };
            let branches = data.testmap().tests_for_project(&qualified.project);
            if branches.is_empty() {
                errors.push(format!(
                    "refresh trigger `{}` of image `{}` refers to the unknown project `{}`",
                    trigger, image, qualified.project
                ));
            } else if is_pseudo_branch(&qualified.branch) {
                errors.push(format!(
                    "refresh trigger `{}` of image `{}` refers to the pseudo-branch `{}`",
                    trigger, image, qualified.branch
                ));
            } else if !branches.contains_key(&qualified.branch) {
                errors.push(format!(
                    "refresh trigger `{}` of image `{}` refers to the unknown branch `{}`",
                    trigger, image, qualified.branch
                ));
            }
        }
    }
}
