use crate::data::Data;
use anyhow::Error;
use indexmap::IndexMap;
use log::info;
use std::path::Path;
use testmap_data::{is_pseudo_branch, v1};

pub(crate) struct Generator<'a> {
    dest: &'a Path,
    data: &'a Data,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(dest: &'a Path, data: &'a Data) -> Result<Generator<'a>, Error> {
        if dest.is_dir() {
            std::fs::remove_dir_all(dest)?;
        }
        std::fs::create_dir_all(dest)?;

        Ok(Generator { dest, data })
    }

    pub(crate) fn generate(&self) -> Result<(), Error> {
        self.generate_projects()?;
        self.generate_atomic_build_images()?;
        self.generate_images()?;
        Ok(())
    }

    fn generate_projects(&self) -> Result<(), Error> {
        let testmap = self.data.testmap();
        let mut projects = IndexMap::new();

        for name in testmap.projects() {
            let mut branches = IndexMap::new();
            let mut manual = Vec::new();
            for (branch, contexts) in testmap.tests_for_project(name) {
                if is_pseudo_branch(&branch) {
                    manual.extend(contexts);
                } else {
                    branches.insert(branch, contexts);
                }
            }
            projects.insert(
                name.to_string(),
                v1::Project {
                    name: name.to_string(),
                    branches,
                    manual,
                },
            );
        }

        self.add("v1/projects.json", &v1::Projects { projects })?;
        Ok(())
    }

    fn generate_atomic_build_images(&self) -> Result<(), Error> {
        let mut images = self.data.testmap().atomic_build_images().clone();
        images.sort_keys();
        self.add(
            "v1/atomic-build-images.json",
            &v1::AtomicBuildImages { images },
        )?;
        Ok(())
    }

    fn generate_images(&self) -> Result<(), Error> {
        let testmap = self.data.testmap();
        for name in testmap.images() {
            let image = v1::Image {
                name: name.to_string(),
                build_image: testmap.build_image_of(name).map(|i| i.to_string()),
                contexts: testmap.tests_for_image(name).into_iter().collect(),
            };
            self.add(&format!("v1/images/{}.json", name), &image)?;
        }
        Ok(())
    }

    fn add<T: serde::Serialize>(&self, path: &str, obj: &T) -> Result<(), Error> {
        info!("writing API object {}...", path);
        let dest = self.dest.join(path);
        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(obj)?;
        std::fs::write(&dest, json.as_bytes())?;
        Ok(())
    }
}
