use anyhow::{Context as _, Error};
use serde::de::DeserializeOwned;
use std::path::Path;
use testmap_data::TestMap;

/// The production test map, compiled into the binary.
static BUILTIN_TESTMAP: &str = include_str!("../testmap.toml");

#[derive(Debug)]
pub(crate) struct Data {
    testmap: TestMap,
}

impl Data {
    /// Loads the test map from `path`, or the built-in one when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, Error> {
        let testmap = match path {
            Some(path) => load_file(path)?,
            None => toml::from_str(BUILTIN_TESTMAP).context("failed to parse the built-in test map")?,
        };
        Ok(Data { testmap })
    }

    pub(crate) fn testmap(&self) -> &TestMap {
        &self.testmap
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed)
}
