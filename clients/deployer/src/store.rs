use std::path::{Path, PathBuf};

use crate::artifact::Artifact;
use crate::error::{DeployError, Result};

/// Looks up `<name>.json` artifacts in an ordered list of directories.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    roots: Vec<PathBuf>,
}

impl ArtifactStore {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Loads the first `<root>/<name>.json` found.
    pub fn load(&self, name: &str) -> Result<Artifact> {
        let path = self
            .roots
            .iter()
            .map(|root| root.join(format!("{}.json", name)))
            .find(|path| path.is_file())
            .ok_or_else(|| DeployError::NotFound(name.to_string()))?;
        load_file(name, &path)
    }
}

fn load_file(name: &str, path: &Path) -> Result<Artifact> {
    let json = std::fs::read_to_string(path).map_err(|source| DeployError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Artifact::from_json(name, &json).map_err(|source| DeployError::Json {
        path: path.to_path_buf(),
        source,
    })
}
