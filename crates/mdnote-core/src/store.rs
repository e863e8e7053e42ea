//! Artifact stores.
//!
//! The output phase writes through [`ArtifactStore`], so a compiled plan can
//! be emitted to disk or captured in memory.

use std::collections::BTreeMap;
use std::fs;

use crate::error::Result;
use crate::paths::OutputDirs;
use crate::step::{cell_path, script_path};

/// One artifact of a compilation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact<'a> {
    /// Script body of the named cell.
    Script(&'a str),
    /// Archived record of the named cell.
    CellRecord(&'a str),
    /// Step names in scan order.
    Order,
    /// The step manifest.
    Plan,
}

impl Artifact<'_> {
    /// Path relative to the output root, as referenced from the manifest.
    pub fn relative_path(&self) -> String {
        match self {
            Artifact::Script(name) => script_path(name),
            Artifact::CellRecord(name) => cell_path(name),
            Artifact::Order => "order".to_string(),
            Artifact::Plan => "plan".to_string(),
        }
    }
}

/// Destination for the artifacts of a run.
pub trait ArtifactStore {
    /// Write `contents` as `artifact`, replacing any previous contents.
    fn put(&mut self, artifact: Artifact<'_>, contents: &str) -> Result<()>;
}

/// Store writing artifacts under an [`OutputDirs`] root.
#[derive(Debug)]
pub struct FsStore {
    dirs: OutputDirs,
}

impl FsStore {
    pub fn new(dirs: OutputDirs) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &OutputDirs {
        &self.dirs
    }
}

impl ArtifactStore for FsStore {
    fn put(&mut self, artifact: Artifact<'_>, contents: &str) -> Result<()> {
        let path = self.dirs.resolve(artifact.relative_path());
        fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}

/// Store keeping artifacts in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artifacts: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the artifact at `relative_path`.
    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.artifacts.get(relative_path).map(String::as_str)
    }

    /// Relative paths of every stored artifact, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&mut self, artifact: Artifact<'_>, contents: &str) -> Result<()> {
        self.artifacts
            .insert(artifact.relative_path(), contents.to_string());
        Ok(())
    }
}
