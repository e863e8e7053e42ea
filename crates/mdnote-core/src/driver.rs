//! Driver resolution.
//!
//! A driver is a named, externally defined executable that a step runs. Its
//! definition is inlined into the manifest as an opaque value, so resolution
//! only loads and trims text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// A collection of named driver definitions.
pub trait DriverSource {
    /// Load the raw definition of the driver called `name`.
    fn load(&self, name: &str) -> Result<String>;
}

/// Drivers stored one per file in a directory, the file name being the driver name.
#[derive(Debug, Clone)]
pub struct DriverDir {
    root: PathBuf,
}

impl DriverDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DriverSource for DriverDir {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::DriverNotFound {
                name: name.to_string(),
                path,
            },
            _ => Error::DriverRead {
                name: name.to_string(),
                source,
            },
        })
    }
}

/// Drivers held in memory.
#[derive(Debug, Clone, Default)]
pub struct InlineDrivers {
    drivers: FxHashMap<String, String>,
}

impl InlineDrivers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a driver definition.
    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.drivers.insert(name.into(), content.into());
        self
    }
}

impl DriverSource for InlineDrivers {
    fn load(&self, name: &str) -> Result<String> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DriverNotFound {
                name: name.to_string(),
                path: PathBuf::from("<inline>"),
            })
    }
}

/// Resolves driver names to trimmed content, loading each name at most once.
pub struct DriverResolver<D> {
    source: D,
    cache: FxHashMap<String, String>,
}

impl<D: DriverSource> DriverResolver<D> {
    pub fn new(source: D) -> Self {
        Self {
            source,
            cache: FxHashMap::default(),
        }
    }

    /// Resolve a driver name to its content with surrounding whitespace trimmed.
    pub fn resolve(&mut self, name: &str) -> Result<&str> {
        if !self.cache.contains_key(name) {
            let content = self.source.load(name)?;
            tracing::debug!(driver = name, bytes = content.len(), "loaded driver");
            self.cache.insert(name.to_string(), content.trim().to_string());
        }
        Ok(&self.cache[name])
    }
}
