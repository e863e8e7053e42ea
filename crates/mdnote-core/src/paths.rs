//! Output directory management.
//!
//! Every artifact of a run lives under one output root:
//!
//! ```text
//! out/
//! ├── scripts/   # one script body per cell
//! ├── cells/     # one archived cell record per cell
//! ├── order      # step names in scan order
//! └── plan       # the step manifest
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Directory structure for one compilation run.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    /// The output root itself.
    pub root: PathBuf,

    /// Script artifacts, one file per cell.
    pub scripts_dir: PathBuf,

    /// Archived cell records, one file per cell.
    pub cells_dir: PathBuf,
}

impl OutputDirs {
    /// Create the directory structure under `root`.
    ///
    /// Creates all necessary directories if they don't exist.
    ///
    /// # Errors
    /// Returns an error if directory creation fails.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let dirs = Self {
            scripts_dir: root.join("scripts"),
            cells_dir: root.join("cells"),
            root,
        };
        dirs.create_subdirs()?;
        Ok(dirs)
    }

    /// Path of the order artifact.
    pub fn order_path(&self) -> PathBuf {
        self.root.join("order")
    }

    /// Path of the plan artifact.
    pub fn plan_path(&self) -> PathBuf {
        self.root.join("plan")
    }

    /// Resolve a path relative to the output root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Remove every artifact of a previous run.
    ///
    /// Only the directories and files this layout owns are touched; anything
    /// else under the root is left alone. The directories are recreated.
    pub fn clean(&self) -> Result<()> {
        for dir in [&self.scripts_dir, &self.cells_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }
        for file in [self.order_path(), self.plan_path()] {
            if file.exists() {
                fs::remove_file(file)?;
            }
        }
        self.create_subdirs()
    }

    fn create_subdirs(&self) -> Result<()> {
        fs::create_dir_all(&self.scripts_dir)?;
        fs::create_dir_all(&self.cells_dir)?;
        Ok(())
    }
}
