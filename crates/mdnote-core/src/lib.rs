//! Compiler from literate mdnote notebooks to step manifests.
//!
//! A notebook is a markdown-like document of cells. Each cell names a unit of
//! work, lists the cells it depends on, names a driver and embeds a script:
//!
//! ````text
//! # split
//! - fetch
//! ```bash
//! cut -d, -f1 in/inputs/fetch/data.csv
//! ```
//! ````
//!
//! # Architecture
//!
//! ```text
//! notebook ──► CellScanner ──► Cell ──► synthesize (+ DriverResolver) ──► Step
//!                                                                          │
//!                   order, plan, scripts/*, cells/*  ◄── ArtifactStore ◄── Plan
//! ```
//!
//! Everything up to [`Plan`] is pure; [`Plan::write_to`] performs all I/O.

pub mod compile;
pub mod driver;
pub mod error;
pub mod graph;
pub mod notebook;
pub mod paths;
pub mod plan;
pub mod step;
pub mod store;

pub use compile::{CompileOptions, Compiler, ReferencePolicy, scan_notebook};
pub use driver::{DriverDir, DriverResolver, DriverSource, InlineDrivers};
pub use error::{Error, Result};
pub use graph::{IssueKind, ReferenceIssue, check_prerequisites};
pub use notebook::{Cell, CellScanner};
pub use paths::OutputDirs;
pub use plan::{Entry, Plan};
pub use step::{Declaration, Step};
pub use store::{Artifact, ArtifactStore, FsStore, MemoryStore};

use std::io::BufRead;
use std::path::Path;

/// Compile a notebook and write its artifacts under `out_dir`.
///
/// Drivers are read from `drivers_dir`. Nothing is written unless the whole
/// notebook compiles.
pub fn compile_to_dir<R: BufRead>(
    reader: R,
    drivers_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    options: CompileOptions,
) -> Result<Plan> {
    let out_dir = out_dir.as_ref();

    let plan = Compiler::new(DriverDir::new(drivers_dir.as_ref()))
        .with_options(options)
        .compile(reader)?;

    let mut store = FsStore::new(OutputDirs::create(out_dir)?);
    plan.write_to(&mut store)?;

    tracing::info!(
        "Compiled {} cells → {}",
        plan.len(),
        out_dir.display()
    );

    Ok(plan)
}
