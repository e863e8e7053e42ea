//! Compilation pipeline.
//!
//! Compiling runs entirely in memory: scan every cell, reject duplicate names,
//! validate prerequisites, resolve drivers and synthesize steps. The result is
//! a [`Plan`]; any error leaves nothing to write.

use std::io::{BufRead, Cursor};

use rustc_hash::FxHashMap;

use crate::driver::{DriverResolver, DriverSource};
use crate::error::{Error, Result};
use crate::graph::check_prerequisites;
use crate::notebook::{Cell, CellScanner};
use crate::plan::Plan;
use crate::step::synthesize;

/// What to do with prerequisites that no earlier cell defines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Accept every reference as written.
    Ignore,
    /// Log each suspect reference and continue.
    #[default]
    Warn,
    /// Fail with every suspect reference.
    Deny,
}

/// Options controlling a compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub references: ReferencePolicy,
}

/// Compiles notebooks into plans using one driver source.
pub struct Compiler<D> {
    drivers: DriverResolver<D>,
    options: CompileOptions,
}

impl<D: DriverSource> Compiler<D> {
    pub fn new(drivers: D) -> Self {
        Self {
            drivers: DriverResolver::new(drivers),
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile a notebook read from `reader`.
    pub fn compile<R: BufRead>(&mut self, reader: R) -> Result<Plan> {
        let cells = scan_notebook(reader)?;
        self.check_references(&cells)?;

        let mut plan = Plan::default();
        for cell in cells {
            let driver = self.drivers.resolve(&cell.driver)?;
            let step = synthesize(&cell, driver);
            plan.push(cell, step);
        }

        tracing::info!(steps = plan.len(), "compiled notebook");
        Ok(plan)
    }

    /// Compile an in-memory notebook.
    pub fn compile_str(&mut self, source: &str) -> Result<Plan> {
        self.compile(Cursor::new(source))
    }

    fn check_references(&self, cells: &[Cell]) -> Result<()> {
        if self.options.references == ReferencePolicy::Ignore {
            return Ok(());
        }
        let issues = check_prerequisites(cells);
        if issues.is_empty() {
            return Ok(());
        }
        if self.options.references == ReferencePolicy::Deny {
            return Err(Error::UnresolvedPrerequisites(issues));
        }
        for issue in &issues {
            tracing::warn!(
                cell = %issue.cell,
                prerequisite = %issue.prerequisite,
                "suspect prerequisite: {}",
                issue.kind
            );
        }
        Ok(())
    }
}

/// Scan every cell from `reader`, failing on the first malformed cell or
/// repeated name.
pub fn scan_notebook<R: BufRead>(reader: R) -> Result<Vec<Cell>> {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    let mut cells = Vec::new();

    for cell in CellScanner::new(reader) {
        let cell = cell?;
        if let Some(&first_line) = seen.get(&cell.name) {
            return Err(Error::DuplicateCell {
                name: cell.name,
                first_line,
                line: cell.line,
            });
        }
        seen.insert(cell.name.clone(), cell.line);
        cells.push(cell);
    }

    Ok(cells)
}
