//! Compile command implementation for mdnote CLI.
//!
//! Compiles the whole notebook in memory first; the output root is only
//! touched once compilation has succeeded.

use std::path::Path;
use std::time::Instant;

use mdnote_core::{CompileOptions, Compiler, DriverDir, FsStore, OutputDirs, ReferencePolicy};

use crate::{colors, input};

/// Inputs for one compile run.
pub struct CompileArgs<'a> {
    pub notebook: &'a str,
    pub out: &'a Path,
    pub drivers: &'a Path,
    pub references: ReferencePolicy,
    pub clean: bool,
}

/// Execute the compile command.
pub fn execute(args: &CompileArgs<'_>) -> anyhow::Result<()> {
    let start = Instant::now();
    let reader = input::open(args.notebook)?;

    let drivers = DriverDir::new(args.drivers);
    tracing::debug!(drivers = %drivers.root().display(), "resolving drivers");

    let plan = Compiler::new(drivers)
        .with_options(CompileOptions {
            references: args.references,
        })
        .compile(reader)?;

    let dirs = OutputDirs::create(args.out)?;
    if args.clean {
        tracing::debug!(out = %dirs.root.display(), "cleaning previous artifacts");
        dirs.clean()?;
    }

    let mut store = FsStore::new(dirs);
    plan.write_to(&mut store)?;

    println!(
        "{}Compiled{} {} cells → {} {}({:.2}ms){}",
        colors::GREEN,
        colors::RESET,
        plan.len(),
        args.out.display(),
        colors::DIM,
        start.elapsed().as_secs_f64() * 1000.0,
        colors::RESET
    );

    Ok(())
}
