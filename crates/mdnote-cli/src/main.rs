//! mdnote CLI - compile literate notebooks into step manifests.

mod check;
mod colors;
mod compile;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mdnote_core::ReferencePolicy;

#[derive(Parser)]
#[command(name = "mdnote")]
#[command(about = "Compile literate notebooks into step manifests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a notebook into order, plan, scripts and cell records
    Compile {
        /// Path to the notebook, or `-` for standard input
        #[arg(default_value = "-")]
        notebook: String,

        /// Output root for the emitted artifacts
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Directory holding one file per driver definition
        #[arg(short, long, default_value = "inref/drivers")]
        drivers: PathBuf,

        /// How to treat prerequisites no earlier cell defines
        #[arg(long, value_enum, default_value_t = References::Warn)]
        references: References,

        /// Remove artifacts of a previous run before writing
        #[arg(long)]
        clean: bool,
    },

    /// Scan a notebook and report its cells and prerequisite issues
    Check {
        /// Path to the notebook, or `-` for standard input
        #[arg(default_value = "-")]
        notebook: String,

        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum References {
    /// Accept every prerequisite as written
    Ignore,
    /// Log suspect prerequisites and continue
    Warn,
    /// Fail on any suspect prerequisite
    Deny,
}

impl From<References> for ReferencePolicy {
    fn from(value: References) -> Self {
        match value {
            References::Ignore => ReferencePolicy::Ignore,
            References::Warn => ReferencePolicy::Warn,
            References::Deny => ReferencePolicy::Deny,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format mdnote-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<mdnote_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Compile {
            notebook,
            out,
            drivers,
            references,
            clean,
        } => {
            let args = compile::CompileArgs {
                notebook: &notebook,
                out: &out,
                drivers: &drivers,
                references: references.into(),
                clean,
            };
            compile::execute(&args).map_err(format_error)?;
        }

        Commands::Check { notebook, json } => {
            check::execute(&notebook, json).map_err(format_error)?;
        }
    }

    Ok(())
}
