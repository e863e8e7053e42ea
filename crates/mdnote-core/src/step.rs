//! Step synthesis.
//!
//! A step is the manifest form of a cell: an ordered list of `key=value`
//! declarations understood by the downstream execution engine.

use std::fmt;

use crate::notebook::Cell;

/// Command every step runs: make the driver executable, then execute it.
pub const PROCESS_COMMAND: &str = "command:chmod +x in/driver && ./in/driver";

/// A single `key=value` manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub key: String,
    pub value: String,
}

impl Declaration {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Manifest representation of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub declarations: Vec<Declaration>,
}

/// Path of a cell's script artifact, relative to the output root.
pub fn script_path(name: &str) -> String {
    format!("scripts/{name}")
}

/// Path of a cell's archived record, relative to the output root.
pub fn cell_path(name: &str) -> String {
    format!("cells/{name}")
}

/// Positional reference to the output directory of the step called `name`.
pub fn output_ref(name: &str) -> String {
    format!("_pos:{name}:out/")
}

/// Build the step for `cell`, inlining the already resolved driver content.
pub fn synthesize(cell: &Cell, driver: &str) -> Step {
    let mut declarations = Vec::with_capacity(3 + cell.prerequisites.len());
    declarations.push(Declaration::new("process", PROCESS_COMMAND));
    declarations.push(Declaration::new("in/driver", driver));
    declarations.push(Declaration::new(
        "in/script",
        format!("file:{}", script_path(&cell.name)),
    ));
    for prerequisite in &cell.prerequisites {
        declarations.push(Declaration::new(
            format!("in/inputs/{prerequisite}/"),
            output_ref(prerequisite),
        ));
    }

    Step {
        name: cell.name.clone(),
        declarations,
    }
}
