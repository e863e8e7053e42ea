//! Prerequisite validation.
//!
//! Scanning accepts prerequisite names as given. This pass runs once over the
//! complete cell list and reports every reference that cannot be satisfied by
//! an earlier cell, so all problems surface together instead of one at a time
//! inside the execution engine.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::notebook::Cell;

/// Why a prerequisite reference is suspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// No cell with that name exists.
    Missing,
    /// The cell exists but is defined later in the document.
    Forward,
    /// The cell lists itself.
    SelfReference,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::Missing => "no such cell",
            IssueKind::Forward => "defined later in the notebook",
            IssueKind::SelfReference => "cell requires itself",
        })
    }
}

/// One suspect prerequisite reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceIssue {
    /// The cell declaring the prerequisite.
    pub cell: String,
    /// The prerequisite name as written.
    pub prerequisite: String,
    pub kind: IssueKind,
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' requires '{}' ({})",
            self.cell, self.prerequisite, self.kind
        )
    }
}

/// Check every prerequisite of every cell against the cells defined before it.
///
/// Issues are returned in document order; a prerequisite repeated within one
/// cell is reported once.
pub fn check_prerequisites(cells: &[Cell]) -> Vec<ReferenceIssue> {
    let positions: FxHashMap<&str, usize> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| (cell.name.as_str(), index))
        .collect();

    let mut issues = Vec::new();
    for (index, cell) in cells.iter().enumerate() {
        let mut seen = FxHashSet::default();
        for prerequisite in &cell.prerequisites {
            if !seen.insert(prerequisite.as_str()) {
                continue;
            }
            let kind = match positions.get(prerequisite.as_str()) {
                _ if *prerequisite == cell.name => IssueKind::SelfReference,
                None => IssueKind::Missing,
                Some(&producer) if producer > index => IssueKind::Forward,
                Some(_) => continue,
            };
            issues.push(ReferenceIssue {
                cell: cell.name.clone(),
                prerequisite: prerequisite.clone(),
                kind,
            });
        }
    }
    issues
}
