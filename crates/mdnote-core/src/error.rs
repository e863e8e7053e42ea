//! Error types for mdnote-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::ReferenceIssue;

/// Result type for mdnote-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a notebook.
#[derive(Debug, Error)]
pub enum Error {
    /// A line did not have the shape the scanner expected.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The stream ended in the middle of a cell.
    #[error("unexpected end of notebook in cell '{cell}': expected {expected}")]
    UnexpectedEof { cell: String, expected: &'static str },

    /// Two cells share the same name.
    #[error("duplicate cell '{name}' at line {line} (first defined at line {first_line})")]
    DuplicateCell {
        name: String,
        first_line: usize,
        line: usize,
    },

    /// No driver definition exists for the name.
    #[error("driver not found: '{name}' (looked in {})", path.display())]
    DriverNotFound { name: String, path: PathBuf },

    /// The driver definition exists but could not be read.
    #[error("failed to read driver '{name}': {source}")]
    DriverRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Prerequisite validation failed under a strict reference policy.
    #[error("{} unresolved prerequisite reference(s): {}", .0.len(), format_issues(.0))]
    UnresolvedPrerequisites(Vec<ReferenceIssue>),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// A short recovery hint for the user, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Parse { .. } => Some(
                "a cell is a '# name' header, zero or more '- prerequisite' lines, \
                 then a '```driver' fence, the script, and a closing '```'",
            ),
            Error::UnexpectedEof { .. } => Some("check that every script block has a closing '```' fence"),
            Error::DuplicateCell { .. } => Some("rename one of the cells; names become step and file names"),
            Error::DriverNotFound { .. } => Some("pass --drivers <DIR> pointing at the driver definitions"),
            Error::UnresolvedPrerequisites(_) => {
                Some("define the missing cells earlier in the notebook, or use --references warn")
            }
            Error::DriverRead { .. } | Error::Io(_) => None,
        }
    }

    /// The error message with its hint appended on a second line.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}

fn format_issues(issues: &[ReferenceIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::IssueKind;

    #[test]
    fn test_parse_error_has_hint() {
        let err = Error::Parse {
            line: 3,
            message: "expected prerequisite or driver fence".to_string(),
        };
        let text = err.with_hint();
        assert!(text.starts_with("parse error at line 3: expected prerequisite or driver fence"));
        assert!(text.contains("hint:"));
    }

    #[test]
    fn test_io_error_has_no_hint() {
        let err = Error::from(std::io::Error::other("disk full"));
        assert_eq!(err.with_hint(), "IO error: disk full");
    }

    #[test]
    fn test_unresolved_lists_every_issue() {
        let err = Error::UnresolvedPrerequisites(vec![
            ReferenceIssue {
                cell: "b".to_string(),
                prerequisite: "a".to_string(),
                kind: IssueKind::Missing,
            },
            ReferenceIssue {
                cell: "c".to_string(),
                prerequisite: "d".to_string(),
                kind: IssueKind::Forward,
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 unresolved"));
        assert!(text.contains("'b' requires 'a'"));
        assert!(text.contains("'c' requires 'd'"));
    }
}
