//! Line-oriented cell scanner.
//!
//! The scanner walks a notebook one line at a time through three states:
//!
//! ```text
//! AwaitingHeader ──"# name"──► PrereqsOrFence ──"```driver"──► Script
//!       ▲                        │  "- prereq"                   │
//!       │                        └──────┘                        │
//!       └──────────────────────────"```"────────────────────────┘
//! ```
//!
//! End of input is only legal while awaiting a header.

use std::io::{BufRead, Cursor};

use super::types::{Cell, FENCE, HEADER_PREFIX, PREREQUISITE_PREFIX};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    PrereqsOrFence,
    Script,
}

impl State {
    /// What the scanner was waiting for, for end-of-input diagnostics.
    fn expected(self) -> &'static str {
        match self {
            State::AwaitingHeader => "cell header",
            State::PrereqsOrFence => "prerequisite or driver fence",
            State::Script => "closing fence",
        }
    }
}

/// Scanner yielding one [`Cell`] at a time from a buffered reader.
pub struct CellScanner<R> {
    reader: R,
    /// Number of lines consumed so far.
    line: usize,
    /// Set after end of input or the first error.
    finished: bool,
}

impl<R: BufRead> CellScanner<R> {
    /// Create a scanner positioned at the start of a document.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            finished: false,
        }
    }

    /// Extract the next cell, or `None` once the document has no more headers.
    pub fn next_cell(&mut self) -> Result<Option<Cell>> {
        let mut state = State::AwaitingHeader;
        let mut buf = String::new();

        let mut name = String::new();
        let mut header_line = 0;
        let mut prerequisites = Vec::new();
        let mut driver = String::new();
        let mut script = String::new();
        let mut record = String::new();

        loop {
            buf.clear();
            if !self.read_line(&mut buf)? {
                return match state {
                    State::AwaitingHeader => Ok(None),
                    _ => Err(Error::UnexpectedEof {
                        cell: name,
                        expected: state.expected(),
                    }),
                };
            }

            match state {
                State::AwaitingHeader => {
                    let Some(title) = buf.strip_prefix(HEADER_PREFIX) else {
                        continue;
                    };
                    name = check_name(title.trim(), "cell", self.line)?;
                    header_line = self.line;
                    record.push_str(&buf);
                    state = State::PrereqsOrFence;
                }
                State::PrereqsOrFence => {
                    record.push_str(&buf);
                    let trimmed = buf.trim();
                    if let Some(prerequisite) = trimmed.strip_prefix(PREREQUISITE_PREFIX) {
                        prerequisites.push(prerequisite.trim().to_string());
                    } else if let Some(driver_name) = trimmed.strip_prefix(FENCE) {
                        driver = check_name(driver_name, "driver", self.line)?;
                        state = State::Script;
                    } else {
                        return Err(Error::Parse {
                            line: self.line,
                            message: format!(
                                "malformed cell '{name}': expected prerequisite or driver fence, found {trimmed:?}"
                            ),
                        });
                    }
                }
                State::Script => {
                    record.push_str(&buf);
                    if buf.starts_with(FENCE) {
                        tracing::debug!(
                            cell = %name,
                            line = header_line,
                            prerequisites = prerequisites.len(),
                            "scanned cell"
                        );
                        return Ok(Some(Cell {
                            name,
                            prerequisites,
                            driver,
                            script,
                            record,
                            line: header_line,
                        }));
                    }
                    script.push_str(&buf);
                }
            }
        }
    }

    /// Read one line including its terminator. Returns `false` at end of input.
    fn read_line(&mut self, buf: &mut String) -> Result<bool> {
        if self.reader.read_line(buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }
}

impl<R: BufRead> Iterator for CellScanner<R> {
    type Item = Result<Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_cell() {
            Ok(Some(cell)) => Some(Ok(cell)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Scan every cell of an in-memory notebook.
pub fn scan_str(source: &str) -> Result<Vec<Cell>> {
    CellScanner::new(Cursor::new(source)).collect()
}

/// Names become artifact file names, so they must be a single path component.
fn check_name(name: &str, what: &str, line: usize) -> Result<String> {
    let message = if name.is_empty() {
        format!("empty {what} name")
    } else if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        format!("invalid {what} name {name:?}: must not be a path")
    } else {
        return Ok(name.to_string());
    };
    Err(Error::Parse { line, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell() {
        let cells = scan_str("# hello\n```bash\necho hi\n```\n").unwrap();
        assert_eq!(cells.len(), 1);

        let cell = &cells[0];
        assert_eq!(cell.name, "hello");
        assert!(cell.prerequisites.is_empty());
        assert_eq!(cell.driver, "bash");
        assert_eq!(cell.script, "echo hi\n");
        assert_eq!(cell.record, "# hello\n```bash\necho hi\n```\n");
        assert_eq!(cell.line, 1);
    }

    #[test]
    fn test_prerequisites_in_order() {
        let source = "# c\n- b\n  - a  \n- b\n```python\nprint(1)\n```\n";
        let cells = scan_str(source).unwrap();
        assert_eq!(cells[0].prerequisites, vec!["b", "a", "b"]);
        assert_eq!(cells[0].driver, "python");
    }

    #[test]
    fn test_prose_between_cells_is_skipped() {
        let source = "Intro text.\n\n# a\n```sh\ntrue\n```\nSome prose.\n## not a cell\n# b\n- a\n```sh\nfalse\n```\ntrailer\n";
        let cells = scan_str(source).unwrap();
        let names: Vec<_> = cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(cells[1].record, "# b\n- a\n```sh\nfalse\n```\n");
        assert_eq!(cells[1].line, 9);
    }

    #[test]
    fn test_script_is_byte_exact() {
        let source = "# crlf\r\n```bash\r\nline one\r\n\r\n  indented ```\r\n```\r\n";
        let cells = scan_str(source).unwrap();
        assert_eq!(cells[0].driver, "bash");
        assert_eq!(cells[0].script, "line one\r\n\r\n  indented ```\r\n");
        assert_eq!(cells[0].record, source);
    }

    #[test]
    fn test_empty_script() {
        let cells = scan_str("# noop\n```bash\n```").unwrap();
        assert_eq!(cells[0].script, "");
        assert_eq!(cells[0].record, "# noop\n```bash\n```");
    }

    #[test]
    fn test_header_title_is_trimmed() {
        let cells = scan_str("#   spaced name  \n```bash\n```\n").unwrap();
        assert_eq!(cells[0].name, "spaced name");
    }

    #[test]
    fn test_empty_document() {
        assert!(scan_str("").unwrap().is_empty());
        assert!(scan_str("no headers here\n#nospace\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_before_fence() {
        let err = scan_str("# a\n\n```bash\n```\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected prerequisite or driver fence"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_eof_before_fence() {
        let err = scan_str("# a\n- b\n").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof { ref cell, expected: "prerequisite or driver fence" } if cell == "a"
        ));
    }

    #[test]
    fn test_unterminated_script() {
        let err = scan_str("# a\n```bash\necho\n").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { expected: "closing fence", .. }));
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(
            scan_str("#  \n```bash\n```\n").unwrap_err(),
            Error::Parse { line: 1, .. }
        ));
        assert!(matches!(
            scan_str("# ../escape\n```bash\n```\n").unwrap_err(),
            Error::Parse { line: 1, .. }
        ));
        assert!(matches!(
            scan_str("# a\n```\n```\n").unwrap_err(),
            Error::Parse { line: 2, .. }
        ));
        assert!(matches!(
            scan_str("# a\n```sub/driver\n```\n").unwrap_err(),
            Error::Parse { line: 2, .. }
        ));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut scanner = CellScanner::new(Cursor::new("# a\n```bash\n```\n# b\noops\n# c\n```bash\n```\n"));
        assert!(scanner.next().unwrap().is_ok());
        assert!(scanner.next().unwrap().is_err());
        assert!(scanner.next().is_none());
    }
}
