//! Types for notebook cells.

/// Marker that opens a cell: `# <name>`.
pub const HEADER_PREFIX: &str = "# ";

/// Marker for a prerequisite line: `- <cell>`.
pub const PREREQUISITE_PREFIX: &str = "- ";

/// Code fence that opens (with a driver name) and closes a script.
pub const FENCE: &str = "```";

/// One named unit of work parsed from a notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell name, taken from the trimmed header title.
    pub name: String,
    /// Names of the cells this one consumes, in declaration order.
    pub prerequisites: Vec<String>,
    /// Name of the driver that runs the script.
    pub driver: String,
    /// Script body, byte-exact, without the fences.
    pub script: String,
    /// Every line consumed for this cell, header through closing fence.
    pub record: String,
    /// 1-based line number of the header.
    pub line: usize,
}
