//! Notebook input selection.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Open the notebook at `path`, or standard input for `-`.
pub fn open(path: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file_path = Path::new(path);
    if !file_path.exists() {
        anyhow::bail!("Notebook not found: {}", path);
    }
    let file = File::open(file_path)?;
    Ok(Box::new(BufReader::new(file)))
}
