//! Notebook scanning.
//!
//! This module provides:
//! - The `Cell` record extracted from a notebook document
//! - A line-oriented scanner that yields cells in document order

mod scanner;
mod types;

pub use scanner::{CellScanner, scan_str};
pub use types::{Cell, FENCE, HEADER_PREFIX, PREREQUISITE_PREFIX};
