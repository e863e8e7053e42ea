//! The compiled plan and its rendering.
//!
//! A [`Plan`] is the complete, immutable result of compiling a notebook: the
//! cells in scan order, each paired with its synthesized step. Nothing touches
//! the filesystem until [`Plan::write_to`] is called.

use indexmap::IndexMap;

use crate::error::Result;
use crate::notebook::Cell;
use crate::step::{Step, cell_path, output_ref};
use crate::store::{Artifact, ArtifactStore};

/// Name of the terminal aggregating block.
pub const MAIN_STEP: &str = "main";

/// A cell together with the step derived from it.
#[derive(Debug, Clone)]
pub struct Entry {
    pub cell: Cell,
    pub step: Step,
}

/// Ordered mapping from step name to its cell and step.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    entries: IndexMap<String, Entry>,
}

impl Plan {
    pub(crate) fn push(&mut self, cell: Cell, step: Step) {
        self.entries.insert(cell.name.clone(), Entry { cell, step });
    }

    /// Step names in scan order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in scan order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The order artifact: one step name per line.
    pub fn render_order(&self) -> String {
        let mut order = self.names().collect::<Vec<_>>().join("\n");
        order.push('\n');
        order
    }

    /// The plan artifact: one block per step, then the `main` block.
    pub fn render_plan(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.values() {
            out.push_str(&format!("_pos={}\n", entry.step.name));
            for declaration in &entry.step.declarations {
                out.push_str(&format!("{declaration}\n"));
            }
            out.push('\n');
        }

        out.push_str(&format!("_pos={MAIN_STEP}\n"));
        out.push_str("process=identity\n");
        out.push_str("in/order=file:order\n");
        for name in self.names() {
            out.push_str(&format!("in/outs/{name}/={}\n", output_ref(name)));
            out.push_str(&format!("in/cells/{name}=file:{}\n", cell_path(name)));
        }
        out.push('\n');
        out
    }

    /// Write every artifact of the plan to `store`.
    ///
    /// Scripts and cell records go first, then the order and plan artifacts.
    pub fn write_to(&self, store: &mut dyn ArtifactStore) -> Result<()> {
        for entry in self.entries.values() {
            store.put(Artifact::Script(&entry.cell.name), &entry.cell.script)?;
            store.put(Artifact::CellRecord(&entry.cell.name), &entry.cell.record)?;
        }
        store.put(Artifact::Order, &self.render_order())?;
        store.put(Artifact::Plan, &self.render_plan())?;

        tracing::info!(steps = self.len(), "wrote plan artifacts");
        Ok(())
    }
}
