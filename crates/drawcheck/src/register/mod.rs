pub mod index;
pub mod sink;

pub use index::RegisterIndex;
pub use sink::RegisterSink;

/// Logical register fields the core reads and writes. The physical column
/// each role lives in comes from [`crate::config::RegisterLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Name,
    Spec,
    Description,
    Version,
    Title,
}

/// One row of the parts register snapshot. Taken once per run, read-only
/// thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRow {
    pub name: String,
    pub spec: String,
    pub description: String,
    pub version: String,
    pub title: String,
    /// Physical 1-based row number in the register, unique within a run.
    pub source_row_number: u32,
}

impl RegisterRow {
    /// Rows with neither a name nor a spec carry no identity and are dropped
    /// from snapshots before indexing.
    pub fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() || !self.spec.trim().is_empty()
    }
}
