use crate::error::RegisterError;

/// Write surface of the register collaborator. Fill mode is the only writer,
/// and any failure here is fatal to the run: the driver aborts before the
/// register is left in an ambiguous half-written state.
pub trait RegisterSink {
    /// Writes one cell. `row` and `column` are 1-based physical coordinates.
    fn write_cell(&mut self, row: u32, column: u32, value: &str) -> Result<(), RegisterError>;

    /// Inserts `count` blank rows after the given row, shifting everything
    /// below it down. Used when the register has fewer blank data rows than
    /// there are documents.
    fn insert_rows(&mut self, after_row: u32, count: u32) -> Result<(), RegisterError>;
}
