/// Channel value at or below which a pixel counts as ink.
pub const DARK_THRESHOLD: u8 = 40;
/// Columns on a standard 80-column card.
pub const DEFAULT_COLUMNS: usize = 80;
/// Punch rows on a card: 12, 11, then 0 through 9.
pub const ROW_COUNT: usize = 12;

/// Parameters for reading a sheet.
///
/// The row count is fixed at [`ROW_COUNT`]; only the column count varies
/// between sheet layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetConfig {
    pub dark_threshold: u8,
    pub columns: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            dark_threshold: DARK_THRESHOLD,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl SheetConfig {
    pub fn with_columns(columns: usize) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }
}
