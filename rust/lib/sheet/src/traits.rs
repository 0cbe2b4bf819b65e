use std::sync::Arc;

use crate::error::SheetError;

/// A 1-based cell coordinate, as spreadsheets number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One cell write within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub cell: CellRef,
    pub value: String,
}

/// Full contents of a worksheet: the header row plus every data row.
///
/// Data rows are padded to the header width with empty strings and
/// rows whose cells are all empty are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetRows {
    /// Build from a raw values grid whose first row is the header.
    pub fn from_grid(grid: &[Vec<String>]) -> Self {
        let Some((header, data)) = grid.split_first() else {
            return Self::default();
        };
        let width = header.len();
        let rows = data
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| {
                let mut padded: Vec<String> = row.iter().take(width).cloned().collect();
                padded.resize(width, String::new());
                padded
            })
            .collect();
        Self {
            header: header.clone(),
            rows,
        }
    }
}

/// TableSource is the spreadsheet capability the lead workflow depends on.
///
/// Exactly four operations: bulk read, exact-value search, header read and
/// cell write. `update_cells` is a batched form of `update_cell`; backends
/// that can apply several cells in one request should override it.
pub trait TableSource: Send + Sync {
    /// Read the header row and all data rows.
    fn read_records(&self) -> Result<SheetRows, SheetError>;

    /// Find every cell whose value equals `value` exactly (case-sensitive,
    /// untrimmed). Results are in row-major order.
    fn find_cells(&self, value: &str) -> Result<Vec<CellRef>, SheetError>;

    /// Read row 1.
    fn header_row(&self) -> Result<Vec<String>, SheetError>;

    /// Overwrite a single cell.
    fn update_cell(&self, cell: CellRef, value: &str) -> Result<(), SheetError>;

    /// Overwrite several cells. The default writes them one at a time in the
    /// given order and stops at the first failure.
    fn update_cells(&self, updates: &[CellUpdate]) -> Result<(), SheetError> {
        for update in updates {
            self.update_cell(update.cell, &update.value)?;
        }
        Ok(())
    }
}

/// SheetBackend opens a [`TableSource`] for a source id (a sheet URL or key).
///
/// Constructed once at startup and shared across requests.
pub trait SheetBackend: Send + Sync {
    /// Short name used in logs ("google", "memory").
    fn kind(&self) -> &'static str;

    fn open(&self, source_id: &str) -> Result<Arc<dyn TableSource>, SheetError>;
}

/// Scan a values grid for cells equal to `value`, row-major, 1-based.
pub(crate) fn scan_grid(grid: &[Vec<String>], value: &str) -> Vec<CellRef> {
    let mut found = Vec::new();
    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell == value {
                found.push(CellRef::new(r + 1, c + 1));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn from_grid_pads_and_drops_blank_rows() {
        let g = grid(&[
            &["First Name", "Notes", "Sales Rep"],
            &["Alex"],
            &["", "", ""],
            &["Jordan", "hi", "Sam", "extra"],
        ]);
        let rows = SheetRows::from_grid(&g);
        assert_eq!(rows.header, vec!["First Name", "Notes", "Sales Rep"]);
        assert_eq!(rows.rows.len(), 2);
        assert_eq!(rows.rows[0], vec!["Alex", "", ""]);
        assert_eq!(rows.rows[1], vec!["Jordan", "hi", "Sam"]);
    }

    #[test]
    fn from_grid_empty() {
        assert_eq!(SheetRows::from_grid(&[]), SheetRows::default());
    }

    #[test]
    fn scan_is_exact_and_row_major() {
        let g = grid(&[
            &["Phone", "Mobile"],
            &["555-0101", "555-0101 "],
            &["x", "555-0101"],
        ]);
        let found = scan_grid(&g, "555-0101");
        assert_eq!(found, vec![CellRef::new(2, 1), CellRef::new(3, 2)]);
        assert!(scan_grid(&g, "phone").is_empty());
    }
}
