use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::SheetError;
use crate::source_id::is_placeholder;
use crate::traits::{scan_grid, CellRef, CellUpdate, SheetBackend, SheetRows, TableSource};

/// MemorySheet is a TableSource backed by an in-process values grid.
/// Row 1 of the grid is the header row.
pub struct MemorySheet {
    grid: RwLock<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn new(grid: Vec<Vec<String>>) -> Self {
        Self {
            grid: RwLock::new(grid),
        }
    }

    /// Build a sheet from a header and data rows.
    pub fn with_rows<S: AsRef<str>>(header: &[S], rows: &[Vec<S>]) -> Self {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(header.iter().map(|s| s.as_ref().to_string()).collect());
        for row in rows {
            grid.push(row.iter().map(|s| s.as_ref().to_string()).collect());
        }
        Self::new(grid)
    }

    /// Copy of the raw grid, header included.
    pub fn snapshot(&self) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Vec<String>>>, SheetError> {
        self.grid
            .read()
            .map_err(|_| SheetError::Transport("memory sheet lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Vec<String>>>, SheetError> {
        self.grid
            .write()
            .map_err(|_| SheetError::Transport("memory sheet lock poisoned".into()))
    }

    fn set(grid: &mut Vec<Vec<String>>, cell: CellRef, value: &str) -> Result<(), SheetError> {
        if cell.row == 0 || cell.col == 0 {
            return Err(SheetError::InvalidSource(format!(
                "cell coordinates are 1-based, got ({}, {})",
                cell.row, cell.col
            )));
        }
        if grid.len() < cell.row {
            grid.resize_with(cell.row, Vec::new);
        }
        let row = &mut grid[cell.row - 1];
        if row.len() < cell.col {
            row.resize(cell.col, String::new());
        }
        row[cell.col - 1] = value.to_string();
        Ok(())
    }
}

impl TableSource for MemorySheet {
    fn read_records(&self) -> Result<SheetRows, SheetError> {
        Ok(SheetRows::from_grid(&self.read()?))
    }

    fn find_cells(&self, value: &str) -> Result<Vec<CellRef>, SheetError> {
        Ok(scan_grid(&self.read()?, value))
    }

    fn header_row(&self) -> Result<Vec<String>, SheetError> {
        Ok(self.read()?.first().cloned().unwrap_or_default())
    }

    fn update_cell(&self, cell: CellRef, value: &str) -> Result<(), SheetError> {
        let mut grid = self.write()?;
        Self::set(&mut grid, cell, value)
    }

    fn update_cells(&self, updates: &[CellUpdate]) -> Result<(), SheetError> {
        // Validate the whole batch first so a bad coordinate writes nothing.
        if let Some(bad) = updates.iter().find(|u| u.cell.row == 0 || u.cell.col == 0) {
            return Err(SheetError::InvalidSource(format!(
                "cell coordinates are 1-based, got ({}, {})",
                bad.cell.row, bad.cell.col
            )));
        }
        let mut grid = self.write()?;
        for update in updates {
            Self::set(&mut grid, update.cell, &update.value)?;
        }
        Ok(())
    }
}

/// MemoryBackend maps source ids to in-memory sheets.
#[derive(Default)]
pub struct MemoryBackend {
    sheets: RwLock<BTreeMap<String, Arc<MemorySheet>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the sheet behind `source_id`.
    pub fn insert(&self, source_id: impl Into<String>, sheet: MemorySheet) -> Arc<MemorySheet> {
        let sheet = Arc::new(sheet);
        if let Ok(mut sheets) = self.sheets.write() {
            sheets.insert(source_id.into(), Arc::clone(&sheet));
        }
        sheet
    }

    /// Get the sheet behind `source_id` with its concrete type.
    pub fn sheet(&self, source_id: &str) -> Option<Arc<MemorySheet>> {
        self.sheets.read().ok()?.get(source_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sheets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SheetBackend for MemoryBackend {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn open(&self, source_id: &str) -> Result<Arc<dyn TableSource>, SheetError> {
        if is_placeholder(source_id) {
            return Err(SheetError::InvalidSource(source_id.to_string()));
        }
        match self.sheet(source_id) {
            Some(sheet) => Ok(sheet as Arc<dyn TableSource>),
            None => Err(SheetError::NotFound(source_id.to_string())),
        }
    }
}
