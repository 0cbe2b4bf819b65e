pub mod error;
pub mod google;
pub mod memory;
pub mod source_id;
pub mod traits;

pub use error::SheetError;
pub use google::{GoogleSheetsBackend, GoogleSheetsConfig};
pub use memory::{MemoryBackend, MemorySheet};
pub use source_id::{is_placeholder, spreadsheet_id};
pub use traits::{CellRef, CellUpdate, SheetBackend, SheetRows, TableSource};
