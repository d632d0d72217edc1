//! Loading of resource datasets from CSV files.

pub mod csv;
pub mod edits;
pub mod error;
pub mod fingerprint;
pub mod loader;

pub use self::csv::{CsvTable, parse_csv_text, read_csv_table};
pub use edits::{edit_draft_from_str, load_edit_draft};
pub use error::{IngestError, Result};
pub use fingerprint::dataset_fingerprint;
pub use loader::{
    DEFAULT_COST_COLUMN, DEFAULT_ID_COLUMN, LoadOptions, LoadedDataset, RejectedRow,
    build_dataset, load_dataset, load_dataset_from_str, parse_cost,
};
