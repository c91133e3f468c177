//! Persistence: JSON project files and CSV interchange.

pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::export_csv;
pub use csv_import::{import_csv, ImportReport};
pub use file::{load_project, save_project, ProjectDocument};
