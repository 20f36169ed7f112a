//! Paint catalog domain module.
//!
//! - `model`: catalog entry types (`Paint`, `Catalog`)
//! - `csv`: comma-delimited catalog import/export

mod csv;
mod model;

pub use csv::{export_catalog_csv, import_catalog_csv};
pub use model::{Catalog, Paint};
