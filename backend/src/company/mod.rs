//! Company module
//!
//! Storage layer for company records, backed by a SQLite database.

pub mod db;
pub mod error;
pub mod models;

pub use db::CompanyDb;
pub use error::StorageError;
pub use models::{Company, SortDirection, SortField};
