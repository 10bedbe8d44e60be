//! Application state shared by all request handlers
//!
//! Holds nothing mutable: each request borrows its own pooled connection
//! through the storage handle.

use crate::company::CompanyDb;

/// State handed to every handler by the router
#[derive(Clone)]
pub struct AppState {
    /// Company storage handle (cheap to clone, wraps the pool)
    pub db: CompanyDb,
}

impl AppState {
    /// Create application state around an opened company store
    pub fn new(db: CompanyDb) -> Self {
        Self { db }
    }
}
