//! Storage-specific error types
//!
//! Errors raised by the company storage layer (connection, schema, statements).

use thiserror::Error;

/// Errors that can occur while talking to the company store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Could not open the database file or create its directory
    #[error("Falha ao conectar ao banco de dados: {0}")]
    Connection(String),

    /// A schema statement failed while ensuring the table exists
    #[error("Falha ao criar o esquema: {0}")]
    Schema(String),

    /// Inserting a new company failed; the transaction was rolled back
    #[error("Erro ocorreu durante o registro da empresa: {0}")]
    Insert(#[source] sqlx::Error),

    /// Any other statement failed
    #[error("Erro no banco de dados: {0}")]
    Query(#[from] sqlx::Error),
}
