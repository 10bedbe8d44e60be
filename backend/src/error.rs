//! Error types and error handling for the application
//!
//! All errors implement `IntoResponse` so handlers can simply return
//! `Result<_, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request content is missing fields or carries invalid values
    #[error("{0}")]
    Validation(String),

    /// The addressed company does not exist
    #[error("{0}")]
    NotFound(String),

    /// The storage layer failed
    #[error(transparent)]
    Storage(#[from] crate::company::StorageError),
}

impl AppError {
    /// Build the 400 error listing every missing required field
    pub fn missing_fields(fields: &[&str]) -> Self {
        AppError::Validation(format!(
            "Conteúdo inválido. Os campos são obrigatórios: {}",
            fields.join(", ")
        ))
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Request failed");
        }

        // Not-found answers are informational and use the `message` key.
        let body = match self {
            AppError::NotFound(message) => json!({ "message": message }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_lists_every_field() {
        let (status, body) = body_json(AppError::missing_fields(&["cnpj", "cnae"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Conteúdo inválido. Os campos são obrigatórios: cnpj, cnae"
        );
    }

    #[tokio::test]
    async fn test_not_found_uses_message_key() {
        let (status, body) =
            body_json(AppError::NotFound("Empresa não encontrada".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Empresa não encontrada");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_storage_error_is_internal() {
        let error = AppError::from(crate::company::StorageError::Connection("boom".into()));
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Falha ao conectar ao banco de dados: boom");
    }
}
