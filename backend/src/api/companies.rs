//! Company API handlers
//!
//! Contains HTTP request handlers for company CRUD operations.

use crate::api::utils::{
    field_text, parse_count, parse_direction, parse_sort, DEFAULT_LIMIT, DEFAULT_START,
};
use crate::company::{Company, SortDirection, SortField};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Query parameters accepted by the listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesQuery {
    /// Number of rows to skip
    pub start: Option<String>,
    /// Maximum number of rows to return
    pub limit: Option<String>,
    /// Column to order by
    pub sort: Option<String>,
    /// Order direction (`asc` / `desc`)
    pub dir: Option<String>,
}

/// Companies list envelope
#[derive(Debug, Serialize)]
pub struct CompaniesListResponse {
    /// Number of companies in this page
    pub count: usize,
    /// Offset that was applied
    pub start: u32,
    /// Page size that was applied
    pub limit: u32,
    /// Column the page is ordered by
    pub sort: SortField,
    /// Direction the page is ordered in
    pub dir: SortDirection,
    /// The companies of this page
    pub companies: Vec<Company>,
}

/// Create company request
///
/// Fields are kept as raw JSON so a badly typed field only affects itself.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCompanyRequest {
    /// Tax id
    pub cnpj: Option<Value>,
    /// Legal name
    pub nomerazao: Option<Value>,
    /// Trade name
    pub nomefantasia: Option<Value>,
    /// Activity code
    pub cnae: Option<Value>,
}

/// Partial update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    /// New trade name (optional)
    pub nomefantasia: Option<Value>,
    /// New activity code (optional)
    pub cnae: Option<Value>,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response to a successful creation
#[derive(Debug, Serialize)]
pub struct CreateCompanyResponse {
    /// Human-readable message
    pub message: String,
    /// Identifier of the new company
    pub uuid: String,
}

/// GET /companies/ - List companies with pagination and ordering
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<ListCompaniesQuery>,
) -> Result<Json<CompaniesListResponse>, AppError> {
    let start = parse_count("start", query.start.as_deref(), DEFAULT_START)?;
    let limit = parse_count("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;
    let sort = parse_sort(query.sort.as_deref())?;
    let dir = parse_direction(query.dir.as_deref())?;

    let companies = state.db.list(start, limit, sort, dir).await?;

    Ok(Json(CompaniesListResponse {
        count: companies.len(),
        start,
        limit,
        sort,
        dir,
        companies,
    }))
}

/// POST /company/ - Create a new company
///
/// A missing or unreadable body is treated as an empty one, so the caller
/// gets the list of required fields back.
pub async fn create_company(
    State(state): State<AppState>,
    body: Option<Json<CreateCompanyRequest>>,
) -> Result<(StatusCode, Json<CreateCompanyResponse>), AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let cnpj = field_text(request.cnpj.as_ref());
    let nomerazao = field_text(request.nomerazao.as_ref());
    let nomefantasia = field_text(request.nomefantasia.as_ref());
    let cnae = field_text(request.cnae.as_ref());

    let (cnpj, nomerazao, nomefantasia, cnae) = match (cnpj, nomerazao, nomefantasia, cnae) {
        (Some(cnpj), Some(nomerazao), Some(nomefantasia), Some(cnae)) => {
            (cnpj, nomerazao, nomefantasia, cnae)
        }
        (cnpj, nomerazao, nomefantasia, cnae) => {
            let missing: Vec<&str> = [
                ("cnpj", cnpj.is_none()),
                ("nomefantasia", nomefantasia.is_none()),
                ("nomerazao", nomerazao.is_none()),
                ("cnae", cnae.is_none()),
            ]
            .into_iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| name)
            .collect();
            return Err(AppError::missing_fields(&missing));
        }
    };

    let company = state
        .db
        .save(&cnpj, &nomerazao, &nomefantasia, &cnae)
        .await?;
    info!(uuid = %company.uuid, cnpj = %company.cnpj, "Company created");

    Ok((
        StatusCode::CREATED,
        Json(CreateCompanyResponse {
            message: "Empresa criada com sucesso!".to_string(),
            uuid: company.uuid,
        }),
    ))
}

/// GET /company/:uuid - Get a specific company
pub async fn get_company(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .db
        .find_by_uuid(&uuid)
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa não encontrada".to_string()))?;

    Ok(Json(company))
}

/// PATCH /company/:uuid - Update trade name and/or activity code
pub async fn update_company(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    body: Option<Json<UpdateCompanyRequest>>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let nomefantasia = field_text(request.nomefantasia.as_ref());
    let cnae = field_text(request.cnae.as_ref());
    if nomefantasia.is_none() && cnae.is_none() {
        return Err(AppError::missing_fields(&["nomefantasia", "cnae"]));
    }

    let rows = state
        .db
        .update(&uuid, nomefantasia.as_deref(), cnae.as_deref())
        .await?;
    if rows == 0 {
        return Err(AppError::NotFound("Empresa não encontrada!".to_string()));
    }

    info!(uuid = %uuid, "Company updated");
    Ok(Json(MessageResponse::new("Empresa atualizada com sucesso!")))
}

/// DELETE /company/:cnpj - Delete every company registered under a tax id
pub async fn delete_company(
    State(state): State<AppState>,
    Path(cnpj): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let rows = state.db.delete_by_cnpj(&cnpj).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Empresa não encontrada!".to_string()));
    }

    info!(cnpj = %cnpj, rows, "Companies deleted");
    Ok(Json(MessageResponse::new("Empresa removida com sucesso!")))
}
