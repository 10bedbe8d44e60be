//! Company data models
//!
//! Defines the company record and the sort options accepted by listings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Company {
    /// Unique identifier, generated on creation and never changed
    pub uuid: String,
    /// Tax identification number (CNPJ)
    pub cnpj: String,
    /// Legal name
    pub nomerazao: String,
    /// Trade name
    pub nomefantasia: String,
    /// Business-activity code (CNAE)
    pub cnae: String,
    /// When the company was created
    pub created_at: DateTime<Utc>,
    /// When the company was last updated
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company with a fresh uuid and both timestamps set to now
    pub fn new(cnpj: String, nomerazao: String, nomefantasia: String, cnae: String) -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4().to_string(),
            cnpj,
            nomerazao,
            nomefantasia,
            cnae,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Column a company listing can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Order by uuid
    #[default]
    Uuid,
    /// Order by tax id
    Cnpj,
    /// Order by legal name
    Nomerazao,
    /// Order by trade name
    Nomefantasia,
    /// Order by activity code
    Cnae,
    /// Order by creation time
    CreatedAt,
    /// Order by last update time
    UpdatedAt,
}

impl SortField {
    /// Every accepted sort field, in the order they are documented
    pub const ALL: [SortField; 7] = [
        SortField::Uuid,
        SortField::Cnpj,
        SortField::Nomerazao,
        SortField::Nomefantasia,
        SortField::Cnae,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// Column name used in the ORDER BY clause
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::Uuid => "uuid",
            SortField::Cnpj => "cnpj",
            SortField::Nomerazao => "nomerazao",
            SortField::Nomefantasia => "nomefantasia",
            SortField::Cnae => "cnae",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Parse a query value; only exact column names are accepted
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_column() == value)
    }
}

/// Direction of a company listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// SQL keyword for the ORDER BY clause
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Parse `asc` / `desc`, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_company_has_matching_timestamps() {
        let company = Company::new(
            "123".to_string(),
            "Acme LTDA".to_string(),
            "Acme".to_string(),
            "6201-5".to_string(),
        );
        assert_eq!(company.created_at, company.updated_at);
        assert!(Uuid::parse_str(&company.uuid).is_ok());
    }

    #[test]
    fn test_sort_field_allow_list() {
        for field in SortField::ALL {
            assert_eq!(SortField::parse(field.as_column()), Some(field));
        }
        assert_eq!(SortField::parse("id"), None);
        assert_eq!(SortField::parse("CNPJ"), None);
        assert_eq!(SortField::parse("uuid; DROP TABLE companies"), None);
    }

    #[test]
    fn test_sort_direction_is_case_insensitive() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DeSc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::parse(""), None);
    }

    #[test]
    fn test_sort_serialization() {
        assert_eq!(
            serde_json::to_value(SortField::CreatedAt).unwrap(),
            serde_json::json!("created_at")
        );
        assert_eq!(
            serde_json::to_value(SortDirection::Desc).unwrap(),
            serde_json::json!("DESC")
        );
    }
}
