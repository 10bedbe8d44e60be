//! API utility functions
//!
//! Helpers used by the company handlers to validate request input.

use crate::company::{SortDirection, SortField};
use crate::error::AppError;
use serde_json::Value;

/// Default offset of a listing
pub const DEFAULT_START: u32 = 0;
/// Default page size of a listing
pub const DEFAULT_LIMIT: u32 = 10;

/// Text of a body field, if it was actually supplied
///
/// Non-blank strings are trimmed and numbers are kept as their decimal
/// text. Anything else (null, blank, bool, array, object) counts as absent.
pub fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an optional non-negative integer query parameter
///
/// # Arguments
/// * `name` - Parameter name, reported back on failure
/// * `value` - Raw query value, if any
/// * `default` - Value used when the parameter is absent
pub fn parse_count(name: &str, value: Option<&str>, default: u32) -> Result<u32, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Validation(format!("Parâmetro inválido: {}", name))),
    }
}

/// Parse the `sort` query parameter against the column allow-list
pub fn parse_sort(value: Option<&str>) -> Result<SortField, AppError> {
    match value {
        None => Ok(SortField::default()),
        Some(raw) => SortField::parse(raw).ok_or_else(|| {
            AppError::Validation(
                "Campo selecionado para ordenação inválido. Escolha uuid, cnpj, nomerazao, \
                 nomefantasia, cnae, created_at ou updated_at."
                    .to_string(),
            )
        }),
    }
}

/// Parse the `dir` query parameter (`asc` / `desc`, any case)
pub fn parse_direction(value: Option<&str>) -> Result<SortDirection, AppError> {
    match value {
        None => Ok(SortDirection::default()),
        Some(raw) => SortDirection::parse(raw).ok_or_else(|| {
            AppError::Validation(r#"Ordem de ordenação inválida. Use "asc" ou "desc"."#.to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(Some(&json!(" Acme "))).as_deref(), Some("Acme"));
        assert_eq!(field_text(Some(&json!(12345678000190u64))).as_deref(), Some("12345678000190"));
        assert_eq!(field_text(Some(&json!("   "))), None);
        assert_eq!(field_text(Some(&json!(true))), None);
        assert_eq!(field_text(Some(&json!(["x"]))), None);
        assert_eq!(field_text(Some(&Value::Null)), None);
        assert_eq!(field_text(None), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("start", None, 0).unwrap(), 0);
        assert_eq!(parse_count("limit", Some(""), 10).unwrap(), 10);
        assert_eq!(parse_count("limit", Some("25"), 10).unwrap(), 25);

        let err = parse_count("start", Some("-1"), 0).unwrap_err();
        assert_eq!(err.to_string(), "Parâmetro inválido: start");
        assert!(parse_count("limit", Some("ten"), 10).is_err());
    }

    #[test]
    fn test_parse_sort_and_direction() {
        assert_eq!(parse_sort(None).unwrap(), SortField::Uuid);
        assert_eq!(parse_sort(Some("nomerazao")).unwrap(), SortField::Nomerazao);
        assert!(matches!(
            parse_sort(Some("id")),
            Err(AppError::Validation(_))
        ));

        assert_eq!(parse_direction(None).unwrap(), SortDirection::Asc);
        assert_eq!(parse_direction(Some("DESC")).unwrap(), SortDirection::Desc);
        assert!(matches!(
            parse_direction(Some("sideways")),
            Err(AppError::Validation(_))
        ));
    }
}
