//! Company database operations
//!
//! Handles all database interactions for company records. Every call borrows
//! a connection from the pool for the duration of its statement(s) only.

use crate::company::error::StorageError;
use crate::company::models::{Company, SortDirection, SortField};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

const SCHEMA_SQL: &str = include_str!("../../migrations/001_create_companies.sql");

const SELECT_COLUMNS: &str = "uuid, cnpj, nomerazao, nomefantasia, cnae, created_at, updated_at";

/// Connection pool for company operations
#[derive(Clone)]
pub struct CompanyDb {
    pool: SqlitePool,
}

impl CompanyDb {
    /// Open (or create) the database file and make sure the schema exists
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `max_connections` - Upper bound for the connection pool
    pub async fn new(db_path: &str, max_connections: u32) -> Result<Self, StorageError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Connection(format!("failed to create db directory: {}", e))
                })?;
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StorageError::Connection(format!("invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Create the companies table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        for statement in schema_statements(SCHEMA_SQL) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    StorageError::Schema(format!(
                        "{} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Companies schema is ready");
        Ok(())
    }

    /// List companies ordered by `sort`/`dir`, skipping `start` rows and
    /// returning at most `limit`
    pub async fn list(
        &self,
        start: u32,
        limit: u32,
        sort: SortField,
        dir: SortDirection,
    ) -> Result<Vec<Company>, StorageError> {
        // Both fragments come from fixed enum mappings, never from input.
        let query = format!(
            "SELECT {} FROM companies ORDER BY {} {}, uuid ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS,
            sort.as_column(),
            dir.as_sql()
        );

        let companies = sqlx::query_as::<_, Company>(&query)
            .bind(i64::from(limit))
            .bind(i64::from(start))
            .fetch_all(&self.pool)
            .await?;

        Ok(companies)
    }

    /// Total number of stored companies
    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create and store a new company, returning the stored record
    pub async fn save(
        &self,
        cnpj: &str,
        nomerazao: &str,
        nomefantasia: &str,
        cnae: &str,
    ) -> Result<Company, StorageError> {
        let company = Company::new(
            cnpj.to_string(),
            nomerazao.to_string(),
            nomefantasia.to_string(),
            cnae.to_string(),
        );
        self.insert(&company).await?;
        Ok(company)
    }

    /// Insert a company inside a transaction, rolling back on failure
    pub(crate) async fn insert(&self, company: &Company) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Insert)?;

        let result = sqlx::query(
            "INSERT INTO companies (uuid, cnpj, nomerazao, nomefantasia, cnae, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&company.uuid)
        .bind(&company.cnpj)
        .bind(&company.nomerazao)
        .bind(&company.nomefantasia)
        .bind(&company.cnae)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            warn!(uuid = %company.uuid, error = %e, "Insert failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            return Err(StorageError::Insert(e));
        }

        tx.commit().await.map_err(StorageError::Insert)?;

        debug!("Created company: {}", company.uuid);
        Ok(())
    }

    /// Find a company by uuid
    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Company>, StorageError> {
        let query = format!("SELECT {} FROM companies WHERE uuid = ?", SELECT_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    /// Update the trade name and/or activity code of a company
    ///
    /// `None` leaves the column untouched. `updated_at` is refreshed whenever
    /// a row matches. Returns the number of affected rows (0 = not found).
    pub async fn update(
        &self,
        uuid: &str,
        nomefantasia: Option<&str>,
        cnae: Option<&str>,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "UPDATE companies SET nomefantasia = COALESCE(?, nomefantasia), \
             cnae = COALESCE(?, cnae), updated_at = ? WHERE uuid = ?",
        )
        .bind(nomefantasia)
        .bind(cnae)
        .bind(Utc::now())
        .bind(uuid)
        .execute(&self.pool)
        .await?;

        debug!("Updated company {} ({} rows)", uuid, result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Delete every company registered under a tax id
    pub async fn delete_by_cnpj(&self, cnpj: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM companies WHERE cnpj = ?")
            .bind(cnpj)
            .execute(&self.pool)
            .await?;

        debug!("Deleted {} companies with cnpj {}", result.rows_affected(), cnpj);
        Ok(result.rows_affected())
    }
}

/// Split a migration file into executable statements, dropping `--` comments
fn schema_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let line = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        cleaned.push_str(line);
        cleaned.push(' ');
    }

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_db() -> (TempDir, CompanyDb) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.db");
        let db = CompanyDb::new(path.to_str().unwrap(), 5).await.unwrap();
        (dir, db)
    }

    #[test]
    fn test_schema_statements_strip_comments() {
        let statements = schema_statements(SCHEMA_SQL);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS companies"));
        assert!(statements[1].starts_with("CREATE INDEX IF NOT EXISTS"));
        assert!(statements.iter().all(|s| !s.contains("--")));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let (_dir, db) = create_test_db().await;
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("companies.db");
        let db = CompanyDb::new(path.to_str().unwrap(), 1).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let (_dir, db) = create_test_db().await;
        let saved = db.save("123", "Acme LTDA", "Acme", "6201-5").await.unwrap();

        let found = db.find_by_uuid(&saved.uuid).await.unwrap().unwrap();
        assert_eq!(found.cnpj, "123");
        assert_eq!(found.nomerazao, "Acme LTDA");
        assert_eq!(found.nomefantasia, "Acme");
        assert_eq!(found.cnae, "6201-5");
        assert_eq!(found.created_at, saved.created_at);

        assert!(db.find_by_uuid("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() {
        let (_dir, db) = create_test_db().await;
        let saved = db.save("123", "Acme LTDA", "Acme", "6201-5").await.unwrap();

        let duplicate = Company {
            cnpj: "999".to_string(),
            ..saved.clone()
        };
        let err = db.insert(&duplicate).await.unwrap_err();
        assert!(matches!(err, StorageError::Insert(_)));
        assert!(err
            .to_string()
            .starts_with("Erro ocorreu durante o registro da empresa"));

        assert_eq!(db.count().await.unwrap(), 1);
        let found = db.find_by_uuid(&saved.uuid).await.unwrap().unwrap();
        assert_eq!(found.cnpj, "123");
    }

    #[tokio::test]
    async fn test_list_pagination_and_order() {
        let (_dir, db) = create_test_db().await;
        for cnpj in ["30", "10", "50", "20", "40"] {
            db.save(cnpj, "Razao", "Fantasia", "0000").await.unwrap();
        }

        let asc = db
            .list(0, 10, SortField::Cnpj, SortDirection::Asc)
            .await
            .unwrap();
        let cnpjs: Vec<&str> = asc.iter().map(|c| c.cnpj.as_str()).collect();
        assert_eq!(cnpjs, vec!["10", "20", "30", "40", "50"]);

        let page = db
            .list(1, 2, SortField::Cnpj, SortDirection::Desc)
            .await
            .unwrap();
        let cnpjs: Vec<&str> = page.iter().map(|c| c.cnpj.as_str()).collect();
        assert_eq!(cnpjs, vec!["40", "30"]);

        let tail = db
            .list(4, 10, SortField::Cnpj, SortDirection::Asc)
            .await
            .unwrap();
        assert_eq!(tail.len(), 1);

        let past_end = db
            .list(5, 10, SortField::Cnpj, SortDirection::Asc)
            .await
            .unwrap();
        assert!(past_end.is_empty());

        let none = db
            .list(0, 0, SortField::Uuid, SortDirection::Asc)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let (_dir, db) = create_test_db().await;
        let saved = db.save("123", "Acme LTDA", "Acme", "6201-5").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let rows = db.update(&saved.uuid, None, Some("4751-2")).await.unwrap();
        assert_eq!(rows, 1);

        let found = db.find_by_uuid(&saved.uuid).await.unwrap().unwrap();
        assert_eq!(found.cnae, "4751-2");
        assert_eq!(found.nomefantasia, "Acme");
        assert_eq!(found.created_at, saved.created_at);
        assert!(found.updated_at > saved.updated_at);
        assert_ne!(found.updated_at, found.created_at);

        let rows = db.update(&saved.uuid, Some("Acme Store"), None).await.unwrap();
        assert_eq!(rows, 1);
        let found = db.find_by_uuid(&saved.uuid).await.unwrap().unwrap();
        assert_eq!(found.nomefantasia, "Acme Store");
        assert_eq!(found.cnae, "4751-2");
    }

    #[tokio::test]
    async fn test_update_missing_company() {
        let (_dir, db) = create_test_db().await;
        let rows = db.update("missing", Some("X"), None).await.unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_by_cnpj_removes_all_matches() {
        let (_dir, db) = create_test_db().await;
        db.save("123", "Acme LTDA", "Acme", "6201-5").await.unwrap();
        db.save("123", "Acme Filial LTDA", "Acme", "6201-5").await.unwrap();
        let other = db.save("456", "Other LTDA", "Other", "1111-1").await.unwrap();

        assert_eq!(db.delete_by_cnpj("123").await.unwrap(), 2);
        assert_eq!(db.delete_by_cnpj("123").await.unwrap(), 0);
        assert_eq!(db.count().await.unwrap(), 1);
        assert!(db.find_by_uuid(&other.uuid).await.unwrap().is_some());
    }
}
