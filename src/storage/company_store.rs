use anyhow::Context;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::application::AppError;
use crate::domain::{require_non_empty, require_some_field, Company, CompanyPatch};

/// Store owning the `companies` table and its invariants: unique immutable
/// codes, required names, and the delete-while-referenced guard.
#[derive(Clone)]
pub struct CompanyStore {
    pool: SqlitePool,
}

impl CompanyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all companies in creation order.
    pub async fn list(&self) -> Result<Vec<Company>, AppError> {
        let rows = sqlx::query("SELECT code, name, description FROM companies ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list companies")?;

        Ok(rows.iter().map(row_to_company).collect())
    }

    /// Get a company by code.
    pub async fn get_by_code(&self, code: &str) -> Result<Company, AppError> {
        fetch_by_code(&self.pool, code)
            .await?
            .ok_or_else(|| AppError::CompanyNotFound(code.to_string()))
    }

    /// Create a new company. The code is chosen by the caller and immutable
    /// afterwards.
    pub async fn create(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Company, AppError> {
        require_non_empty(code, "code")?;
        require_non_empty(name, "name")?;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        if fetch_by_code(&mut *tx, code).await?.is_some() {
            return Err(AppError::CompanyExists(code.to_string()));
        }

        sqlx::query("INSERT INTO companies (code, name, description) VALUES (?, ?, ?)")
            .bind(code)
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await
            .context("Failed to insert company")?;

        tx.commit().await.context("Failed to commit company insert")?;

        Ok(Company {
            code: code.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Apply a partial update to `name`/`description`. Omitted fields retain
    /// their prior values.
    pub async fn update(&self, code: &str, patch: CompanyPatch) -> Result<Company, AppError> {
        require_some_field(!patch.is_empty())?;
        if let Some(name) = &patch.name {
            require_non_empty(name, "name")?;
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let mut company = fetch_by_code(&mut *tx, code)
            .await?
            .ok_or_else(|| AppError::CompanyNotFound(code.to_string()))?;

        if let Some(name) = patch.name {
            company.name = name;
        }
        if let Some(description) = patch.description {
            company.description = Some(description);
        }

        sqlx::query("UPDATE companies SET name = ?, description = ? WHERE code = ?")
            .bind(&company.name)
            .bind(&company.description)
            .bind(code)
            .execute(&mut *tx)
            .await
            .context("Failed to update company")?;

        tx.commit().await.context("Failed to commit company update")?;

        Ok(company)
    }

    /// Delete a company. Fails while any invoice still references the code;
    /// the reference check and the delete run in one transaction.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        if fetch_by_code(&mut *tx, code).await?.is_none() {
            return Err(AppError::CompanyNotFound(code.to_string()));
        }

        let referencing: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM invoices WHERE comp_code = ?")
                .bind(code)
                .fetch_one(&mut *tx)
                .await
                .context("Failed to count referencing invoices")?
                .get("count");

        if referencing > 0 {
            return Err(AppError::CompanyHasInvoices {
                code: code.to_string(),
                count: referencing,
            });
        }

        sqlx::query("DELETE FROM companies WHERE code = ?")
            .bind(code)
            .execute(&mut *tx)
            .await
            .context("Failed to delete company")?;

        tx.commit().await.context("Failed to commit company delete")?;
        Ok(())
    }
}

/// Shared lookup used both here and by the invoice store's referential
/// checks, so those checks can run inside the invoice store's transaction.
pub(crate) async fn fetch_by_code<'e, E>(
    executor: E,
    code: &str,
) -> Result<Option<Company>, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let row = sqlx::query("SELECT code, name, description FROM companies WHERE code = ?")
        .bind(code)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch company")?;

    Ok(row.as_ref().map(row_to_company))
}

fn row_to_company(row: &SqliteRow) -> Company {
    Company {
        code: row.get("code"),
        name: row.get("name"),
        description: row.get("description"),
    }
}
