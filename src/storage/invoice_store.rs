use anyhow::Context;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::application::AppError;
use crate::domain::{
    require_positive_amount, require_some_field, Cents, Invoice, InvoiceId, InvoicePatch,
    InvoiceSummary,
};

use super::company_store;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store owning the `invoices` table: referential integrity against company
/// codes, the positive-amount rule, and the payment state machine.
///
/// Company rows are never mutated from here; the company store is consulted
/// read-only to resolve `comp_code`.
#[derive(Clone)]
pub struct InvoiceStore {
    pool: SqlitePool,
}

impl InvoiceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all invoices as `{id, comp_code}` summaries, in creation order.
    pub async fn list(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let rows = sqlx::query("SELECT id, comp_code FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list invoices")?;

        Ok(rows
            .iter()
            .map(|row| InvoiceSummary {
                id: row.get("id"),
                comp_code: row.get("comp_code"),
            })
            .collect())
    }

    /// Get a full invoice row by id.
    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, AppError> {
        let row = sqlx::query(
            "SELECT id, comp_code, amt_cents, paid, add_date, paid_date FROM invoices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch invoice")?;

        match row {
            Some(row) => row_to_invoice(&row),
            None => Err(AppError::InvoiceNotFound(id)),
        }
    }

    /// List full invoice rows for one company, in creation order.
    pub async fn list_for_company(&self, comp_code: &str) -> Result<Vec<Invoice>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, comp_code, amt_cents, paid, add_date, paid_date
            FROM invoices
            WHERE comp_code = ?
            ORDER BY id
            "#,
        )
        .bind(comp_code)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list invoices for company")?;

        rows.iter().map(row_to_invoice).collect()
    }

    /// List every full invoice row. Used by the integrity report and export.
    pub async fn list_full(&self) -> Result<Vec<Invoice>, AppError> {
        let rows = sqlx::query(
            "SELECT id, comp_code, amt_cents, paid, add_date, paid_date FROM invoices ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list invoices")?;

        rows.iter().map(row_to_invoice).collect()
    }

    /// Create a new invoice for an existing company. The row starts unpaid,
    /// dated today, with a store-assigned sequential id. The referential
    /// check and the insert run in one transaction.
    pub async fn create(&self, comp_code: &str, amt_cents: Cents) -> Result<Invoice, AppError> {
        require_positive_amount(amt_cents, "amt")?;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        if company_store::fetch_by_code(&mut *tx, comp_code)
            .await?
            .is_none()
        {
            return Err(AppError::CompanyNotFound(comp_code.to_string()));
        }

        let mut invoice = Invoice::new(comp_code, amt_cents, Utc::now().date_naive());

        let row = sqlx::query(
            r#"
            INSERT INTO invoices (comp_code, amt_cents, paid, add_date, paid_date)
            VALUES (?, ?, 0, ?, NULL)
            RETURNING id
            "#,
        )
        .bind(&invoice.comp_code)
        .bind(invoice.amt_cents)
        .bind(invoice.add_date.format(DATE_FORMAT).to_string())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert invoice")?;

        invoice.id = row.get("id");

        tx.commit().await.context("Failed to commit invoice insert")?;
        Ok(invoice)
    }

    /// Apply a partial update: a new amount, a paid-flag transition, or both.
    /// The read-modify-write runs in one transaction so the paid_date stamp
    /// always matches the state observed.
    pub async fn update(&self, id: InvoiceId, patch: InvoicePatch) -> Result<Invoice, AppError> {
        require_some_field(!patch.is_empty())?;
        if let Some(amt_cents) = patch.amt_cents {
            require_positive_amount(amt_cents, "amt")?;
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query(
            "SELECT id, comp_code, amt_cents, paid, add_date, paid_date FROM invoices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch invoice")?;

        let mut invoice = match row {
            Some(row) => row_to_invoice(&row)?,
            None => return Err(AppError::InvoiceNotFound(id)),
        };

        if let Some(amt_cents) = patch.amt_cents {
            invoice.amt_cents = amt_cents;
        }
        if let Some(paid) = patch.paid {
            invoice.apply_paid_flag(paid, Utc::now().date_naive());
        }

        sqlx::query("UPDATE invoices SET amt_cents = ?, paid = ?, paid_date = ? WHERE id = ?")
            .bind(invoice.amt_cents)
            .bind(invoice.paid as i32)
            .bind(
                invoice
                    .paid_date
                    .map(|d| d.format(DATE_FORMAT).to_string()),
            )
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to update invoice")?;

        tx.commit().await.context("Failed to commit invoice update")?;
        Ok(invoice)
    }

    /// Delete an invoice. The company it referenced is untouched.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete invoice")?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvoiceNotFound(id));
        }
        Ok(())
    }
}

fn row_to_invoice(row: &SqliteRow) -> Result<Invoice, AppError> {
    let add_date_str: String = row.get("add_date");
    let paid_date_str: Option<String> = row.get("paid_date");

    Ok(Invoice {
        id: row.get("id"),
        comp_code: row.get("comp_code"),
        amt_cents: row.get("amt_cents"),
        paid: row.get::<i32, _>("paid") != 0,
        add_date: NaiveDate::parse_from_str(&add_date_str, DATE_FORMAT)
            .context("Invalid add_date")?,
        paid_date: paid_date_str
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .context("Invalid paid_date")?,
    })
}
