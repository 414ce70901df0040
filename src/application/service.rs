use serde::{Deserialize, Serialize};

use crate::domain::{
    build_integrity_report, Cents, Company, CompanyPatch, IntegrityReport, Invoice, InvoiceId,
    InvoicePatch, InvoiceSummary,
};
use crate::storage::{self, CompanyStore, InvoiceStore};

use super::AppError;

/// Application service providing high-level operations for the ledger.
/// This is the single surface any transport (CLI, API, TUI) calls into.
pub struct LedgerService {
    companies: CompanyStore,
    invoices: InvoiceStore,
}

/// An invoice composed with its resolved company. An orphaned reference
/// (possible only through external tampering) yields `company: None` rather
/// than a hard failure; the integrity report is where orphans surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub company: Option<Company>,
}

/// A company composed with all of its invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub company: Company,
    pub invoices: Vec<Invoice>,
}

impl LedgerService {
    /// Create a service over an already-connected pool's stores.
    pub fn new(companies: CompanyStore, invoices: InvoiceStore) -> Self {
        Self {
            companies,
            invoices,
        }
    }

    /// Initialize a new database at the given path (connect + migrate).
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = storage::connect(&db_url).await?;
        storage::migrate(&pool).await?;
        Ok(Self::new(
            CompanyStore::new(pool.clone()),
            InvoiceStore::new(pool),
        ))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let pool = storage::connect(&db_url).await?;
        Ok(Self::new(
            CompanyStore::new(pool.clone()),
            InvoiceStore::new(pool),
        ))
    }

    // ========================
    // Company operations
    // ========================

    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        self.companies.list().await
    }

    /// Get a company with all of its invoices.
    pub async fn get_company(&self, code: &str) -> Result<CompanyDetail, AppError> {
        let company = self.companies.get_by_code(code).await?;
        let invoices = self.invoices.list_for_company(code).await?;
        Ok(CompanyDetail { company, invoices })
    }

    pub async fn create_company(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Company, AppError> {
        self.companies.create(code, name, description).await
    }

    pub async fn update_company(
        &self,
        code: &str,
        patch: CompanyPatch,
    ) -> Result<Company, AppError> {
        self.companies.update(code, patch).await
    }

    pub async fn delete_company(&self, code: &str) -> Result<(), AppError> {
        self.companies.delete(code).await
    }

    // ========================
    // Invoice operations
    // ========================

    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        self.invoices.list().await
    }

    /// Get an invoice composed with its resolved company.
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceDetail, AppError> {
        let invoice = self.invoices.get(id).await?;
        let company = match self.companies.get_by_code(&invoice.comp_code).await {
            Ok(company) => Some(company),
            Err(AppError::CompanyNotFound(_)) => None,
            Err(other) => return Err(other),
        };
        Ok(InvoiceDetail { invoice, company })
    }

    pub async fn create_invoice(
        &self,
        comp_code: &str,
        amt_cents: Cents,
    ) -> Result<Invoice, AppError> {
        self.invoices.create(comp_code, amt_cents).await
    }

    pub async fn update_invoice(
        &self,
        id: InvoiceId,
        patch: InvoicePatch,
    ) -> Result<Invoice, AppError> {
        self.invoices.update(id, patch).await
    }

    pub async fn delete_invoice(&self, id: InvoiceId) -> Result<(), AppError> {
        self.invoices.delete(id).await
    }

    // ========================
    // Integrity operations
    // ========================

    /// Check the whole ledger against its invariants.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let companies = self.companies.list().await?;
        let invoices = self.invoices.list_full().await?;
        Ok(build_integrity_report(&companies, &invoices))
    }

    /// Every full invoice row, for export.
    pub async fn list_invoices_full(&self) -> Result<Vec<Invoice>, AppError> {
        self.invoices.list_full().await
    }
}
