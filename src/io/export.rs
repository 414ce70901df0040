use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, Company, Invoice};

/// Full-database snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub companies: Vec<Company>,
    pub invoices: Vec<Invoice>,
}

/// Exporter for converting ledger data to tabular and snapshot formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export companies to CSV format
    pub async fn export_companies_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let companies = self.service.list_companies().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["code", "name", "description"])?;

        let mut count = 0;
        for company in &companies {
            csv_writer.write_record([
                company.code.as_str(),
                company.name.as_str(),
                company.description.as_deref().unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export invoices to CSV format
    pub async fn export_invoices_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let invoices = self.service.list_invoices_full().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "comp_code", "amt", "paid", "add_date", "paid_date"])?;

        let mut count = 0;
        for invoice in &invoices {
            csv_writer.write_record([
                invoice.id.to_string(),
                invoice.comp_code.clone(),
                format_cents(invoice.amt_cents),
                invoice.paid.to_string(),
                invoice.add_date.to_string(),
                invoice
                    .paid_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full database as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let companies = self.service.list_companies().await?;
        let invoices = self.service.list_invoices_full().await?;

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            companies,
            invoices,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
