use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{AppError, ErrorBody, LedgerService};
use crate::domain::{format_cents, parse_cents, CompanyPatch, InvoicePatch};

/// Fattura - Company & Invoice Ledger
#[derive(Parser)]
#[command(name = "fattura")]
#[command(about = "A local-first ledger of companies and their invoices")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "fattura.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Company management commands
    #[command(subcommand)]
    Company(CompanyCommands),

    /// Invoice management commands
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: companies, invoices, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Add a new company
    Add {
        /// Short unique code (immutable once created)
        code: String,

        /// Display name
        name: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all companies
    List,

    /// Show a company and its invoices
    Show {
        /// Company code
        code: String,
    },

    /// Update a company's name and/or description
    Update {
        /// Company code
        code: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a company (fails while invoices still reference it)
    Delete {
        /// Company code
        code: String,
    },
}

#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// Add a new invoice for a company
    Add {
        /// Company code the invoice belongs to
        comp_code: String,

        /// Invoice amount (e.g., "100" or "100.50")
        amount: String,
    },

    /// List all invoices
    List,

    /// Show an invoice with its company
    Show {
        /// Invoice id
        id: i64,
    },

    /// Update an invoice's amount and/or payment state
    Update {
        /// Invoice id
        id: i64,

        /// New amount (e.g., "100" or "100.50")
        #[arg(short, long)]
        amount: Option<String>,

        /// Mark as paid (true) or unpaid (false)
        #[arg(short, long)]
        paid: Option<bool>,
    },

    /// Delete an invoice
    Delete {
        /// Invoice id
        id: i64,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Commands::Init = self.command {
            LedgerService::init(&self.database).await.map_err(render)?;
            println!("Database initialized: {}", self.database);
            return Ok(());
        }

        let service = LedgerService::connect(&self.database).await.map_err(render)?;

        let result = match self.command {
            Commands::Init => unreachable!(),
            Commands::Company(cmd) => run_company_command(&service, cmd).await,
            Commands::Invoice(cmd) => run_invoice_command(&service, cmd).await,
            Commands::Check => run_check_command(&service).await,
            Commands::Export {
                export_type,
                output,
            } => return run_export_command(&service, &export_type, output.as_deref()).await,
        };

        result.map_err(render)
    }
}

/// Render a typed failure as the transport envelope and surface a terse
/// error for the exit code.
fn render(err: AppError) -> anyhow::Error {
    let body = ErrorBody::from(&err);
    match serde_json::to_string(&body) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", body.message),
    }
    anyhow::anyhow!("command failed")
}

async fn run_company_command(
    service: &LedgerService,
    cmd: CompanyCommands,
) -> Result<(), AppError> {
    match cmd {
        CompanyCommands::Add {
            code,
            name,
            description,
        } => {
            let company = service
                .create_company(&code, &name, description.as_deref())
                .await?;
            println!("Created company: {} ({})", company.name, company.code);
        }

        CompanyCommands::List => {
            let companies = service.list_companies().await?;
            if companies.is_empty() {
                println!("No companies found.");
            } else {
                println!("{:<12} {:<30}", "CODE", "NAME");
                println!("{}", "-".repeat(42));
                for company in companies {
                    println!("{:<12} {:<30}", company.code, company.name);
                }
            }
        }

        CompanyCommands::Show { code } => {
            let detail = service.get_company(&code).await?;
            println!("Company: {}", detail.company.name);
            println!("  Code:        {}", detail.company.code);
            if let Some(desc) = &detail.company.description {
                println!("  Description: {}", desc);
            }
            if detail.invoices.is_empty() {
                println!("  No invoices.");
            } else {
                println!("  Invoices:");
                for invoice in detail.invoices {
                    println!(
                        "    #{:<6} {:>12}  {}  added {}",
                        invoice.id,
                        format_cents(invoice.amt_cents),
                        invoice.state(),
                        invoice.add_date
                    );
                }
            }
        }

        CompanyCommands::Update {
            code,
            name,
            description,
        } => {
            let patch = CompanyPatch { name, description };
            let company = service.update_company(&code, patch).await?;
            println!("Updated company: {} ({})", company.name, company.code);
        }

        CompanyCommands::Delete { code } => {
            service.delete_company(&code).await?;
            println!("Deleted company: {}", code);
        }
    }
    Ok(())
}

async fn run_invoice_command(
    service: &LedgerService,
    cmd: InvoiceCommands,
) -> Result<(), AppError> {
    match cmd {
        InvoiceCommands::Add { comp_code, amount } => {
            let amt_cents = parse_amount(&amount)?;
            let invoice = service.create_invoice(&comp_code, amt_cents).await?;
            println!(
                "Created invoice #{} for {}: {}",
                invoice.id,
                invoice.comp_code,
                format_cents(invoice.amt_cents)
            );
        }

        InvoiceCommands::List => {
            let invoices = service.list_invoices().await?;
            if invoices.is_empty() {
                println!("No invoices found.");
            } else {
                println!("{:<8} {:<12}", "ID", "COMPANY");
                println!("{}", "-".repeat(20));
                for invoice in invoices {
                    println!("{:<8} {:<12}", invoice.id, invoice.comp_code);
                }
            }
        }

        InvoiceCommands::Show { id } => {
            let detail = service.get_invoice(id).await?;
            let invoice = &detail.invoice;
            println!("Invoice #{}", invoice.id);
            println!("  Amount:    {}", format_cents(invoice.amt_cents));
            println!("  State:     {}", invoice.state());
            println!("  Added:     {}", invoice.add_date);
            if let Some(paid_date) = invoice.paid_date {
                println!("  Paid:      {}", paid_date);
            }
            match &detail.company {
                Some(company) => {
                    println!("  Company:   {} ({})", company.name, company.code);
                }
                None => {
                    println!("  Company:   <unresolved: {}>", invoice.comp_code);
                }
            }
        }

        InvoiceCommands::Update { id, amount, paid } => {
            let amt_cents = amount.as_deref().map(parse_amount).transpose()?;
            let patch = InvoicePatch { amt_cents, paid };
            let invoice = service.update_invoice(id, patch).await?;
            println!(
                "Updated invoice #{}: {} ({})",
                invoice.id,
                format_cents(invoice.amt_cents),
                invoice.state()
            );
        }

        InvoiceCommands::Delete { id } => {
            service.delete_invoice(id).await?;
            println!("Deleted invoice #{}", id);
        }
    }
    Ok(())
}

/// The CLI parses amount shape; the stores re-check the numeric domain.
fn parse_amount(input: &str) -> Result<i64, AppError> {
    parse_cents(input).map_err(|_| {
        AppError::Validation(crate::domain::ValidationError::NotNumeric {
            field: "amt".into(),
            input: input.to_string(),
        })
    })
}

async fn run_check_command(service: &LedgerService) -> Result<(), AppError> {
    let report = service.check_integrity().await?;

    println!(
        "Ledger: {} companies, {} invoices",
        report.company_count, report.invoice_count
    );

    if report.is_clean() {
        println!("Integrity check passed.");
    } else {
        if !report.orphaned_invoices.is_empty() {
            println!("Orphaned invoices: {:?}", report.orphaned_invoices);
        }
        if !report.invalid_amounts.is_empty() {
            println!("Invalid amounts: {:?}", report.invalid_amounts);
        }
        if !report.payment_state_violations.is_empty() {
            println!(
                "Payment state violations: {:?}",
                report.payment_state_violations
            );
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "companies" => {
            let count = exporter.export_companies_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} companies", count);
            }
        }
        "invoices" => {
            let count = exporter.export_invoices_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} invoices", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} companies, {} invoices",
                    snapshot.companies.len(),
                    snapshot.invoices.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: companies, invoices, full",
                export_type
            );
        }
    }

    Ok(())
}
