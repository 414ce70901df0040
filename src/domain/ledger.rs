use std::collections::HashSet;

use super::{Company, Invoice, InvoiceId};

/// Result of checking the whole dataset against the ledger invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub company_count: usize,
    pub invoice_count: usize,
    /// Invoices whose comp_code matches no company.
    pub orphaned_invoices: Vec<InvoiceId>,
    /// Invoices with a zero or negative amount.
    pub invalid_amounts: Vec<InvoiceId>,
    /// Invoices where `paid` and `paid_date` disagree.
    pub payment_state_violations: Vec<InvoiceId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_invoices.is_empty()
            && self.invalid_amounts.is_empty()
            && self.payment_state_violations.is_empty()
    }
}

/// Check every invoice against the ledger invariants: referential integrity,
/// positive amounts, and the paid/paid_date bijection.
pub fn build_integrity_report(companies: &[Company], invoices: &[Invoice]) -> IntegrityReport {
    let codes: HashSet<&str> = companies.iter().map(|c| c.code.as_str()).collect();

    let mut report = IntegrityReport {
        company_count: companies.len(),
        invoice_count: invoices.len(),
        orphaned_invoices: Vec::new(),
        invalid_amounts: Vec::new(),
        payment_state_violations: Vec::new(),
    };

    for invoice in invoices {
        if !codes.contains(invoice.comp_code.as_str()) {
            report.orphaned_invoices.push(invoice.id);
        }
        if invoice.amt_cents <= 0 {
            report.invalid_amounts.push(invoice.id);
        }
        if !invoice.payment_fields_consistent() {
            report.payment_state_violations.push(invoice.id);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn invoice(id: i64, comp_code: &str, amt_cents: i64) -> Invoice {
        Invoice {
            id,
            ..Invoice::new(comp_code, amt_cents, day("2024-01-01"))
        }
    }

    #[test]
    fn test_clean_ledger() {
        let companies = vec![Company::new("apple", "Apple Computer")];
        let invoices = vec![invoice(1, "apple", 10000)];

        let report = build_integrity_report(&companies, &invoices);
        assert!(report.is_clean());
        assert_eq!(report.company_count, 1);
        assert_eq!(report.invoice_count, 1);
    }

    #[test]
    fn test_detects_orphaned_invoice() {
        let companies = vec![Company::new("apple", "Apple Computer")];
        let invoices = vec![invoice(1, "apple", 10000), invoice(2, "ghost", 500)];

        let report = build_integrity_report(&companies, &invoices);
        assert!(!report.is_clean());
        assert_eq!(report.orphaned_invoices, vec![2]);
    }

    #[test]
    fn test_detects_invalid_amount() {
        let companies = vec![Company::new("apple", "Apple Computer")];
        let invoices = vec![invoice(1, "apple", 0), invoice(2, "apple", -100)];

        let report = build_integrity_report(&companies, &invoices);
        assert_eq!(report.invalid_amounts, vec![1, 2]);
    }

    #[test]
    fn test_detects_payment_state_violation() {
        let companies = vec![Company::new("apple", "Apple Computer")];
        let mut broken = invoice(1, "apple", 10000);
        broken.paid = true; // paid without a paid_date

        let report = build_integrity_report(&companies, &[broken]);
        assert_eq!(report.payment_state_violations, vec![1]);
    }

    #[test]
    fn test_empty_ledger_is_clean() {
        let report = build_integrity_report(&[], &[]);
        assert!(report.is_clean());
        assert_eq!(report.company_count, 0);
        assert_eq!(report.invoice_count, 0);
    }
}
