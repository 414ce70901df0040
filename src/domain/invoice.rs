use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

pub type InvoiceId = i64;

/// Payment state of an invoice. The state and the `paid_date` field move
/// together: `Unpaid` means no date, `Paid` means a date is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Unpaid,
    Paid,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Unpaid => "unpaid",
            PaymentState::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial obligation owed by a company.
///
/// `id` and `add_date` are immutable once assigned. `comp_code` must always
/// reference an existing company; the store layer enforces that before any
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub comp_code: String,
    pub amt_cents: Cents,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl Invoice {
    /// A fresh, unpaid invoice. The id is a placeholder until the store
    /// assigns one.
    pub fn new(comp_code: impl Into<String>, amt_cents: Cents, add_date: NaiveDate) -> Self {
        Self {
            id: 0,
            comp_code: comp_code.into(),
            amt_cents,
            paid: false,
            add_date,
            paid_date: None,
        }
    }

    pub fn state(&self) -> PaymentState {
        if self.paid {
            PaymentState::Paid
        } else {
            PaymentState::Unpaid
        }
    }

    /// Drive the payment state machine with a requested `paid` flag.
    ///
    /// Unpaid -> Paid stamps `paid_date` with `today`; Paid -> Unpaid clears
    /// it. Requesting the current state is a no-op and leaves `paid_date`
    /// untouched.
    pub fn apply_paid_flag(&mut self, paid: bool, today: NaiveDate) {
        match (self.paid, paid) {
            (false, true) => {
                self.paid = true;
                self.paid_date = Some(today);
            }
            (true, false) => {
                self.paid = false;
                self.paid_date = None;
            }
            _ => {}
        }
    }

    /// The paid/paid_date bijection: `paid` iff `paid_date` is set.
    pub fn payment_fields_consistent(&self) -> bool {
        self.paid == self.paid_date.is_some()
    }
}

/// Lightweight listing projection: full detail requires a `get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: InvoiceId,
    pub comp_code: String,
}

/// Partial update for an invoice. `id`, `comp_code` and `add_date` are
/// immutable and have no place here.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoicePatch {
    pub amt_cents: Option<Cents>,
    pub paid: Option<bool>,
}

impl InvoicePatch {
    pub fn is_empty(&self) -> bool {
        self.amt_cents.is_none() && self.paid.is_none()
    }
}
