//! Domain types for planned income and expense entries.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::month::CompetenceMonth;

/// One planned income or expense occurrence series produced by the planner.
///
/// `end_date` bounds the months the entry occurs in; an open end means the
/// entry repeats every month from its start month onward. When `installments`
/// is set, `end_date` is derived from it and is not independently editable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceEntry {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub category_id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Uuid>,
}

impl FinanceEntry {
    /// The competence month of the entry's first occurrence.
    pub fn competence(&self) -> CompetenceMonth {
        CompetenceMonth::of(self.start_date)
    }

    /// True when the entry is pinned to a single month (end = start, no
    /// installments).
    pub fn is_unique(&self) -> bool {
        self.end_date == Some(self.start_date) && self.installments.is_none()
    }

    pub fn is_card_expense(&self) -> bool {
        self.payment_method == Some(PaymentMethod::Card)
    }

    /// The entry's occurrence inside `competence`, if any. The occurrence date
    /// keeps the start day, truncated into the target month; the installment
    /// position is 1-based when installments apply.
    pub fn occurrence_in(&self, competence: CompetenceMonth) -> Option<EntryOccurrence> {
        let first = self.competence();
        if competence < first {
            return None;
        }
        if let Some(end) = self.end_date {
            if competence > CompetenceMonth::of(end) {
                return None;
            }
        }
        let position = competence.months_since(first) as u32 + 1;
        Some(EntryOccurrence {
            date: competence.date_with_day(self.start_date.day()),
            installment_index: self.installments.map(|_| position),
        })
    }
}

impl Identifiable for FinanceEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FinanceEntry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for FinanceEntry {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// A single dated occurrence of an entry within one competence month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryOccurrence {
    pub date: NaiveDate,
    pub installment_index: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// How an expense is settled. Entries paid by card feed the card ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Cash,
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
        };
        f.write_str(label)
    }
}

/// Expansion strategy applied when saving a draft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanMode {
    /// One entry, updated in place when editing.
    Single,
    /// The draft plus a copy advanced by one calendar month (creation only).
    Next,
    /// One entry per month from the start month through the end month.
    Range,
}

/// Unvalidated input consumed by the planner. Field presence is checked by
/// the planner, not by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub category_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub installments: Option<u32>,
    pub payment_method: Option<PaymentMethod>,
    pub card_id: Option<Uuid>,
    /// Pins the entry to its start month (end = start, installments cleared).
    #[serde(default)]
    pub unique: bool,
}
