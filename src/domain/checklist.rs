//! Domain types for monthly reconciliation of planned entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entry::EntryKind;
use crate::domain::month::CompetenceMonth;

/// Reconciliation flag for one entry occurrence. Unmarked occurrences have no
/// row at all; a stored mark is always `checked = true` or a leftover being
/// removed within the same bulk apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistMark {
    pub entry_id: Uuid,
    pub competence: CompetenceMonth,
    pub checked: bool,
    /// Set when `checked` transitioned false to true, cleared on the way back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

/// One row of the monthly checklist: an entry occurrence joined with its mark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItem {
    pub entry_id: Uuid,
    pub name: String,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub occurrence_date: NaiveDate,
    pub competence: CompetenceMonth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_index: Option<u32>,
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

/// A caller's intent for one entry's mark in a bulk apply. Intents equal to
/// the persisted state are no-ops.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkUpdate {
    pub entry_id: Uuid,
    pub checked: bool,
}

/// Derived month totals. Computed from the returned items, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Sum of checked income items.
    pub received: Decimal,
    /// Sum of checked expense items.
    pub paid: Decimal,
    /// received − paid: the month's balance as of what actually happened.
    pub balance_now: Decimal,
    /// total_income − total_expense: the month's balance if everything lands.
    pub balance_total: Decimal,
    pub remaining_income: Decimal,
    pub remaining_expense: Decimal,
    pub marked: usize,
    pub total: usize,
}

impl ChecklistSummary {
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let mut summary = ChecklistSummary::default();
        summary.total = items.len();
        for item in items {
            match item.kind {
                EntryKind::Income => {
                    summary.total_income += item.amount;
                    if item.checked {
                        summary.received += item.amount;
                    }
                }
                EntryKind::Expense => {
                    summary.total_expense += item.amount;
                    if item.checked {
                        summary.paid += item.amount;
                    }
                }
            }
            if item.checked {
                summary.marked += 1;
            }
        }
        summary.balance_now = summary.received - summary.paid;
        summary.balance_total = summary.total_income - summary.total_expense;
        summary.remaining_income = summary.total_income - summary.received;
        summary.remaining_expense = summary.total_expense - summary.paid;
        summary
    }
}
