//! Domain types for credit cards and their billing records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::month::CompetenceMonth;

/// A credit instrument. The card owns its per-month snapshots; purchase and
/// payment records live on the ledger keyed by `card_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub base_limit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_day: Option<u32>,
    /// Month overrides, ordered chronologically so the limit fallback chain is
    /// a backward range scan instead of a linear walk over history.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub snapshots: BTreeMap<CompetenceMonth, MonthSnapshot>,
}

impl Card {
    pub fn new(name: impl Into<String>, base_limit: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_limit,
            closing_day: None,
            due_day: None,
            snapshots: BTreeMap::new(),
        }
    }

    pub fn with_cycle_days(mut self, closing_day: u32, due_day: u32) -> Self {
        self.closing_day = Some(closing_day);
        self.due_day = Some(due_day);
        self
    }

    pub fn snapshot(&self, competence: CompetenceMonth) -> Option<&MonthSnapshot> {
        self.snapshots.get(&competence)
    }

    /// Manual invoice adjustment for the month, zero when no snapshot exists.
    pub fn adjustment_for(&self, competence: CompetenceMonth) -> Decimal {
        self.snapshots
            .get(&competence)
            .map(|snapshot| snapshot.adjustment)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Identifiable for Card {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Card {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Card {
    fn display_label(&self) -> String {
        format!("{} (limit {})", self.name, self.base_limit)
    }
}

/// Per-month override row for a card. An absent row means no override and a
/// zero adjustment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<Decimal>,
    #[serde(default)]
    pub adjustment: Decimal,
}

impl MonthSnapshot {
    pub fn is_default(&self) -> bool {
        self.monthly_limit.is_none() && self.adjustment == Decimal::ZERO
    }
}

/// Patch applied by a snapshot upsert. The call carries the caller's complete
/// intent for the row: `monthly_limit` of `Some(None)` clears the override,
/// `None` leaves the stored value untouched, and the adjustment is always
/// concrete (callers pass zero for "no adjustment").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitPatch {
    pub monthly_limit: Option<Option<Decimal>>,
    #[serde(default)]
    pub adjustment: Decimal,
}

/// One purchase or payment billed to a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardEntry {
    pub id: Uuid,
    pub card_id: Uuid,
    pub kind: CardEntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    /// The month the amount is billed to; defaults to the date's month.
    pub competence: CompetenceMonth,
    /// Present when the planner emitted this purchase for a finance entry, so
    /// a re-plan updates the record instead of duplicating it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_entry_id: Option<Uuid>,
}

impl CardEntry {
    pub fn new(card_id: Uuid, kind: CardEntryKind, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            kind,
            description: None,
            date,
            amount,
            competence: CompetenceMonth::of(date),
            source_entry_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_competence(mut self, competence: CompetenceMonth) -> Self {
        self.competence = competence;
        self
    }
}

impl Identifiable for CardEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for CardEntry {
    fn display_label(&self) -> String {
        format!("{} {} on {}", self.kind, self.amount, self.date)
    }
}

/// Record identity; immutable after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardEntryKind {
    Purchase,
    Payment,
}

impl fmt::Display for CardEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CardEntryKind::Purchase => "Purchase",
            CardEntryKind::Payment => "Payment",
        };
        f.write_str(label)
    }
}
