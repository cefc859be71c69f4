//! Card CRUD, monthly snapshot upserts, billing records, and statements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{Card, CardEntry, CardEntryKind, CompetenceMonth, LimitPatch};
use crate::ledger::statement::{statement_for, Statement};
use crate::ledger::Ledger;

/// One card's statement summary for the month, as listed on the overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardBalance {
    pub name: String,
    pub statement: Statement,
}

/// Fields a billing record edit may change. Kind is identity and stays fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardEntryPatch {
    pub description: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
}

pub struct CardService;

impl CardService {
    pub fn add(
        ledger: &mut Ledger,
        name: &str,
        base_limit: Decimal,
        closing_day: Option<u32>,
        due_day: Option<u32>,
    ) -> ServiceResult<Uuid> {
        Self::validate_card_fields(name, base_limit, closing_day, due_day)?;
        let mut card = Card::new(name.trim(), base_limit);
        card.closing_day = closing_day;
        card.due_day = due_day;
        Ok(ledger.add_card(card))
    }

    pub fn edit(
        ledger: &mut Ledger,
        id: Uuid,
        name: &str,
        base_limit: Decimal,
        closing_day: Option<u32>,
        due_day: Option<u32>,
    ) -> ServiceResult<()> {
        Self::validate_card_fields(name, base_limit, closing_day, due_day)?;
        let card = ledger
            .card_mut(id)
            .ok_or_else(|| CoreError::not_found("card", id))?;
        card.name = name.trim().to_string();
        card.base_limit = base_limit;
        card.closing_day = closing_day;
        card.due_day = due_day;
        ledger.touch();
        Ok(())
    }

    /// Removes the card together with the snapshots and billing records it
    /// owns.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Card> {
        ledger
            .remove_card(id)
            .ok_or_else(|| CoreError::not_found("card", id))
    }

    pub fn list<'a>(ledger: &'a Ledger) -> Vec<&'a Card> {
        ledger.cards.iter().collect()
    }

    /// Derives the card's statement for a month from its lifetime records.
    pub fn statement(
        ledger: &Ledger,
        card_id: Uuid,
        competence: CompetenceMonth,
    ) -> ServiceResult<Statement> {
        let card = ledger
            .card(card_id)
            .ok_or_else(|| CoreError::not_found("card", card_id))?;
        let entries = ledger.entries_of_card(card_id);
        Ok(statement_for(card, &entries, competence))
    }

    /// One statement row per card for the month.
    pub fn monthly_balances(ledger: &Ledger, competence: CompetenceMonth) -> Vec<CardBalance> {
        ledger
            .cards
            .iter()
            .map(|card| CardBalance {
                name: card.name.clone(),
                statement: statement_for(card, &ledger.entries_of_card(card.id), competence),
            })
            .collect()
    }

    /// Applies a month override. The patch carries the caller's complete
    /// intent for the row: an explicit `None` limit clears the override, an
    /// absent limit keeps the stored one, and the adjustment is always
    /// concrete. A row left at its defaults is dropped so absence stays the
    /// canonical "no override" state.
    pub fn upsert_snapshot(
        ledger: &mut Ledger,
        card_id: Uuid,
        competence: CompetenceMonth,
        patch: LimitPatch,
    ) -> ServiceResult<()> {
        if let Some(Some(limit)) = patch.monthly_limit {
            if limit < Decimal::ZERO {
                return Err(CoreError::validation("monthly limit must not be negative"));
            }
        }
        let card = ledger
            .card_mut(card_id)
            .ok_or_else(|| CoreError::not_found("card", card_id))?;

        let row = card.snapshots.entry(competence).or_default();
        if let Some(limit) = patch.monthly_limit {
            row.monthly_limit = limit;
        }
        row.adjustment = patch.adjustment;
        if row.is_default() {
            card.snapshots.remove(&competence);
        }
        ledger.touch();
        tracing::debug!(%card_id, %competence, "updated month snapshot");
        Ok(())
    }

    /// Records a purchase or payment. Competence defaults to the date's month
    /// unless the caller bills it elsewhere.
    pub fn add_entry(
        ledger: &mut Ledger,
        card_id: Uuid,
        kind: CardEntryKind,
        date: NaiveDate,
        amount: Decimal,
        description: Option<String>,
        competence: Option<CompetenceMonth>,
    ) -> ServiceResult<Uuid> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::validation("amount must be positive"));
        }
        if ledger.card(card_id).is_none() {
            return Err(CoreError::not_found("card", card_id));
        }
        let mut entry = CardEntry::new(card_id, kind, date, amount);
        entry.description = description.filter(|text| !text.trim().is_empty());
        if let Some(competence) = competence {
            entry.competence = competence;
        }
        Ok(ledger.add_card_entry(entry))
    }

    /// Edits a record's description, date, and amount in place.
    pub fn edit_entry(
        ledger: &mut Ledger,
        card_id: Uuid,
        entry_id: Uuid,
        patch: CardEntryPatch,
    ) -> ServiceResult<()> {
        if patch.amount <= Decimal::ZERO {
            return Err(CoreError::validation("amount must be positive"));
        }
        let entry = ledger
            .card_entry_mut(entry_id)
            .filter(|entry| entry.card_id == card_id)
            .ok_or_else(|| CoreError::not_found("card entry", entry_id))?;
        entry.description = patch.description.filter(|text| !text.trim().is_empty());
        entry.date = patch.date;
        entry.amount = patch.amount;
        ledger.touch();
        Ok(())
    }

    pub fn delete_entry(ledger: &mut Ledger, card_id: Uuid, entry_id: Uuid) -> ServiceResult<()> {
        let belongs = ledger
            .card_entry(entry_id)
            .map(|entry| entry.card_id == card_id)
            .unwrap_or(false);
        if !belongs {
            return Err(CoreError::not_found("card entry", entry_id));
        }
        ledger.remove_card_entry(entry_id);
        Ok(())
    }

    fn validate_card_fields(
        name: &str,
        base_limit: Decimal,
        closing_day: Option<u32>,
        due_day: Option<u32>,
    ) -> ServiceResult<()> {
        if name.trim().is_empty() {
            return Err(CoreError::validation("card name is required"));
        }
        if base_limit < Decimal::ZERO {
            return Err(CoreError::validation("base limit must not be negative"));
        }
        for (label, day) in [("closing day", closing_day), ("due day", due_day)] {
            if let Some(day) = day {
                if !(1..=31).contains(&day) {
                    return Err(CoreError::validation(format!(
                        "{label} must be between 1 and 31"
                    )));
                }
            }
        }
        Ok(())
    }
}
