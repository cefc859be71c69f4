//! Monthly card statement derivation.
//!
//! A statement is computed from the card's lifetime records; nothing here is
//! stored. Calling twice with no intervening writes returns identical values.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Card, CardEntry, CardEntryKind, CompetenceMonth};

/// The computed monthly view of a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    pub card_id: Uuid,
    pub competence: CompetenceMonth,
    pub base_limit: Decimal,
    /// Limit in force for the month after the snapshot fallback chain.
    pub resolved_limit: Decimal,
    pub total_purchases: Decimal,
    pub total_payments: Decimal,
    pub adjustment: Decimal,
    /// purchases + adjustment − payments, signed. Negative means the month
    /// was overpaid.
    pub invoice_total: Decimal,
    /// The invoice floored at zero: what still has to be settled.
    pub open_balance: Decimal,
    /// Rolling utilization: every month's invoice up to and including this
    /// one, each floored at zero before summing. An overpaid month never
    /// credits back the limit other months consumed.
    pub cumulative_used: Decimal,
    /// resolved_limit − cumulative_used. Deliberately not clamped; a negative
    /// value signals the card is over its limit.
    pub available: Decimal,
}

/// Derives the statement for `competence` from the card and its records.
/// `entries` must be the records billed to this card.
pub fn statement_for(card: &Card, entries: &[&CardEntry], competence: CompetenceMonth) -> Statement {
    let resolved_limit = resolve_limit(card, competence);
    let (total_purchases, total_payments) = month_totals(entries, competence);
    let adjustment = card.adjustment_for(competence);
    let invoice_total = total_purchases + adjustment - total_payments;

    let cumulative_used = active_months(card, entries, competence)
        .into_iter()
        .map(|month| {
            let (purchases, payments) = month_totals(entries, month);
            (purchases + card.adjustment_for(month) - payments).max(Decimal::ZERO)
        })
        .sum::<Decimal>();

    Statement {
        card_id: card.id,
        competence,
        base_limit: card.base_limit,
        resolved_limit,
        total_purchases,
        total_payments,
        adjustment,
        invoice_total,
        open_balance: invoice_total.max(Decimal::ZERO),
        cumulative_used,
        available: resolved_limit - cumulative_used,
    }
}

/// Resolves the limit in force for a month: the month's own override if set,
/// otherwise the most recent prior override, otherwise the card's base limit.
/// The snapshots map is ordered by competence, so this is a single backward
/// range scan.
pub fn resolve_limit(card: &Card, competence: CompetenceMonth) -> Decimal {
    card.snapshots
        .range(..=competence)
        .rev()
        .find_map(|(_, snapshot)| snapshot.monthly_limit)
        .unwrap_or(card.base_limit)
}

fn month_totals(entries: &[&CardEntry], competence: CompetenceMonth) -> (Decimal, Decimal) {
    let mut purchases = Decimal::ZERO;
    let mut payments = Decimal::ZERO;
    for entry in entries {
        if entry.competence != competence {
            continue;
        }
        match entry.kind {
            CardEntryKind::Purchase => purchases += entry.amount,
            CardEntryKind::Payment => payments += entry.amount,
        }
    }
    (purchases, payments)
}

/// Months with billing activity up to and including `up_to`: any month that
/// holds records, or whose snapshot carries a manual adjustment.
fn active_months(
    card: &Card,
    entries: &[&CardEntry],
    up_to: CompetenceMonth,
) -> BTreeSet<CompetenceMonth> {
    let mut months: BTreeSet<CompetenceMonth> = entries
        .iter()
        .map(|entry| entry.competence)
        .filter(|month| *month <= up_to)
        .collect();
    months.extend(
        card.snapshots
            .range(..=up_to)
            .filter(|(_, snapshot)| snapshot.adjustment != Decimal::ZERO)
            .map(|(month, _)| *month),
    );
    months
}
