//! Expansion of a finance-entry draft into its dated write set.
//!
//! The functions here are pure: they validate the draft, derive dates, and
//! return the complete list of writes without touching the ledger. A failure
//! therefore never leaves partial side effects behind.

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::domain::{
    shift_month, CompetenceMonth, EntryDraft, EntryKind, FinanceEntry, PaymentMethod, PlanMode,
};

/// Upper bound on months a range plan may span. Anything longer is a typo,
/// not a plan.
const MAX_RANGE_MONTHS: i32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Insert,
    Update(Uuid),
}

/// One entry write the planner decided on. Writes are ordered
/// chronologically by month.
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub target: WriteTarget,
    pub entry: FinanceEntry,
}

/// Expands `draft` under `mode` into the full write set. `existing` is the id
/// being edited, if any; it becomes the target of the first write.
pub fn expand(
    draft: &EntryDraft,
    mode: PlanMode,
    existing: Option<Uuid>,
) -> Result<Vec<PlannedEntry>, CoreError> {
    let base = validate(draft, mode)?;

    match mode {
        PlanMode::Single => {
            let target = existing.map(WriteTarget::Update).unwrap_or(WriteTarget::Insert);
            Ok(vec![planned(target, &base)])
        }
        PlanMode::Next => {
            if existing.is_some() {
                return Err(CoreError::InvalidMode(
                    "next-month duplication is only available on creation".into(),
                ));
            }
            let mut advanced = base.clone();
            advanced.start_date = shift_month(base.start_date, 1);
            advanced.end_date = base.end_date.map(|date| shift_month(date, 1));
            Ok(vec![
                planned(WriteTarget::Insert, &base),
                planned(WriteTarget::Insert, &advanced),
            ])
        }
        PlanMode::Range => expand_range(&base, existing),
    }
}

/// Normalized draft fields after validation; dates are settled, identifiers
/// still pending.
#[derive(Debug, Clone)]
struct NormalizedDraft {
    name: String,
    amount: Decimal,
    kind: EntryKind,
    category_id: Uuid,
    start_date: chrono::NaiveDate,
    end_date: Option<chrono::NaiveDate>,
    installments: Option<u32>,
    payment_method: Option<PaymentMethod>,
    card_id: Option<Uuid>,
}

fn validate(draft: &EntryDraft, mode: PlanMode) -> Result<NormalizedDraft, CoreError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CoreError::validation("entry name is required"));
    }
    if draft.amount <= Decimal::ZERO {
        return Err(CoreError::validation("amount must be positive"));
    }
    let category_id = draft
        .category_id
        .ok_or_else(|| CoreError::validation("category is required"))?;
    let start_date = draft
        .start_date
        .ok_or_else(|| CoreError::validation("start date is required"))?;

    if draft.kind == EntryKind::Income && draft.payment_method.is_some() {
        return Err(CoreError::validation(
            "payment method applies to expenses only",
        ));
    }
    let payment_method = draft.payment_method;
    let card_id = match payment_method {
        Some(PaymentMethod::Card) => Some(
            draft
                .card_id
                .ok_or_else(|| CoreError::validation("card is required for card payment"))?,
        ),
        // A leftover card reference is dropped once the method is not card.
        _ => None,
    };

    if draft.installments == Some(0) {
        return Err(CoreError::validation("installments must be at least 1"));
    }

    let (end_date, installments) = if draft.unique {
        (Some(start_date), None)
    } else if mode == PlanMode::Range {
        // The range is governed by the typed end date; installments do not
        // apply to month-by-month expansion.
        (draft.end_date, None)
    } else if let Some(count) = draft.installments {
        // The derived end replaces whatever the caller typed.
        (Some(shift_month(start_date, count as i32 - 1)), Some(count))
    } else {
        (draft.end_date, None)
    };

    if let Some(end) = end_date {
        if end < start_date {
            return Err(CoreError::validation(
                "end date must not precede start date",
            ));
        }
    }

    Ok(NormalizedDraft {
        name: name.to_string(),
        amount: draft.amount,
        kind: draft.kind,
        category_id,
        start_date,
        end_date,
        installments,
        payment_method,
        card_id,
    })
}

fn expand_range(
    base: &NormalizedDraft,
    existing: Option<Uuid>,
) -> Result<Vec<PlannedEntry>, CoreError> {
    let end = base
        .end_date
        .ok_or_else(|| CoreError::validation("end date is required for a monthly range"))?;

    let first_month = CompetenceMonth::of(base.start_date);
    let last_month = CompetenceMonth::of(end);
    let span = last_month.months_since(first_month);
    if span >= MAX_RANGE_MONTHS {
        return Err(CoreError::validation("date range spans too many months"));
    }

    let day = base.start_date.day();
    let mut writes = Vec::with_capacity(span as usize + 1);
    let mut month = first_month;
    let mut first = true;
    while month <= last_month {
        let date = month.date_with_day(day);
        let mut monthly = base.clone();
        monthly.start_date = date;
        monthly.end_date = Some(date);
        monthly.installments = None;
        let target = match (first, existing) {
            (true, Some(id)) => WriteTarget::Update(id),
            _ => WriteTarget::Insert,
        };
        writes.push(planned(target, &monthly));
        first = false;
        month = month.succ();
    }
    Ok(writes)
}

fn planned(target: WriteTarget, base: &NormalizedDraft) -> PlannedEntry {
    let id = match target {
        WriteTarget::Update(id) => id,
        WriteTarget::Insert => Uuid::new_v4(),
    };
    PlannedEntry {
        target,
        entry: FinanceEntry {
            id,
            name: base.name.clone(),
            amount: base.amount,
            kind: base.kind,
            category_id: base.category_id,
            start_date: base.start_date,
            end_date: base.end_date,
            installments: base.installments,
            payment_method: base.payment_method,
            card_id: base.card_id,
        },
    }
}

/// The purchase record a card-paid entry contributes to its card's ledger.
pub fn purchase_for(entry: &FinanceEntry) -> Option<crate::domain::CardEntry> {
    use crate::domain::{CardEntry, CardEntryKind};

    if !entry.is_card_expense() {
        return None;
    }
    let card_id = entry.card_id?;
    let mut purchase =
        CardEntry::new(card_id, CardEntryKind::Purchase, entry.start_date, entry.amount)
            .with_description(entry.name.clone())
            .with_competence(entry.competence());
    purchase.source_entry_id = Some(entry.id);
    Some(purchase)
}
