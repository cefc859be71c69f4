//! Joining a month's planned entries with their reconciliation marks, and the
//! diff logic behind bulk mark updates.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{ChecklistItem, ChecklistMark, CompetenceMonth, FinanceEntry, MarkUpdate};

/// Builds the checklist rows for a competence month: every entry occurring in
/// the month joined with its mark, unchecked when no mark exists. Rows come
/// back in chronological occurrence order.
pub fn monthly_items(
    entries: &[FinanceEntry],
    marks: &[ChecklistMark],
    competence: CompetenceMonth,
) -> Vec<ChecklistItem> {
    let marks_by_entry: HashMap<Uuid, &ChecklistMark> = marks
        .iter()
        .filter(|mark| mark.competence == competence)
        .map(|mark| (mark.entry_id, mark))
        .collect();

    let mut items = Vec::new();
    for entry in entries {
        let Some(occurrence) = entry.occurrence_in(competence) else {
            continue;
        };
        let mark = marks_by_entry.get(&entry.id);
        items.push(ChecklistItem {
            entry_id: entry.id,
            name: entry.name.clone(),
            kind: entry.kind,
            amount: entry.amount,
            category_id: entry.category_id,
            occurrence_date: occurrence.date,
            competence,
            installments: entry.installments,
            installment_index: occurrence.installment_index,
            checked: mark.map(|mark| mark.checked).unwrap_or(false),
            checked_at: mark.and_then(|mark| mark.checked_at),
        });
    }
    items.sort_by(|a, b| {
        a.occurrence_date
            .cmp(&b.occurrence_date)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

/// Reduces intents to the updates that actually change persisted state.
/// Later intents for the same entry win; intents matching the current mark
/// are dropped.
pub fn diff_updates(
    marks: &[ChecklistMark],
    competence: CompetenceMonth,
    updates: &[MarkUpdate],
) -> Vec<MarkUpdate> {
    let mut intents: HashMap<Uuid, bool> = HashMap::new();
    let mut order: Vec<Uuid> = Vec::new();
    for update in updates {
        if intents.insert(update.entry_id, update.checked).is_none() {
            order.push(update.entry_id);
        }
    }

    let current: HashMap<Uuid, bool> = marks
        .iter()
        .filter(|mark| mark.competence == competence)
        .map(|mark| (mark.entry_id, mark.checked))
        .collect();

    order
        .into_iter()
        .filter_map(|entry_id| {
            let checked = intents[&entry_id];
            let persisted = current.get(&entry_id).copied().unwrap_or(false);
            (checked != persisted).then_some(MarkUpdate { entry_id, checked })
        })
        .collect()
}
