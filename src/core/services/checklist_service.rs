//! Monthly reconciliation: checklist reads and atomic bulk mark updates.

use chrono::Utc;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{ChecklistItem, ChecklistMark, CompetenceMonth, MarkUpdate};
use crate::ledger::checklist::{diff_updates, monthly_items};
use crate::ledger::Ledger;

pub struct ChecklistService;

impl ChecklistService {
    /// The month's planned occurrences joined with their marks, unchecked by
    /// default, in chronological order. Reading never mutates state.
    pub fn monthly_checklist(ledger: &Ledger, competence: CompetenceMonth) -> Vec<ChecklistItem> {
        monthly_items(&ledger.entries, &ledger.marks, competence)
    }

    /// Applies a batch of mark intents. The batch is diffed against persisted
    /// state first — intents equal to the current state are no-ops — and
    /// validated as a whole, so either every differing mark lands or none do.
    /// Returns how many marks were written.
    pub fn bulk_apply(
        ledger: &mut Ledger,
        competence: CompetenceMonth,
        updates: &[MarkUpdate],
    ) -> ServiceResult<usize> {
        for update in updates {
            if ledger.entry(update.entry_id).is_none() {
                return Err(CoreError::not_found("entry", update.entry_id));
            }
        }

        let diff = diff_updates(&ledger.marks, competence, updates);
        if diff.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for update in &diff {
            if update.checked {
                ledger.upsert_mark(ChecklistMark {
                    entry_id: update.entry_id,
                    competence,
                    checked: true,
                    checked_at: Some(now),
                });
            } else {
                // Absence of a row is the unchecked state; the timestamp goes
                // with it.
                ledger.remove_mark(update.entry_id, competence);
            }
        }

        tracing::info!(written = diff.len(), %competence, "applied checklist batch");
        Ok(diff.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryKind, EntryDraft, EntryKind, PlanMode};
    use crate::core::services::PlannerService;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn month(y: i32, m: u32) -> CompetenceMonth {
        CompetenceMonth::new(y, m).unwrap()
    }

    fn seeded_ledger() -> (Ledger, Uuid) {
        let mut ledger = Ledger::new("Checklist");
        let category_id = ledger.add_category(Category::new("Salary", CategoryKind::Income));
        let draft = EntryDraft {
            name: "Paycheck".into(),
            amount: dec!(4000),
            kind: EntryKind::Income,
            category_id: Some(category_id),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            end_date: None,
            installments: None,
            payment_method: None,
            card_id: None,
            unique: false,
        };
        let ids = PlannerService::apply(&mut ledger, &draft, PlanMode::Single, None).unwrap();
        (ledger, ids[0])
    }

    #[test]
    fn no_op_batch_writes_nothing_and_keeps_timestamp() {
        let (mut ledger, entry_id) = seeded_ledger();
        let competence = month(2024, 2);
        ChecklistService::bulk_apply(
            &mut ledger,
            competence,
            &[MarkUpdate {
                entry_id,
                checked: true,
            }],
        )
        .unwrap();
        let stamped = ledger.mark_for(entry_id, competence).unwrap().checked_at;
        assert!(stamped.is_some());

        let written = ChecklistService::bulk_apply(
            &mut ledger,
            competence,
            &[MarkUpdate {
                entry_id,
                checked: true,
            }],
        )
        .unwrap();
        assert_eq!(written, 0);
        assert_eq!(
            ledger.mark_for(entry_id, competence).unwrap().checked_at,
            stamped
        );
    }

    #[test]
    fn unchecking_removes_the_row() {
        let (mut ledger, entry_id) = seeded_ledger();
        let competence = month(2024, 3);
        ChecklistService::bulk_apply(
            &mut ledger,
            competence,
            &[MarkUpdate {
                entry_id,
                checked: true,
            }],
        )
        .unwrap();
        ChecklistService::bulk_apply(
            &mut ledger,
            competence,
            &[MarkUpdate {
                entry_id,
                checked: false,
            }],
        )
        .unwrap();
        assert!(ledger.mark_for(entry_id, competence).is_none());
        let items = ChecklistService::monthly_checklist(&ledger, competence);
        assert!(!items[0].checked);
        assert_eq!(items[0].checked_at, None);
    }

    #[test]
    fn unknown_entry_fails_whole_batch() {
        let (mut ledger, entry_id) = seeded_ledger();
        let competence = month(2024, 2);
        let err = ChecklistService::bulk_apply(
            &mut ledger,
            competence,
            &[
                MarkUpdate {
                    entry_id,
                    checked: true,
                },
                MarkUpdate {
                    entry_id: Uuid::new_v4(),
                    checked: true,
                },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert!(ledger.marks.is_empty());
    }

    #[test]
    fn marks_are_scoped_to_their_month() {
        let (mut ledger, entry_id) = seeded_ledger();
        ChecklistService::bulk_apply(
            &mut ledger,
            month(2024, 2),
            &[MarkUpdate {
                entry_id,
                checked: true,
            }],
        )
        .unwrap();
        let march = ChecklistService::monthly_checklist(&ledger, month(2024, 3));
        assert!(!march[0].checked);
        let february = ChecklistService::monthly_checklist(&ledger, month(2024, 2));
        assert!(february[0].checked);
    }
}
