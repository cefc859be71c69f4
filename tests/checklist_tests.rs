use chrono::NaiveDate;
use finance_core::core::errors::CoreError;
use finance_core::core::services::{ChecklistService, PlannerService};
use finance_core::domain::{
    Category, CategoryKind, ChecklistSummary, CompetenceMonth, EntryDraft, EntryKind, MarkUpdate,
    PaymentMethod, PlanMode,
};
use finance_core::ledger::Ledger;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn month(y: i32, m: u32) -> CompetenceMonth {
    CompetenceMonth::new(y, m).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A ledger with one open-ended income and one three-installment expense.
fn seeded_ledger() -> (Ledger, Uuid, Uuid) {
    let mut ledger = Ledger::new("Checklist");
    let income_cat = ledger.add_category(Category::new("Salary", CategoryKind::Income));
    let expense_cat = ledger.add_category(Category::new("Shopping", CategoryKind::Expense));

    let salary = EntryDraft {
        name: "Paycheck".into(),
        amount: dec!(4000),
        kind: EntryKind::Income,
        category_id: Some(income_cat),
        start_date: Some(date(2024, 1, 5)),
        end_date: None,
        installments: None,
        payment_method: None,
        card_id: None,
        unique: false,
    };
    let salary_id = PlannerService::apply(&mut ledger, &salary, PlanMode::Single, None).unwrap()[0];

    let couch = EntryDraft {
        name: "Couch".into(),
        amount: dec!(500),
        kind: EntryKind::Expense,
        category_id: Some(expense_cat),
        start_date: Some(date(2024, 1, 20)),
        end_date: None,
        installments: Some(3),
        payment_method: Some(PaymentMethod::Pix),
        card_id: None,
        unique: false,
    };
    let couch_id = PlannerService::apply(&mut ledger, &couch, PlanMode::Single, None).unwrap()[0];

    (ledger, salary_id, couch_id)
}

#[test]
fn checklist_joins_occurrences_with_marks_in_date_order() {
    let (ledger, salary_id, couch_id) = seeded_ledger();
    let items = ChecklistService::monthly_checklist(&ledger, month(2024, 2));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].entry_id, salary_id);
    assert_eq!(items[0].occurrence_date, date(2024, 2, 5));
    assert!(!items[0].checked);
    assert_eq!(items[1].entry_id, couch_id);
    assert_eq!(items[1].installment_index, Some(2));
    assert_eq!(items[1].installments, Some(3));
}

#[test]
fn installment_series_ends_after_its_last_month() {
    let (ledger, salary_id, _) = seeded_ledger();
    let april = ChecklistService::monthly_checklist(&ledger, month(2024, 4));
    // The couch ran January through March; only the salary remains.
    assert_eq!(april.len(), 1);
    assert_eq!(april[0].entry_id, salary_id);
}

#[test]
fn bulk_apply_writes_only_the_diff() {
    let (mut ledger, salary_id, couch_id) = seeded_ledger();
    let competence = month(2024, 1);

    let written = ChecklistService::bulk_apply(
        &mut ledger,
        competence,
        &[
            MarkUpdate {
                entry_id: salary_id,
                checked: true,
            },
            MarkUpdate {
                entry_id: couch_id,
                checked: false,
            },
        ],
    )
    .unwrap();
    // The couch intent matches its persisted (absent) state: one write only.
    assert_eq!(written, 1);
    assert_eq!(ledger.marks.len(), 1);
}

#[test]
fn reapplying_the_same_state_touches_nothing() {
    let (mut ledger, salary_id, _) = seeded_ledger();
    let competence = month(2024, 1);
    ChecklistService::bulk_apply(
        &mut ledger,
        competence,
        &[MarkUpdate {
            entry_id: salary_id,
            checked: true,
        }],
    )
    .unwrap();
    let stamped = ledger.mark_for(salary_id, competence).unwrap().checked_at;

    let written = ChecklistService::bulk_apply(
        &mut ledger,
        competence,
        &[MarkUpdate {
            entry_id: salary_id,
            checked: true,
        }],
    )
    .unwrap();
    assert_eq!(written, 0);
    assert_eq!(
        ledger.mark_for(salary_id, competence).unwrap().checked_at,
        stamped
    );
}

#[test]
fn batch_with_unknown_entry_applies_nothing() {
    let (mut ledger, salary_id, _) = seeded_ledger();
    let err = ChecklistService::bulk_apply(
        &mut ledger,
        month(2024, 1),
        &[
            MarkUpdate {
                entry_id: salary_id,
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
fn summary_tracks_balance_now_separately_from_total() {
    let (mut ledger, salary_id, _) = seeded_ledger();
    let competence = month(2024, 1);
    ChecklistService::bulk_apply(
        &mut ledger,
        competence,
        &[MarkUpdate {
            entry_id: salary_id,
            checked: true,
        }],
    )
    .unwrap();

    let items = ChecklistService::monthly_checklist(&ledger, competence);
    let summary = ChecklistSummary::from_items(&items);
    assert_eq!(summary.total_income, dec!(4000));
    assert_eq!(summary.total_expense, dec!(500));
    assert_eq!(summary.received, dec!(4000));
    assert_eq!(summary.paid, dec!(0));
    assert_eq!(summary.balance_now, dec!(4000));
    assert_eq!(summary.balance_total, dec!(3500));
    assert_eq!(summary.remaining_expense, dec!(500));
    assert_eq!(summary.marked, 1);
    assert_eq!(summary.total, 2);
}
