use chrono::NaiveDate;
use finance_core::core::errors::CoreError;
use finance_core::core::services::{
    CardEntryPatch, CardService, CategoryService, ChecklistService, EntryService, PlannerService,
};
use finance_core::domain::{
    CategoryKind, CardEntryKind, CompetenceMonth, EntryDraft, EntryKind, MarkUpdate,
    PaymentMethod, PlanMode,
};
use finance_core::ledger::Ledger;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> CompetenceMonth {
    CompetenceMonth::new(y, m).unwrap()
}

fn draft(category_id: Uuid, name: &str, kind: EntryKind) -> EntryDraft {
    EntryDraft {
        name: name.into(),
        amount: dec!(100),
        kind,
        category_id: Some(category_id),
        start_date: Some(date(2024, 1, 10)),
        end_date: None,
        installments: None,
        payment_method: match kind {
            EntryKind::Expense => Some(PaymentMethod::Cash),
            EntryKind::Income => None,
        },
        card_id: None,
        unique: false,
    }
}

#[test]
fn category_crud_roundtrip() {
    let mut ledger = Ledger::new("Categories");
    let id = CategoryService::add(&mut ledger, "Subscriptions", CategoryKind::Expense).unwrap();

    CategoryService::edit(&mut ledger, id, "Subscriptions & Media", CategoryKind::Expense)
        .unwrap();
    assert_eq!(ledger.category(id).unwrap().name, "Subscriptions & Media");

    CategoryService::remove(&mut ledger, id).unwrap();
    assert!(ledger.category(id).is_none());
    assert_eq!(CategoryService::list(&ledger).len(), 0);
}

#[test]
fn entry_listing_splits_by_kind() {
    let mut ledger = Ledger::new("Entries");
    let income_cat = CategoryService::add(&mut ledger, "Salary", CategoryKind::Income).unwrap();
    let expense_cat = CategoryService::add(&mut ledger, "Bills", CategoryKind::Expense).unwrap();
    PlannerService::apply(
        &mut ledger,
        &draft(income_cat, "Paycheck", EntryKind::Income),
        PlanMode::Single,
        None,
    )
    .unwrap();
    PlannerService::apply(
        &mut ledger,
        &draft(expense_cat, "Water", EntryKind::Expense),
        PlanMode::Next,
        None,
    )
    .unwrap();

    assert_eq!(EntryService::list(&ledger).len(), 3);
    assert_eq!(EntryService::list_by_kind(&ledger, EntryKind::Income).len(), 1);
    assert_eq!(EntryService::list_by_kind(&ledger, EntryKind::Expense).len(), 2);
}

#[test]
fn deleting_an_entry_cleans_marks_but_keeps_billing_history() {
    let mut ledger = Ledger::new("Flow");
    let category_id = CategoryService::add(&mut ledger, "Shopping", CategoryKind::Expense).unwrap();
    let card_id = CardService::add(&mut ledger, "Gold", dec!(2000), None, None).unwrap();

    let mut card_draft = draft(category_id, "Headphones", EntryKind::Expense);
    card_draft.payment_method = Some(PaymentMethod::Card);
    card_draft.card_id = Some(card_id);
    card_draft.unique = true;
    let ids = PlannerService::apply(&mut ledger, &card_draft, PlanMode::Single, None).unwrap();
    let entry_id = ids[0];

    ChecklistService::bulk_apply(
        &mut ledger,
        month(2024, 1),
        &[MarkUpdate {
            entry_id,
            checked: true,
        }],
    )
    .unwrap();
    assert_eq!(ledger.marks.len(), 1);
    assert_eq!(ledger.card_entries.len(), 1);

    EntryService::remove(&mut ledger, entry_id).unwrap();
    assert!(ledger.marks.is_empty());
    // The purchase is billing history on the card and survives the entry.
    assert_eq!(ledger.card_entries.len(), 1);
    let statement = CardService::statement(&ledger, card_id, month(2024, 1)).unwrap();
    assert_eq!(statement.total_purchases, dec!(100));
}

#[test]
fn card_entry_edit_rejects_bad_amount_and_unknown_ids() {
    let mut ledger = Ledger::new("Cards");
    let card_id = CardService::add(&mut ledger, "Gold", dec!(500), None, None).unwrap();
    let entry_id = CardService::add_entry(
        &mut ledger,
        card_id,
        CardEntryKind::Purchase,
        date(2024, 2, 1),
        dec!(40),
        None,
        None,
    )
    .unwrap();

    let err = CardService::edit_entry(
        &mut ledger,
        card_id,
        entry_id,
        CardEntryPatch {
            description: None,
            date: date(2024, 2, 2),
            amount: dec!(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = CardService::edit_entry(
        &mut ledger,
        card_id,
        Uuid::new_v4(),
        CardEntryPatch {
            description: None,
            date: date(2024, 2, 2),
            amount: dec!(10),
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn switching_an_entry_to_another_card_moves_its_purchase() {
    let mut ledger = Ledger::new("Cards");
    let category_id = CategoryService::add(&mut ledger, "Shopping", CategoryKind::Expense).unwrap();
    let gold = CardService::add(&mut ledger, "Gold", dec!(2000), None, None).unwrap();
    let black = CardService::add(&mut ledger, "Black", dec!(8000), None, None).unwrap();

    let mut input = draft(category_id, "Monitor", EntryKind::Expense);
    input.payment_method = Some(PaymentMethod::Card);
    input.card_id = Some(gold);
    input.unique = true;
    let ids = PlannerService::apply(&mut ledger, &input, PlanMode::Single, None).unwrap();

    input.card_id = Some(black);
    PlannerService::apply(&mut ledger, &input, PlanMode::Single, Some(ids[0])).unwrap();

    assert_eq!(ledger.card_entries.len(), 1);
    assert_eq!(ledger.card_entries[0].card_id, black);
    let gold_statement = CardService::statement(&ledger, gold, month(2024, 1)).unwrap();
    assert_eq!(gold_statement.total_purchases, dec!(0));
    let black_statement = CardService::statement(&ledger, black, month(2024, 1)).unwrap();
    assert_eq!(black_statement.total_purchases, dec!(100));
}
