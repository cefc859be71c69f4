use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Card, CardEntry, Category, ChecklistMark, CompetenceMonth, FinanceEntry,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory aggregate holding one user's finance data. Every service call
/// runs against an exclusive borrow, so a call is one logical transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entries: Vec<FinanceEntry>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub card_entries: Vec<CardEntry>,
    #[serde(default)]
    pub marks: Vec<ChecklistMark>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
    /// Bumped by the storage backend on every successful save; a stale value
    /// on disk vs. in memory signals a concurrent writer.
    #[serde(default)]
    pub revision: u64,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: Vec::new(),
            entries: Vec::new(),
            cards: Vec::new(),
            card_entries: Vec::new(),
            marks: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
            revision: 0,
        }
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_entry(&mut self, entry: FinanceEntry) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        id
    }

    pub fn add_card(&mut self, card: Card) -> Uuid {
        let id = card.id;
        self.cards.push(card);
        self.touch();
        id
    }

    pub fn add_card_entry(&mut self, entry: CardEntry) -> Uuid {
        let id = entry.id;
        self.card_entries.push(entry);
        self.touch();
        id
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn entry(&self, id: Uuid) -> Option<&FinanceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut FinanceEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn card_mut(&mut self, id: Uuid) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub fn card_entry(&self, id: Uuid) -> Option<&CardEntry> {
        self.card_entries.iter().find(|entry| entry.id == id)
    }

    pub fn card_entry_mut(&mut self, id: Uuid) -> Option<&mut CardEntry> {
        self.card_entries.iter_mut().find(|entry| entry.id == id)
    }

    /// All purchase/payment records billed to `card_id`.
    pub fn entries_of_card(&self, card_id: Uuid) -> Vec<&CardEntry> {
        self.card_entries
            .iter()
            .filter(|entry| entry.card_id == card_id)
            .collect()
    }

    /// The purchase the planner emitted for a finance entry, wherever it was
    /// billed. Lets a re-plan move the record when the entry changes card.
    pub fn planner_purchase_mut(&mut self, entry_id: Uuid) -> Option<&mut CardEntry> {
        self.card_entries
            .iter_mut()
            .find(|entry| entry.source_entry_id == Some(entry_id))
    }

    /// Removes a finance entry and explicitly cleans up its checklist marks.
    /// Marks are an independent aggregate; the cleanup is deliberate, not a
    /// cascade.
    pub fn remove_entry(&mut self, id: Uuid) -> Option<FinanceEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(index);
        self.marks.retain(|mark| mark.entry_id != id);
        self.touch();
        Some(removed)
    }

    /// Removes a card together with the snapshots and billing records it owns.
    pub fn remove_card(&mut self, id: Uuid) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id == id)?;
        let removed = self.cards.remove(index);
        self.card_entries.retain(|entry| entry.card_id != id);
        self.touch();
        Some(removed)
    }

    pub fn remove_card_entry(&mut self, id: Uuid) -> Option<CardEntry> {
        let index = self.card_entries.iter().position(|entry| entry.id == id)?;
        let removed = self.card_entries.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let index = self.categories.iter().position(|category| category.id == id)?;
        let removed = self.categories.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn mark_for(&self, entry_id: Uuid, competence: CompetenceMonth) -> Option<&ChecklistMark> {
        self.marks
            .iter()
            .find(|mark| mark.entry_id == entry_id && mark.competence == competence)
    }

    /// Records a checked mark, replacing any previous row for the same key.
    pub fn upsert_mark(&mut self, mark: ChecklistMark) {
        self.marks
            .retain(|existing| !(existing.entry_id == mark.entry_id && existing.competence == mark.competence));
        self.marks.push(mark);
        self.touch();
    }

    /// Clears a mark; absence of a row is the unchecked state.
    pub fn remove_mark(&mut self, entry_id: Uuid, competence: CompetenceMonth) {
        self.marks
            .retain(|mark| !(mark.entry_id == entry_id && mark.competence == competence));
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
