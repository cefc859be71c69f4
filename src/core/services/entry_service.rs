//! Finance-entry reads and removal. Creation and edits go through the
//! planner.

use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{EntryKind, FinanceEntry};
use crate::ledger::Ledger;

pub struct EntryService;

impl EntryService {
    pub fn get<'a>(ledger: &'a Ledger, id: Uuid) -> ServiceResult<&'a FinanceEntry> {
        ledger
            .entry(id)
            .ok_or_else(|| CoreError::not_found("entry", id))
    }

    pub fn list<'a>(ledger: &'a Ledger) -> Vec<&'a FinanceEntry> {
        ledger.entries.iter().collect()
    }

    pub fn list_by_kind<'a>(ledger: &'a Ledger, kind: EntryKind) -> Vec<&'a FinanceEntry> {
        ledger
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .collect()
    }

    /// Removes the entry and its checklist marks. Card purchases the planner
    /// emitted stay on the card: they are billing history, not plan state.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<FinanceEntry> {
        ledger
            .remove_entry(id)
            .ok_or_else(|| CoreError::not_found("entry", id))
    }
}
