//! Orchestrates plan expansion against the ledger.

use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{EntryDraft, PaymentMethod, PlanMode};
use crate::ledger::planner::{expand, purchase_for, WriteTarget};
use crate::ledger::Ledger;

/// Applies a finance-entry draft under a plan mode. Every referenced id is
/// resolved and the full write set derived before the ledger is touched, so a
/// failure never leaves a partial series behind.
pub struct PlannerService;

impl PlannerService {
    /// Saves `draft` under `mode`, updating `existing` when editing. Returns
    /// the ids of all written entries in chronological order.
    pub fn apply(
        ledger: &mut Ledger,
        draft: &EntryDraft,
        mode: PlanMode,
        existing: Option<Uuid>,
    ) -> ServiceResult<Vec<Uuid>> {
        if let Some(category_id) = draft.category_id {
            if ledger.category(category_id).is_none() {
                return Err(CoreError::not_found("category", category_id));
            }
        }
        if draft.payment_method == Some(PaymentMethod::Card) {
            if let Some(card_id) = draft.card_id {
                if ledger.card(card_id).is_none() {
                    return Err(CoreError::not_found("card", card_id));
                }
            }
        }
        if let Some(id) = existing {
            if ledger.entry(id).is_none() {
                return Err(CoreError::not_found("entry", id));
            }
        }

        let writes = expand(draft, mode, existing)?;

        let mut ids = Vec::with_capacity(writes.len());
        for write in writes {
            let purchase = purchase_for(&write.entry);
            let id = match write.target {
                WriteTarget::Insert => ledger.add_entry(write.entry),
                WriteTarget::Update(id) => {
                    let stored = ledger
                        .entry_mut(id)
                        .ok_or_else(|| CoreError::not_found("entry", id))?;
                    *stored = write.entry;
                    ledger.touch();
                    id
                }
            };
            if let Some(purchase) = purchase {
                match ledger.planner_purchase_mut(id) {
                    Some(existing_purchase) => {
                        existing_purchase.card_id = purchase.card_id;
                        existing_purchase.date = purchase.date;
                        existing_purchase.amount = purchase.amount;
                        existing_purchase.competence = purchase.competence;
                        existing_purchase.description = purchase.description;
                        ledger.touch();
                    }
                    None => {
                        ledger.add_card_entry(purchase);
                    }
                }
            }
            ids.push(id);
        }

        tracing::info!(written = ids.len(), ?mode, "applied entry plan");
        Ok(ids)
    }
}
