//! Ledger aggregate and the pure engines that derive plans, statements, and
//! checklists from it.

pub mod checklist;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod planner;
pub mod statement;

pub use checklist::{diff_updates, monthly_items};
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use planner::{expand, purchase_for, PlannedEntry, WriteTarget};
pub use statement::{resolve_limit, statement_for, Statement};
