pub mod card_service;
pub mod category_service;
pub mod checklist_service;
pub mod entry_service;
pub mod planner_service;

pub use card_service::{CardBalance, CardEntryPatch, CardService};
pub use category_service::CategoryService;
pub use checklist_service::ChecklistService;
pub use entry_service::EntryService;
pub use planner_service::PlannerService;

use crate::core::errors::CoreError;

pub type ServiceResult<T> = Result<T, CoreError>;
