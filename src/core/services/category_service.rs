use uuid::Uuid;

use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{Category, CategoryKind};
use crate::ledger::Ledger;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, name: &str, kind: CategoryKind) -> ServiceResult<Uuid> {
        Self::validate_name(ledger, None, name)?;
        Ok(ledger.add_category(Category::new(name.trim(), kind)))
    }

    pub fn edit(ledger: &mut Ledger, id: Uuid, name: &str, kind: CategoryKind) -> ServiceResult<()> {
        Self::validate_name(ledger, Some(id), name)?;
        let category = ledger
            .category_mut(id)
            .ok_or_else(|| CoreError::not_found("category", id))?;
        category.name = name.trim().to_string();
        category.kind = kind;
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<()> {
        if ledger.entries.iter().any(|entry| entry.category_id == id) {
            return Err(CoreError::validation("category has linked entries"));
        }
        ledger
            .remove_category(id)
            .ok_or_else(|| CoreError::not_found("category", id))?;
        Ok(())
    }

    pub fn list<'a>(ledger: &'a Ledger) -> Vec<&'a Category> {
        ledger.categories.iter().collect()
    }

    fn validate_name(ledger: &Ledger, editing: Option<Uuid>, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("category name is required"));
        }
        let duplicate = ledger
            .categories
            .iter()
            .any(|category| category.name.eq_ignore_ascii_case(name) && Some(category.id) != editing);
        if duplicate {
            return Err(CoreError::validation("category name already in use"));
        }
        Ok(())
    }
}
