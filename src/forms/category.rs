use super::{Draft, Resource};
use crate::api::{ApiClient, ApiError};
use crate::models::{Category, CategoryIcon, CategoryPayload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub label: String,
    pub icon: String,
}

impl CategoryDraft {
    /// Step the icon field through the known icons.
    pub fn cycle_icon(&mut self) {
        self.icon = match CategoryIcon::parse(&self.icon) {
            Some(icon) => icon.next(),
            None => CategoryIcon::Car,
        }
        .as_str()
        .to_string();
    }
}

impl Draft for CategoryDraft {
    fn labels() -> &'static [&'static str] {
        &["Category Name", "Icon"]
    }

    fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.label,
            1 => &self.icon,
            _ => "",
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.label),
            1 => Some(&mut self.icon),
            _ => None,
        }
    }
}

impl Resource for Category {
    type Draft = CategoryDraft;
    type Payload = CategoryPayload;

    const NAME: &'static str = "category";

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn to_draft(&self, _categories: &[Category]) -> CategoryDraft {
        CategoryDraft {
            label: self.label.clone(),
            icon: self.icon.clone(),
        }
    }

    fn validate(draft: &CategoryDraft, _categories: &[Category]) -> Result<CategoryPayload, String> {
        let label = draft.label.trim();
        if label.is_empty() {
            return Err("Category name is required".into());
        }
        let icon = CategoryIcon::parse(&draft.icon).ok_or_else(|| {
            let names: Vec<&str> = CategoryIcon::all().iter().map(|i| i.as_str()).collect();
            format!("Icon must be one of: {}", names.join(", "))
        })?;
        Ok(CategoryPayload {
            label: label.to_string(),
            icon: icon.as_str().to_string(),
        })
    }

    fn create(api: &ApiClient, token: &str, payload: &CategoryPayload) -> Result<(), ApiError> {
        api.create_category(token, payload)
    }

    fn update(
        api: &ApiClient,
        token: &str,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<(), ApiError> {
        api.update_category(token, id, payload)
    }

    fn delete(api: &ApiClient, token: &str, id: &str) -> Result<(), ApiError> {
        api.delete_category(token, id)
    }
}
