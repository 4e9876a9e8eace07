use std::str::FromStr;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use super::{Draft, Resource};
use crate::api::{ApiClient, ApiError};
use crate::models::{Category, Transaction, TransactionPayload};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Category label, or a raw id when the label could not be resolved.
    pub category: String,
    /// Id the draft was seeded with. Kept while `category` still names it.
    pub category_id: Option<String>,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            amount: "0".into(),
            description: String::new(),
            date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            category: String::new(),
            category_id: None,
        }
    }
}

impl Draft for TransactionDraft {
    fn labels() -> &'static [&'static str] {
        &["Amount", "Description", "Date (YYYY-MM-DD)", "Category"]
    }

    fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.amount,
            1 => &self.description,
            2 => &self.date,
            3 => &self.category,
            _ => "",
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.amount),
            1 => Some(&mut self.description),
            2 => Some(&mut self.date),
            3 => Some(&mut self.category),
            _ => None,
        }
    }
}

impl Resource for Transaction {
    type Draft = TransactionDraft;
    type Payload = TransactionPayload;

    const NAME: &'static str = "transaction";

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn to_draft(&self, categories: &[Category]) -> TransactionDraft {
        let category = self
            .category_id
            .as_deref()
            .map(|id| {
                Category::find_by_id(categories, id)
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .unwrap_or_default();
        TransactionDraft {
            amount: self.amount.normalize().to_string(),
            description: self.description.clone(),
            date: self.date.format(DATE_FORMAT).to_string(),
            category,
            category_id: self.category_id.clone(),
        }
    }

    fn validate(
        draft: &TransactionDraft,
        categories: &[Category],
    ) -> Result<TransactionPayload, String> {
        let amount = Decimal::from_str(draft.amount.trim())
            .map_err(|_| format!("Invalid amount: '{}'", draft.amount))?;
        if amount <= Decimal::ZERO {
            return Err("Amount must be greater than zero".into());
        }

        let description = draft.description.trim();
        if description.is_empty() {
            return Err("Description is required".into());
        }

        let day = NaiveDate::parse_from_str(draft.date.trim(), DATE_FORMAT)
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", draft.date))?;
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("Invalid date '{}'", draft.date))?;

        if draft.category.trim().is_empty() {
            return Err("Category is required".into());
        }
        let category = resolve_category(draft, categories)?;
        let category_id = category
            .id
            .clone()
            .ok_or_else(|| format!("Category '{}' has no id yet", category.label))?;

        Ok(TransactionPayload {
            amount,
            description: description.to_string(),
            date: Utc.from_utc_datetime(&midnight),
            category_id,
        })
    }

    fn create(api: &ApiClient, token: &str, payload: &TransactionPayload) -> Result<(), ApiError> {
        api.create_transaction(token, payload)
    }

    fn update(
        api: &ApiClient,
        token: &str,
        id: &str,
        payload: &TransactionPayload,
    ) -> Result<(), ApiError> {
        api.update_transaction(token, id, payload)
    }

    fn delete(api: &ApiClient, token: &str, id: &str) -> Result<(), ApiError> {
        api.delete_transaction(token, id)
    }
}

/// Seeded id first, then a typed id, then a label that names exactly one
/// category.
fn resolve_category<'a>(
    draft: &TransactionDraft,
    categories: &'a [Category],
) -> Result<&'a Category, String> {
    let wanted = draft.category.trim();
    let names = |c: &&Category| {
        c.label.to_lowercase() == wanted.to_lowercase() || c.id.as_deref() == Some(wanted)
    };

    let seeded = draft
        .category_id
        .as_deref()
        .and_then(|id| Category::find_by_id(categories, id))
        .filter(names);
    if let Some(category) = seeded {
        return Ok(category);
    }
    if let Some(category) = Category::find_by_id(categories, wanted) {
        return Ok(category);
    }

    match Category::with_label(categories, wanted).as_slice() {
        [] => Err(format!("Unknown category: '{wanted}'")),
        [only] => Ok(*only),
        _ => Err(format!("More than one category is labelled '{wanted}', enter its id")),
    }
}
