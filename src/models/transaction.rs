use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    /// Weak reference into `User.categories`; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl Transaction {
    /// Date formatted the way the transaction table shows it, e.g. `15 Jan, 2024`.
    pub fn display_date(&self) -> String {
        self.date.format("%d %b, %Y").to_string()
    }
}

/// Body of `POST /transaction` and `PATCH /transaction/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category_id: String,
}
