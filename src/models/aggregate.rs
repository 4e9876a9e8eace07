use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Transaction;

/// Per-month totals computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Month number, 1-12.
    #[serde(rename = "_id")]
    pub month: u32,
    #[serde(rename = "totalExpenses", with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Envelope of `GET /transaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListing {
    #[serde(default)]
    pub data: Vec<MonthlyAggregate>,
}
