//! Client-side copy of `GET /transaction`.
//!
//! The server groups transactions by month and computes the totals; this
//! cache only holds the last response and is replaced wholesale on refresh.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ApiError;
use crate::chart::{monthly_bars, MonthBar};
use crate::models::{Category, MonthlyAggregate, Transaction};
use crate::session::AppContext;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    months: Vec<MonthlyAggregate>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetch the listing. On failure the previous data is kept.
    pub fn refresh(&mut self, ctx: &AppContext) -> Result<(), ApiError> {
        let token = ctx.bearer()?;
        let months = ctx.api().list_transactions(&token)?;
        info!(
            "Loaded {} months, {} transactions",
            months.len(),
            months.iter().map(|m| m.transactions.len()).sum::<usize>()
        );
        self.months = months;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.months.clear();
    }

    pub fn months(&self) -> &[MonthlyAggregate] {
        &self.months
    }

    /// All transactions flattened in server order.
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.months
            .iter()
            .flat_map(|m| m.transactions.iter())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.months.iter().map(|m| m.transactions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.months
            .iter()
            .flat_map(|m| m.transactions.iter())
            .nth(index)
    }

    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.months
            .iter()
            .flat_map(|m| m.transactions.iter())
            .find(|t| t.id.as_deref() == Some(id))
    }

    pub fn bars(&self) -> Vec<MonthBar> {
        monthly_bars(&self.months)
    }

    /// Write every transaction to a CSV file. Returns the number of rows written.
    pub fn export_csv(&self, path: &Path, categories: &[Category]) -> Result<usize> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        wtr.write_record(["id", "date", "description", "category", "amount"])?;

        let mut count = 0;
        for txn in self.transactions() {
            let category = txn
                .category_id
                .as_deref()
                .and_then(|id| Category::find_by_id(categories, id))
                .map(|c| c.label.as_str())
                .unwrap_or("");
            let amount = txn.amount.normalize().to_string();
            let date = txn.date.format("%Y-%m-%d").to_string();
            wtr.write_record([
                txn.id.as_deref().unwrap_or(""),
                date.as_str(),
                txn.description.as_str(),
                category,
                amount.as_str(),
            ])?;
            count += 1;
        }
        wtr.flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Exported {count} transactions to {}", path.display());
        Ok(count)
    }
}
