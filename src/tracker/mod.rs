//! The application layer between the store and the command line.
//!
//! Applies the input defaulting policy, assigns identifiers, persists
//! changes, and publishes a [`Change`] after each one. Reporting methods
//! fetch the collections and hand them to [`crate::aggregate`].

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::mpsc::Receiver;
use uuid::Uuid;

use crate::aggregate::{self, BudgetProgress, ExpenseBreakdown, SeriesPoint};
use crate::db::{SettingsStore, Store};
use crate::events::{Change, ChangeBus};
use crate::models::*;

/// Everything the summary screen shows.
#[derive(Debug, Clone)]
pub(crate) struct Dashboard {
    pub reference_date: NaiveDate,
    pub month_start_day: MonthStartDay,
    pub income: Decimal,
    pub expense: Decimal,
    pub transaction_count: usize,
    pub series: Vec<SeriesPoint>,
    pub breakdown: ExpenseBreakdown,
}

impl Dashboard {
    pub(crate) fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

/// A category with its derived spend and budget progress.
#[derive(Debug, Clone)]
pub(crate) struct CategoryRow {
    pub category: Category,
    pub spend: Decimal,
    pub progress: Option<BudgetProgress>,
    pub transaction_count: usize,
}

pub(crate) struct Tracker<S> {
    store: S,
    bus: ChangeBus,
}

impl<S: Store + SettingsStore> Tracker<S> {
    pub(crate) fn new(store: S) -> Self {
        Self {
            store,
            bus: ChangeBus::new(),
        }
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<Change> {
        let receiver = self.bus.subscribe();
        tracing::debug!(subscribers = self.bus.subscriber_count(), "change subscriber added");
        receiver
    }

    pub(crate) fn transactions(&self) -> Result<Vec<Transaction>> {
        self.store.fetch_transactions()
    }

    pub(crate) fn categories(&self) -> Result<Vec<Category>> {
        self.store.fetch_categories()
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        if let Some(category_id) = new.category_id {
            self.require_category(category_id)?;
        }
        let txn = new.into_transaction(today());
        self.store.save_transaction(&txn)?;
        tracing::info!(id = %txn.id, amount = %txn.amount, date = %txn.date, "added transaction");
        self.bus.publish(Change::TransactionSaved(txn.id));
        Ok(txn)
    }

    pub(crate) fn edit_transaction(&mut self, id: Uuid, edit: TransactionEdit) -> Result<Transaction> {
        if edit.is_empty() {
            bail!("Nothing to change");
        }
        if let Some(Some(category_id)) = edit.category_id {
            self.require_category(category_id)?;
        }
        let mut txn = self
            .store
            .find_transaction(id)?
            .with_context(|| format!("Transaction {id} not found"))?;
        edit.apply(&mut txn);
        self.store.save_transaction(&txn)?;
        tracing::info!(%id, "edited transaction");
        self.bus.publish(Change::TransactionSaved(id));
        Ok(txn)
    }

    pub(crate) fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        if !self.store.delete_transaction(id)? {
            bail!("Transaction {id} not found");
        }
        tracing::info!(%id, "deleted transaction");
        self.bus.publish(Change::TransactionDeleted(id));
        Ok(())
    }

    /// Look up a transaction by full id or unique id prefix.
    pub(crate) fn resolve_transaction(&self, token: &str) -> Result<Transaction> {
        let all = self.store.fetch_transactions()?;
        match Transaction::find_by_token(&all, token).as_slice() {
            [] => bail!("No transaction matches '{token}'"),
            [one] => Ok((*one).clone()),
            many => bail!(
                "'{token}' matches {} transactions; use a longer id",
                many.len()
            ),
        }
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, name: &str, budget_limit: Option<Decimal>) -> Result<Category> {
        let category = Category::new(name, budget_limit)?;
        self.store.save_category(&category)?;
        tracing::info!(id = %category.id, name = category.display_name(), "added category");
        self.bus.publish(Change::CategorySaved(category.id));
        Ok(category)
    }

    pub(crate) fn edit_category(&mut self, id: Uuid, edit: CategoryEdit) -> Result<Category> {
        if edit.is_empty() {
            bail!("Nothing to change");
        }
        let mut category = self.require_category(id)?;
        edit.apply(&mut category)?;
        self.store.save_category(&category)?;
        tracing::info!(%id, "edited category");
        self.bus.publish(Change::CategorySaved(id));
        Ok(category)
    }

    /// Removes the category; its transactions stay, uncategorized.
    pub(crate) fn delete_category(&mut self, id: Uuid) -> Result<()> {
        if !self.store.delete_category(id)? {
            bail!("Category {id} not found");
        }
        tracing::info!(%id, "deleted category");
        self.bus.publish(Change::CategoryDeleted(id));
        Ok(())
    }

    /// Look up a category by full id, name (case-insensitive) or unique id prefix.
    pub(crate) fn resolve_category(&self, token: &str) -> Result<Category> {
        let all = self.store.fetch_categories()?;
        match Category::find_by_token(&all, token).as_slice() {
            [] => bail!("No category matches '{token}'"),
            [one] => Ok((*one).clone()),
            many => bail!(
                "'{token}' matches {} categories; use the category id",
                many.len()
            ),
        }
    }

    fn require_category(&self, id: Uuid) -> Result<Category> {
        self.store
            .find_category(id)?
            .with_context(|| format!("Category {id} not found"))
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn month_start_day(&self) -> Result<MonthStartDay> {
        self.store.month_start_day()
    }

    pub(crate) fn set_month_start_day(&mut self, day: MonthStartDay) -> Result<()> {
        if self.store.month_start_day()? == day {
            return Ok(());
        }
        self.store.set_month_start_day(day)?;
        tracing::info!(%day, "month start day changed");
        self.bus.publish(Change::MonthStartDayChanged(day));
        Ok(())
    }

    // ── Reports ───────────────────────────────────────────────

    pub(crate) fn dashboard(&self, reference_date: NaiveDate, months_back: usize) -> Result<Dashboard> {
        let transactions = self.store.fetch_transactions()?;
        let categories = self.store.fetch_categories()?;
        let month_start_day = self.store.month_start_day()?;

        Ok(Dashboard {
            reference_date,
            month_start_day,
            income: aggregate::total_income(&transactions),
            expense: aggregate::total_expense(&transactions),
            transaction_count: transactions.len(),
            series: aggregate::monthly_expense_series(
                &transactions,
                month_start_day,
                reference_date,
                months_back,
            ),
            breakdown: aggregate::category_expense_breakdown(&transactions, &categories),
        })
    }

    pub(crate) fn category_overview(&self) -> Result<Vec<CategoryRow>> {
        let transactions = self.store.fetch_transactions()?;
        let categories = self.store.fetch_categories()?;
        Ok(categories
            .into_iter()
            .map(|category| category_row(category, &transactions))
            .collect())
    }

    /// A category's summary row plus its transactions, newest first.
    pub(crate) fn category_detail(&self, id: Uuid) -> Result<(CategoryRow, Vec<Transaction>)> {
        let category = self.require_category(id)?;
        let transactions = self.store.fetch_transactions()?;
        let own = category
            .transactions_in(&transactions)
            .into_iter()
            .cloned()
            .collect();
        Ok((category_row(category, &transactions), own))
    }

    /// Insert the preview data: a "Sample" category with a zero budget and
    /// one transaction in it.
    pub(crate) fn seed_sample_data(&mut self) -> Result<(Category, Transaction)> {
        let category = self.add_category("Sample", Some(Decimal::ZERO))?;
        let txn = self.add_transaction(NewTransaction {
            amount: Some("12.34".into()),
            note: Some("Preview".into()),
            category_id: Some(category.id),
            ..Default::default()
        })?;
        tracing::info!("seeded sample data");
        Ok((category, txn))
    }
}

fn category_row(category: Category, transactions: &[Transaction]) -> CategoryRow {
    CategoryRow {
        spend: aggregate::category_spend(&category, transactions),
        progress: aggregate::budget_progress(&category, transactions),
        transaction_count: transactions
            .iter()
            .filter(|t| t.category_id == Some(category.id))
            .count(),
        category,
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
