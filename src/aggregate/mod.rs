//! Reporting values derived from already-fetched transactions and categories.
//!
//! Everything here is a pure function of its arguments: no I/O, no shared
//! state, and no failure modes. Callers apply the defaulting policy (unset
//! amount is zero, unset date is today) before handing records over.

mod window;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Category, MonthStartDay, Transaction};

pub use window::MonthWindow;

pub(crate) const UNCATEGORIZED: &str = "Uncategorized";
pub(crate) const DEFAULT_MONTHS_BACK: u16 = 3;

/// Sums saturate at `Decimal::MAX` instead of overflowing.
fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of all positive amounts.
pub fn total_income(transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount),
    )
}

/// Sum of the magnitudes of all negative amounts.
pub fn total_expense(transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.abs_amount()),
    )
}

/// Signed sum of every transaction that references `category`.
///
/// The sign is kept; display code decides how to present it.
pub fn category_spend(category: &Category, transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.category_id == Some(category.id))
            .map(|t| t.amount),
    )
}

/// Share of a category's budget that has been used, capped at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetProgress {
    pub ratio: Decimal,
}

impl BudgetProgress {
    pub fn is_at_or_over(&self) -> bool {
        self.ratio >= Decimal::ONE
    }
}

/// `None` when the category has no positive budget limit.
pub fn budget_progress(category: &Category, transactions: &[Transaction]) -> Option<BudgetProgress> {
    let limit = category.budget_limit.filter(|l| *l > Decimal::ZERO)?;
    let spent = category_spend(category, transactions).abs();
    let ratio = spent.checked_div(limit).unwrap_or(Decimal::ONE);
    Some(BudgetProgress {
        ratio: ratio.min(Decimal::ONE),
    })
}

/// One bar of the monthly expense chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub window: MonthWindow,
    pub label: String,
    pub total: Decimal,
}

/// Expense totals for the `months_back` custom months ending with the one
/// containing `reference_date`, oldest first.
pub fn monthly_expense_series(
    transactions: &[Transaction],
    month_start_day: MonthStartDay,
    reference_date: NaiveDate,
    months_back: usize,
) -> Vec<SeriesPoint> {
    let windows = MonthWindow::trailing(reference_date, month_start_day.get(), months_back);
    let mut totals = vec![Decimal::ZERO; windows.len()];

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        if let Some(idx) = windows.iter().position(|w| w.contains(txn.date)) {
            totals[idx] = totals[idx].saturating_add(txn.abs_amount());
        }
    }

    windows
        .into_iter()
        .zip(totals)
        .map(|(window, total)| SeriesPoint {
            label: window.label(),
            window,
            total,
        })
        .collect()
}

/// Expense total for one category name.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseBreakdown {
    /// Largest total first.
    pub slices: Vec<CategorySlice>,
    pub total_expenses: Decimal,
}

/// Expenses grouped by category name, largest first.
///
/// Transactions without a category, with a category that is not in
/// `categories`, or whose category has no name are grouped under
/// "Uncategorized".
pub fn category_expense_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> ExpenseBreakdown {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .filter_map(|c| {
            let name = c.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
            Some((c.id, name))
        })
        .collect();

    let mut grouped: HashMap<&str, Decimal> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let name = txn
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNCATEGORIZED);
        let total = grouped.entry(name).or_default();
        *total = total.saturating_add(txn.abs_amount());
    }

    let mut slices: Vec<CategorySlice> = grouped
        .into_iter()
        .map(|(name, total)| CategorySlice {
            name: name.to_string(),
            total,
        })
        .collect();
    slices.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    let total_expenses = saturating_sum(slices.iter().map(|s| s.total));
    ExpenseBreakdown {
        slices,
        total_expenses,
    }
}

#[cfg(test)]
mod tests;
