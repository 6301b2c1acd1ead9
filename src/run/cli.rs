use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::display::{format_amount, percent, progress_bar, truncate, Painter, Tone, NO_CATEGORY};
use crate::models::*;
use crate::tracker::{today, CategoryRow, Tracker};

type App = Tracker<Database>;

const RULE_WIDTH: usize = 48;
const BAR_WIDTH: usize = 20;

pub(crate) struct EditArgs {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub uncategorize: bool,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

pub(crate) fn add(
    tracker: &mut App,
    painter: Painter,
    amount: String,
    currency: Option<String>,
    category: Option<String>,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let category_id = category
        .map(|c| tracker.resolve_category(&c))
        .transpose()?
        .map(|c| c.id);
    let txn = tracker.add_transaction(NewTransaction {
        amount: Some(amount),
        currency,
        note,
        date,
        category_id,
    })?;
    println!("Added {}", short_id(&txn));
    print_transaction(&txn, &tracker.categories()?, painter);
    Ok(())
}

pub(crate) fn edit(tracker: &mut App, painter: Painter, id: &str, args: EditArgs) -> Result<()> {
    let txn = tracker.resolve_transaction(id)?;
    let category_id = if args.uncategorize {
        Some(None)
    } else {
        args.category
            .map(|c| tracker.resolve_category(&c))
            .transpose()?
            .map(|c| Some(c.id))
    };
    let edited = tracker.edit_transaction(
        txn.id,
        TransactionEdit {
            amount: args.amount,
            currency: args.currency,
            note: args.note,
            date: args.date,
            category_id,
        },
    )?;
    println!("Updated {}", short_id(&edited));
    print_transaction(&edited, &tracker.categories()?, painter);
    Ok(())
}

pub(crate) fn remove(tracker: &mut App, id: &str) -> Result<()> {
    let txn = tracker.resolve_transaction(id)?;
    tracker.delete_transaction(txn.id)?;
    println!("Deleted {}", short_id(&txn));
    Ok(())
}

pub(crate) fn list(tracker: &mut App, painter: Painter, limit: Option<usize>) -> Result<()> {
    let transactions = tracker.transactions()?;
    if transactions.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let categories = tracker.categories()?;

    print_transaction_header();
    for txn in transactions.iter().take(limit.unwrap_or(usize::MAX)) {
        print_transaction(txn, &categories, painter);
    }
    Ok(())
}

pub(crate) fn add_category(tracker: &mut App, name: &str, budget: Option<Decimal>) -> Result<()> {
    let category = tracker.add_category(name, budget)?;
    println!("Added category {} ({})", category.display_name(), category.id);
    Ok(())
}

pub(crate) fn edit_category(
    tracker: &mut App,
    token: &str,
    name: Option<String>,
    budget: Option<Decimal>,
    clear_budget: bool,
) -> Result<()> {
    let category = tracker.resolve_category(token)?;
    let budget_limit = if clear_budget {
        Some(None)
    } else {
        budget.map(Some)
    };
    let edited = tracker.edit_category(category.id, CategoryEdit { name, budget_limit })?;
    println!("Updated category {}", edited.display_name());
    Ok(())
}

pub(crate) fn remove_category(tracker: &mut App, token: &str) -> Result<()> {
    let category = tracker.resolve_category(token)?;
    tracker.delete_category(category.id)?;
    println!(
        "Deleted category {} (its transactions are now uncategorized)",
        category.display_name()
    );
    Ok(())
}

pub(crate) fn categories(tracker: &mut App, painter: Painter) -> Result<()> {
    let rows = tracker.category_overview()?;
    if rows.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!(
        "{:<8} {:<20} {:>16} {:>5}  Budget",
        "ID", "Name", "Spent", "Txns"
    );
    println!("{}", "─".repeat(RULE_WIDTH + 24));
    for row in &rows {
        print_category_row(row, painter);
    }
    Ok(())
}

pub(crate) fn category(tracker: &mut App, painter: Painter, token: &str) -> Result<()> {
    let category = tracker.resolve_category(token)?;
    let (row, transactions) = tracker.category_detail(category.id)?;

    println!("{} ({})", row.category.display_name(), row.category.id);
    println!("{}", "─".repeat(RULE_WIDTH));
    print_category_row(&row, painter);

    if transactions.is_empty() {
        println!();
        println!("No transactions");
        return Ok(());
    }
    println!();
    print_transaction_header();
    let categories = [row.category];
    for txn in &transactions {
        print_transaction(txn, &categories, painter);
    }
    Ok(())
}

pub(crate) fn summary(
    tracker: &mut App,
    painter: Painter,
    as_of: Option<NaiveDate>,
    months: usize,
) -> Result<()> {
    let dashboard = tracker.dashboard(as_of.unwrap_or_else(today), months)?;
    let money = |amount: Decimal| format_amount(amount, DEFAULT_CURRENCY);

    println!(
        "Croissant — as of {} (months start on day {})",
        dashboard.reference_date,
        dashboard.month_start_day
    );
    println!("{}", "─".repeat(RULE_WIDTH));
    println!(
        "  Income:     {}",
        painter.paint(&money(dashboard.income), Tone::Income)
    );
    println!(
        "  Expenses:   {}",
        painter.paint(&money(dashboard.expense), Tone::Expense)
    );
    let net = dashboard.net();
    println!("  Net:        {}", painter.paint(&money(net), Tone::of_amount(net)));
    println!("  Total Txns: {}", dashboard.transaction_count);

    if !dashboard.series.is_empty() {
        println!();
        println!("Monthly Expenses:");
        let peak = dashboard
            .series
            .iter()
            .map(|p| p.total)
            .max()
            .unwrap_or_default();
        for point in &dashboard.series {
            let ratio = point.total.checked_div(peak).unwrap_or_default();
            println!(
                "  {:<8} {:>16} {}",
                point.label,
                money(point.total),
                progress_bar(ratio, BAR_WIDTH)
            );
        }
    }

    if !dashboard.breakdown.slices.is_empty() {
        println!();
        println!(
            "Spending by Category (total {}):",
            money(dashboard.breakdown.total_expenses)
        );
        for slice in &dashboard.breakdown.slices {
            let share = slice
                .total
                .checked_div(dashboard.breakdown.total_expenses)
                .unwrap_or_default();
            println!(
                "  {:<24} {:>16} {:>5}",
                truncate(&slice.name, 24),
                money(slice.total),
                percent(share)
            );
        }
    }

    Ok(())
}

pub(crate) fn settings(tracker: &mut App, month_start_day: Option<MonthStartDay>) -> Result<()> {
    if let Some(day) = month_start_day {
        tracker.set_month_start_day(day)?;
    }
    println!("month-start-day = {}", tracker.month_start_day()?);
    Ok(())
}

pub(crate) fn seed_sample(tracker: &mut App) -> Result<()> {
    let (category, txn) = tracker.seed_sample_data()?;
    println!(
        "Added category {} and transaction {}",
        category.display_name(),
        short_id(&txn)
    );
    Ok(())
}

// ── Rows ──────────────────────────────────────────────────────

fn short_id(txn: &Transaction) -> String {
    txn.id.to_string().chars().take(8).collect()
}

fn print_transaction_header() {
    println!(
        "{:<8} {:<10} {:<16} {:<24} {:>16}",
        "ID", "Date", "Category", "Note", "Amount"
    );
    println!("{}", "─".repeat(RULE_WIDTH + 30));
}

fn print_transaction(txn: &Transaction, categories: &[Category], painter: Painter) {
    let category = txn
        .category_id
        .and_then(|id| Category::find_by_id(categories, id))
        .map(|c| c.display_name())
        .unwrap_or(NO_CATEGORY);
    let amount = format!("{:>16}", format_amount(txn.amount, &txn.currency));
    println!(
        "{:<8} {:<10} {:<16} {:<24} {}",
        short_id(txn),
        txn.date.to_string(),
        truncate(category, 16),
        truncate(txn.note.as_deref().unwrap_or(""), 24),
        painter.paint(&amount, Tone::of_amount(txn.amount)),
    );
}

fn print_category_row(row: &CategoryRow, painter: Painter) {
    let id: String = row.category.id.to_string().chars().take(8).collect();
    let spent = format!("{:>16}", format_amount(row.spend.abs(), DEFAULT_CURRENCY));
    let spent_tone = if row.spend < Decimal::ZERO {
        Tone::Expense
    } else {
        Tone::Neutral
    };
    let budget = match (&row.progress, row.category.budget_limit) {
        (Some(progress), Some(limit)) => painter.paint(
            &format!(
                "{} {:>4} of {}",
                progress_bar(progress.ratio, BAR_WIDTH),
                percent(progress.ratio),
                format_amount(limit, DEFAULT_CURRENCY)
            ),
            Tone::of_progress(progress),
        ),
        _ => String::new(),
    };
    println!(
        "{:<8} {:<20} {} {:>5}  {}",
        id,
        truncate(row.category.display_name(), 20),
        painter.paint(&spent, spent_tone),
        row.transaction_count,
        budget
    );
}
