mod cli;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::db::Database;
use crate::display::Painter;
use crate::models::{parse_budget_limit, parse_date, MonthStartDay};
use crate::tracker::Tracker;

const MAX_MONTHS_BACK: i64 = 120;

/// Croissant - local-only personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// File path to the SQLite database.
    #[arg(long, global = true, env = "CROISSANT_DB")]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never colour output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Defaults to `summary`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Record a transaction (negative amounts are expenses).
    Add {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Currency code (default MYR).
        #[arg(long)]
        currency: Option<String>,
        /// Category name or id.
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// YYYY-MM-DD (default today).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Change fields of a transaction.
    Edit {
        /// Transaction id or unique id prefix.
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        /// Category name or id.
        #[arg(long, conflicts_with = "uncategorize")]
        category: Option<String>,
        /// Remove the transaction's category.
        #[arg(long)]
        uncategorize: bool,
        #[arg(long)]
        note: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Delete a transaction.
    Rm {
        /// Transaction id or unique id prefix.
        id: String,
    },
    /// List transactions, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a category.
    AddCategory {
        name: String,
        /// Budget limit for the category.
        #[arg(long, value_parser = parse_budget_limit)]
        budget: Option<Decimal>,
    },
    /// Rename a category or change its budget.
    EditCategory {
        /// Category name or id.
        category: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_budget_limit, conflicts_with = "clear_budget")]
        budget: Option<Decimal>,
        /// Remove the budget limit.
        #[arg(long)]
        clear_budget: bool,
    },
    /// Delete a category; its transactions become uncategorized.
    RmCategory {
        /// Category name or id.
        category: String,
    },
    /// List categories with spending and budget progress.
    Categories,
    /// Show one category and its transactions.
    Category {
        /// Category name or id.
        category: String,
    },
    /// Income, expenses, monthly expense series and spending by category.
    Summary {
        /// Reference date, YYYY-MM-DD (default today).
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
        /// Number of custom months in the expense series (1-120).
        #[arg(
            long,
            default_value_t = crate::aggregate::DEFAULT_MONTHS_BACK,
            value_parser = clap::value_parser!(u16).range(1..=MAX_MONTHS_BACK)
        )]
        months: u16,
    },
    /// Show or change settings.
    Settings {
        /// Day of the month (1-28) on which reporting months begin.
        #[arg(long, value_parser = parse_month_start_day)]
        month_start_day: Option<MonthStartDay>,
    },
    /// Insert a sample category and transaction.
    SeedSample,
}

fn parse_month_start_day(s: &str) -> Result<MonthStartDay, String> {
    let day: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a whole number"))?;
    MonthStartDay::new(day).map_err(|e| e.to_string())
}

pub(crate) fn as_cli(command: Command, tracker: &mut Tracker<Database>, painter: Painter) -> Result<()> {
    match command {
        Command::Add {
            amount,
            currency,
            category,
            note,
            date,
        } => cli::add(tracker, painter, amount, currency, category, note, date),
        Command::Edit {
            id,
            amount,
            currency,
            category,
            uncategorize,
            note,
            date,
        } => cli::edit(
            tracker,
            painter,
            &id,
            cli::EditArgs {
                amount,
                currency,
                category,
                uncategorize,
                note,
                date,
            },
        ),
        Command::Rm { id } => cli::remove(tracker, &id),
        Command::List { limit } => cli::list(tracker, painter, limit),
        Command::AddCategory { name, budget } => cli::add_category(tracker, &name, budget),
        Command::EditCategory {
            category,
            name,
            budget,
            clear_budget,
        } => cli::edit_category(tracker, &category, name, budget, clear_budget),
        Command::RmCategory { category } => cli::remove_category(tracker, &category),
        Command::Categories => cli::categories(tracker, painter),
        Command::Category { category } => cli::category(tracker, painter, &category),
        Command::Summary { as_of, months } => {
            cli::summary(tracker, painter, as_of, usize::from(months))
        }
        Command::Settings { month_start_day } => cli::settings(tracker, month_start_day),
        Command::SeedSample => cli::seed_sample(tracker),
    }
}
