mod category;
mod settings;
mod transaction;

pub use category::{parse_budget_limit, Category, CategoryEdit};
pub use settings::MonthStartDay;
pub use transaction::{parse_date, NewTransaction, Transaction, TransactionEdit};

pub(crate) use transaction::{amount_in_range, DEFAULT_CURRENCY};

#[cfg(test)]
pub(crate) use category::UNNAMED;
#[cfg(test)]
pub(crate) use transaction::{parse_amount, MAX_AMOUNT_UNITS};
