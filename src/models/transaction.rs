use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ModelError;

pub(crate) const DEFAULT_CURRENCY: &str = "MYR";

/// Largest accepted magnitude, in whole currency units.
pub(crate) const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// Whether `amount` is small enough to be recorded.
pub(crate) fn amount_in_range(amount: Decimal) -> bool {
    amount.abs() <= Decimal::from(MAX_AMOUNT_UNITS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub category_id: Option<Uuid>,
    pub created_at: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// Find a transaction by full id or unique id prefix.
    pub fn find_by_token<'a>(
        transactions: &'a [Transaction],
        token: &str,
    ) -> Vec<&'a Transaction> {
        let token = token.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&token) {
            return transactions.iter().filter(|t| t.id == id).collect();
        }
        if token.is_empty() {
            return Vec::new();
        }
        transactions
            .iter()
            .filter(|t| t.id.to_string().starts_with(&token))
            .collect()
    }
}

/// A transaction as entered by the user, before defaulting.
///
/// Every field may be missing; [`NewTransaction::into_transaction`] fills
/// the gaps so the aggregation code never sees an unset value.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

impl NewTransaction {
    pub fn into_transaction(self, today: NaiveDate) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            amount: self
                .amount
                .as_deref()
                .map(parse_amount)
                .unwrap_or_default(),
            currency: normalize_currency(self.currency.as_deref()),
            note: normalize_note(self.note),
            date: self.date.unwrap_or(today),
            category_id: self.category_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Field-by-field changes to an existing transaction. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<Uuid>>,
}

impl TransactionEdit {
    pub fn apply(self, txn: &mut Transaction) {
        if let Some(amount) = self.amount.as_deref() {
            txn.amount = parse_amount(amount);
        }
        if let Some(currency) = self.currency.as_deref() {
            txn.currency = normalize_currency(Some(currency));
        }
        if let Some(note) = self.note {
            txn.note = normalize_note(Some(note));
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(category_id) = self.category_id {
            txn.category_id = category_id;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.currency.is_none()
            && self.note.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
    }
}

/// Lenient amount parsing: anything that is not a decimal, or whose
/// magnitude exceeds [`MAX_AMOUNT_UNITS`], counts as zero.
pub fn parse_amount(input: &str) -> Decimal {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    match Decimal::from_str(&cleaned) {
        Ok(amount) if amount_in_range(amount) => amount,
        Ok(_) => {
            tracing::warn!(input, "amount is out of range, defaulting to 0");
            Decimal::ZERO
        }
        Err(_) => {
            tracing::warn!(input, "amount is not a number, defaulting to 0");
            Decimal::ZERO
        }
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(input.to_string()))
}

fn normalize_currency(currency: Option<&str>) -> String {
    match currency.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CURRENCY.to_string(),
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
