use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use super::Transaction;
use crate::error::ModelError;

pub(crate) const UNNAMED: &str = "Unnamed";

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: Option<String>,
    pub budget_limit: Option<Decimal>,
    pub created_at: String,
}

impl Category {
    /// Create a named category. Blank names are rejected here even though
    /// stored categories are allowed to have no name.
    pub fn new(name: &str, budget_limit: Option<Decimal>) -> Result<Self, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyCategoryName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            budget_limit,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// The name to show a user; unset or blank names render as "Unnamed".
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n,
            _ => UNNAMED,
        }
    }

    /// Transactions referencing this category, newest first.
    pub fn transactions_in<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut own: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.category_id == Some(self.id))
            .collect();
        own.sort_by(|a, b| b.date.cmp(&a.date));
        own
    }

    /// Find categories by full id, unique id prefix, or case-insensitive name.
    pub fn find_by_token<'a>(categories: &'a [Category], token: &str) -> Vec<&'a Category> {
        let token = token.trim();
        if token.is_empty() {
            return Vec::new();
        }
        if let Ok(id) = Uuid::parse_str(token) {
            return categories.iter().filter(|c| c.id == id).collect();
        }

        let lower = token.to_lowercase();
        let by_name: Vec<&Category> = categories
            .iter()
            .filter(|c| c.name.as_deref().is_some_and(|n| n.to_lowercase() == lower))
            .collect();
        if !by_name.is_empty() {
            return by_name;
        }

        categories
            .iter()
            .filter(|c| c.id.to_string().starts_with(&lower))
            .collect()
    }

    pub fn find_by_id(categories: &[Category], id: Uuid) -> Option<&Category> {
        categories.iter().find(|c| c.id == id)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Field-by-field changes to a category. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct CategoryEdit {
    pub name: Option<String>,
    /// `Some(None)` removes the budget.
    pub budget_limit: Option<Option<Decimal>>,
}

impl CategoryEdit {
    pub fn apply(self, category: &mut Category) -> Result<(), ModelError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ModelError::EmptyCategoryName);
            }
            category.name = Some(name.to_string());
        }
        if let Some(limit) = self.budget_limit {
            category.budget_limit = limit;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.budget_limit.is_none()
    }
}

pub fn parse_budget_limit(input: &str) -> Result<Decimal, ModelError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|_| ModelError::InvalidBudgetLimit(input.to_string()))
}
