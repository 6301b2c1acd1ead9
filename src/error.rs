use thiserror::Error;

/// Validation failures for user-supplied model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ModelError {
    #[error("month start day must be between 1 and 28, got {0}")]
    InvalidMonthStartDay(u32),

    #[error("category name cannot be empty")]
    EmptyCategoryName,

    #[error("invalid budget limit '{0}': expected a decimal number")]
    InvalidBudgetLimit(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
