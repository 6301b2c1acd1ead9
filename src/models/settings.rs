use crate::error::ModelError;

/// Day of the month on which a reporting month begins.
///
/// Restricted to 1..=28 so that every calendar month contains the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthStartDay(u32);

impl MonthStartDay {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 28;

    pub fn new(day: u32) -> Result<Self, ModelError> {
        if (Self::MIN..=Self::MAX).contains(&day) {
            Ok(Self(day))
        } else {
            Err(ModelError::InvalidMonthStartDay(day))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MonthStartDay {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for MonthStartDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
