use crossterm::style::{Color, Stylize};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::BudgetProgress;

/// Shown in place of a category name for uncategorized transactions.
pub(crate) const NO_CATEGORY: &str = "—";

pub(crate) const GREEN: Color = Color::Rgb {
    r: 166,
    g: 227,
    b: 161,
};
pub(crate) const RED: Color = Color::Rgb {
    r: 243,
    g: 139,
    b: 168,
};
pub(crate) const YELLOW: Color = Color::Rgb {
    r: 249,
    g: 226,
    b: 175,
};

/// Format an amount with its currency code, thousand separators and
/// 2 decimal places, e.g. `-1234.5` → `"-MYR 1,234.50"`.
pub(crate) fn format_amount(val: Decimal, currency: &str) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO && !abs.is_zero() {
        format!("-{currency} {with_commas}.{dec_part}")
    } else {
        format!("{currency} {with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Colour role of a value on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Income,
    Expense,
    Neutral,
    Warning,
}

impl Tone {
    /// Negative amounts are expenses; everything else reads as income,
    /// matching how transaction rows are coloured.
    pub(crate) fn of_amount(val: Decimal) -> Self {
        if val < Decimal::ZERO {
            Self::Expense
        } else {
            Self::Income
        }
    }

    pub(crate) fn of_progress(progress: &BudgetProgress) -> Self {
        if progress.is_at_or_over() {
            Self::Warning
        } else {
            Self::Neutral
        }
    }

    pub(crate) fn color(self) -> Option<Color> {
        match self {
            Self::Income => Some(GREEN),
            Self::Expense => Some(RED),
            Self::Warning => Some(YELLOW),
            Self::Neutral => None,
        }
    }
}

/// Colours text by [`Tone`] when enabled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Painter {
    pub enabled: bool,
}

impl Painter {
    pub(crate) fn paint(&self, text: &str, tone: Tone) -> String {
        match tone.color() {
            Some(color) if self.enabled => text.with(color).to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render a ratio in `[0, 1]` as a fixed-width bar, e.g. `[#####-----]`.
pub(crate) fn progress_bar(ratio: Decimal, width: usize) -> String {
    let ratio = ratio.clamp(Decimal::ZERO, Decimal::ONE);
    let filled = (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Ratio as a whole percentage, e.g. `0.256` → `"26%"`.
pub(crate) fn percent(ratio: Decimal) -> String {
    let pct = (ratio * Decimal::ONE_HUNDRED).round();
    format!("{pct}%")
}
