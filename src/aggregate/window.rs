use chrono::{Datelike, NaiveDate};

/// A calendar month used as the anchor of a reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthAnchor {
    year: i32,
    month: u32,
}

impl MonthAnchor {
    fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whether the first of this month is a representable date.
    fn is_representable(self) -> bool {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).is_some()
    }

    fn last_day(self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// `day` of this month, clamped to the month's last day.
    pub(crate) fn day(self, day: u32) -> NaiveDate {
        let last = self.last_day();
        last.with_day(day.clamp(1, last.day())).unwrap_or(last)
    }
}

/// Half-open date range `[start, end)` one custom month long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    fn anchored(anchor: MonthAnchor, start_day: u32) -> Self {
        Self {
            start: anchor.day(start_day),
            end: anchor.next().day(start_day),
        }
    }

    /// The window that contains `date` when months begin on `start_day`.
    pub fn containing(date: NaiveDate, start_day: u32) -> Self {
        let anchor = MonthAnchor::of(date);
        let anchor = if date < anchor.day(start_day) {
            anchor.prev()
        } else {
            anchor
        };
        Self::anchored(anchor, start_day)
    }

    /// `count` consecutive windows ending with the one containing `date`, oldest first.
    ///
    /// Fewer are returned when the earliest would start before `NaiveDate::MIN`.
    pub fn trailing(date: NaiveDate, start_day: u32, count: usize) -> Vec<Self> {
        let newest = MonthAnchor::of(Self::containing(date, start_day).start);
        let mut anchors: Vec<MonthAnchor> =
            std::iter::successors(Some(newest), |a| Some(a.prev()))
                .take(count)
                .take_while(|a| a.is_representable())
                .collect();
        anchors.reverse();
        anchors
            .into_iter()
            .map(|a| Self::anchored(a, start_day))
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Short label for charts, e.g. "Mar 1".
    pub fn label(&self) -> String {
        self.start.format("%b %-d").to_string()
    }
}
