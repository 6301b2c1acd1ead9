#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(amount: Decimal, on: NaiveDate, category_id: Option<Uuid>) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        amount,
        currency: "MYR".into(),
        note: None,
        date: on,
        category_id,
        created_at: String::new(),
    }
}

fn category(name: Option<&str>, budget_limit: Option<Decimal>) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.map(String::from),
        budget_limit,
        created_at: String::new(),
    }
}

fn day(n: u32) -> MonthStartDay {
    MonthStartDay::new(n).unwrap()
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_totals_empty() {
    assert_eq!(total_income(&[]), Decimal::ZERO);
    assert_eq!(total_expense(&[]), Decimal::ZERO);
}

#[test]
fn test_totals_split_by_sign() {
    let on = date(2025, 3, 5);
    let txns = vec![
        txn(dec!(-50), on, None),
        txn(dec!(200), on, None),
        txn(dec!(0), on, None),
        txn(dec!(-0.25), on, None),
        txn(dec!(12.34), on, None),
    ];
    assert_eq!(total_income(&txns), dec!(212.34));
    assert_eq!(total_expense(&txns), dec!(50.25));
}

#[test]
fn test_income_minus_expense_is_signed_sum() {
    let on = date(2025, 1, 1);
    let sets: Vec<Vec<Transaction>> = vec![
        vec![],
        vec![txn(dec!(-1), on, None)],
        vec![txn(dec!(10.10), on, None), txn(dec!(-3.03), on, None)],
        vec![
            txn(dec!(-99.99), on, None),
            txn(dec!(0), on, None),
            txn(dec!(-0.01), on, None),
            txn(dec!(150), on, None),
        ],
    ];
    for txns in &sets {
        let signed: Decimal = txns.iter().map(|t| t.amount).sum();
        assert_eq!(total_income(txns) - total_expense(txns), signed);
    }
}

#[test]
fn test_scenario_window_a() {
    let txns = vec![
        txn(dec!(-50), date(2025, 3, 5), None),
        txn(dec!(200), date(2025, 3, 10), None),
    ];
    assert_eq!(total_income(&txns), dec!(200));
    assert_eq!(total_expense(&txns), dec!(50));

    let series = monthly_expense_series(&txns, day(1), date(2025, 3, 20), usize::from(DEFAULT_MONTHS_BACK));
    assert_eq!(series.last().unwrap().label, "Mar 1");
    assert_eq!(series.last().unwrap().total, dec!(50));
}

// ── Category spend & budget ───────────────────────────────────

#[test]
fn test_category_spend_is_signed() {
    let food = category(Some("Food"), Some(dec!(100)));
    let on = date(2025, 3, 1);
    let txns = vec![
        txn(dec!(-30), on, Some(food.id)),
        txn(dec!(-80), on, Some(food.id)),
        txn(dec!(-999), on, None),
    ];
    assert_eq!(category_spend(&food, &txns), dec!(-110));
}

#[test]
fn test_category_spend_mixed_signs() {
    let food = category(Some("Food"), None);
    let on = date(2025, 3, 1);
    let txns = vec![
        txn(dec!(-30), on, Some(food.id)),
        txn(dec!(45), on, Some(food.id)),
    ];
    assert_eq!(category_spend(&food, &txns), dec!(15));
}

#[test]
fn test_category_spend_order_invariant() {
    let food = category(Some("Food"), None);
    let mut txns = vec![
        txn(dec!(-1.10), date(2025, 1, 3), Some(food.id)),
        txn(dec!(-2.20), date(2025, 2, 3), Some(food.id)),
        txn(dec!(7), date(2025, 3, 3), Some(food.id)),
        txn(dec!(-5), date(2025, 3, 3), None),
    ];
    let forward = category_spend(&food, &txns);
    txns.reverse();
    assert_eq!(category_spend(&food, &txns), forward);
    txns.swap(0, 2);
    assert_eq!(category_spend(&food, &txns), forward);
}

#[test]
fn test_budget_progress_capped() {
    let food = category(Some("Food"), Some(dec!(100)));
    let on = date(2025, 3, 1);
    let txns = vec![
        txn(dec!(-30), on, Some(food.id)),
        txn(dec!(-80), on, Some(food.id)),
    ];
    let progress = budget_progress(&food, &txns).unwrap();
    assert_eq!(progress.ratio, Decimal::ONE);
    assert!(progress.is_at_or_over());
}

#[test]
fn test_budget_progress_partial() {
    let food = category(Some("Food"), Some(dec!(200)));
    let txns = vec![txn(dec!(-50), date(2025, 3, 1), Some(food.id))];
    let progress = budget_progress(&food, &txns).unwrap();
    assert_eq!(progress.ratio, dec!(0.25));
    assert!(!progress.is_at_or_over());
}

#[test]
fn test_budget_progress_exactly_at_limit() {
    let food = category(Some("Food"), Some(dec!(50)));
    let txns = vec![txn(dec!(-50), date(2025, 3, 1), Some(food.id))];
    assert!(budget_progress(&food, &txns).unwrap().is_at_or_over());
}

#[test]
fn test_budget_progress_not_applicable() {
    let on = date(2025, 3, 1);
    let no_budget = category(Some("Misc"), None);
    let zero_budget = category(Some("Sample"), Some(Decimal::ZERO));
    let negative_budget = category(Some("Odd"), Some(dec!(-10)));
    let txns = vec![
        txn(dec!(-5), on, Some(no_budget.id)),
        txn(dec!(-5), on, Some(zero_budget.id)),
    ];
    assert!(budget_progress(&no_budget, &txns).is_none());
    assert!(budget_progress(&zero_budget, &txns).is_none());
    assert!(budget_progress(&negative_budget, &txns).is_none());
}

#[test]
fn test_budget_progress_uses_magnitude_of_income() {
    let gigs = category(Some("Freelance"), Some(dec!(1000)));
    let txns = vec![txn(dec!(500), date(2025, 3, 1), Some(gigs.id))];
    assert_eq!(budget_progress(&gigs, &txns).unwrap().ratio, dec!(0.5));
}

// ── Monthly expense series ────────────────────────────────────

#[test]
fn test_series_returns_requested_bucket_count_when_empty() {
    for months in [0, 1, 3, 6, 12] {
        let series = monthly_expense_series(&[], day(1), date(2025, 3, 20), months);
        assert_eq!(series.len(), months);
        assert!(series.iter().all(|p| p.total == Decimal::ZERO));
    }
}

#[test]
fn test_series_oldest_first_with_labels() {
    let series = monthly_expense_series(&[], day(1), date(2025, 3, 20), 3);
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Jan 1", "Feb 1", "Mar 1"]);
}

#[test]
fn test_series_custom_start_day_before_anchor() {
    // Reference date is before the 15th, so the current window began last month.
    let series = monthly_expense_series(&[], day(15), date(2025, 3, 10), 3);
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Dec 15", "Jan 15", "Feb 15"]);
    assert_eq!(series[2].window.end, date(2025, 3, 15));
}

#[test]
fn test_series_crosses_year_boundary() {
    let series = monthly_expense_series(&[], day(25), date(2025, 1, 30), 3);
    assert_eq!(series[0].window.start, date(2024, 11, 25));
    assert_eq!(series[1].window.start, date(2024, 12, 25));
    assert_eq!(series[2].window.start, date(2025, 1, 25));
    assert_eq!(series[2].window.end, date(2025, 2, 25));
}

#[test]
fn test_series_buckets_expenses_only() {
    let txns = vec![
        txn(dec!(-10), date(2025, 1, 14), None), // Dec 15 window
        txn(dec!(-20), date(2025, 1, 15), None), // Jan 15 window starts here
        txn(dec!(-30), date(2025, 2, 14), None), // still Jan 15 window
        txn(dec!(-40), date(2025, 2, 15), None), // Feb 15 window
        txn(dec!(500), date(2025, 2, 20), None), // income ignored
        txn(dec!(-1), date(2025, 3, 15), None),  // after the newest window
        txn(dec!(-2), date(2024, 12, 14), None), // before the oldest window
    ];
    let series = monthly_expense_series(&txns, day(15), date(2025, 3, 1), 3);
    let totals: Vec<Decimal> = series.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![dec!(10), dec!(50), dec!(40)]);
}

#[test]
fn test_series_windows_are_contiguous() {
    for start_day in [1, 10, 28] {
        let series = monthly_expense_series(&[], day(start_day), date(2024, 3, 31), 12);
        for pair in series.windows(2) {
            assert_eq!(pair[0].window.end, pair[1].window.start);
        }
        for point in &series {
            assert!(point.window.start < point.window.end);
            assert!(point.window.contains(point.window.start));
            assert!(!point.window.contains(point.window.end));
        }
    }
}

#[test]
fn test_series_newest_window_contains_reference_date() {
    for start_day in [1, 7, 28] {
        for reference in [date(2024, 2, 29), date(2025, 12, 31), date(2025, 1, 1)] {
            let series = monthly_expense_series(&[], day(start_day), reference, 3);
            assert!(series.last().unwrap().window.contains(reference));
        }
    }
}

#[test]
fn test_series_each_expense_counted_once() {
    let txns: Vec<Transaction> = (1..=28)
        .map(|d| txn(dec!(-1), date(2025, 2, d), None))
        .collect();
    let series = monthly_expense_series(&txns, day(10), date(2025, 3, 20), 3);
    let counted: Decimal = series.iter().map(|p| p.total).sum();
    assert_eq!(counted, dec!(28));
}

#[test]
fn test_window_clamps_start_day_to_month_end() {
    // Day 31 does not exist in February; the window starts on its last day.
    let leap = MonthWindow::containing(date(2024, 2, 29), 31);
    assert_eq!(leap.start, date(2024, 2, 29));
    assert_eq!(leap.end, date(2024, 3, 31));

    let common = MonthWindow::containing(date(2025, 3, 5), 31);
    assert_eq!(common.start, date(2025, 2, 28));
    assert_eq!(common.end, date(2025, 3, 31));

    let april = MonthWindow::containing(date(2025, 4, 30), 31);
    assert_eq!(april.start, date(2025, 4, 30));
    assert_eq!(april.end, date(2025, 5, 31));
}

#[test]
fn test_clamped_windows_stay_contiguous() {
    let windows = MonthWindow::trailing(date(2025, 3, 30), 31, 6);
    assert_eq!(windows.len(), 6);
    assert_eq!(windows[5].start, date(2025, 2, 28));
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn test_window_label_format() {
    let window = MonthWindow::containing(date(2025, 9, 12), 3);
    assert_eq!(window.label(), "Sep 3");
}

// ── Category breakdown ────────────────────────────────────────

#[test]
fn test_breakdown_scenario() {
    let food = category(Some("Food"), None);
    let on = date(2025, 3, 1);
    let txns = vec![
        txn(dec!(-30), on, Some(food.id)),
        txn(dec!(-20), on, Some(food.id)),
        txn(dec!(-10), on, None),
        txn(dec!(100), on, Some(food.id)),
    ];
    let breakdown = category_expense_breakdown(&txns, std::slice::from_ref(&food));
    assert_eq!(
        breakdown.slices,
        vec![
            CategorySlice {
                name: "Food".into(),
                total: dec!(50)
            },
            CategorySlice {
                name: "Uncategorized".into(),
                total: dec!(10)
            },
        ]
    );
    assert_eq!(breakdown.total_expenses, dec!(60));
}

#[test]
fn test_breakdown_empty() {
    let breakdown = category_expense_breakdown(&[], &[]);
    assert!(breakdown.slices.is_empty());
    assert_eq!(breakdown.total_expenses, Decimal::ZERO);
}

#[test]
fn test_breakdown_merges_same_names_and_unnamed() {
    let a = category(Some("Food"), None);
    let b = category(Some("Food"), None);
    let unnamed = category(None, None);
    let on = date(2025, 3, 1);
    let dangling = Uuid::new_v4();
    let txns = vec![
        txn(dec!(-5), on, Some(a.id)),
        txn(dec!(-6), on, Some(b.id)),
        txn(dec!(-7), on, Some(unnamed.id)),
        txn(dec!(-8), on, Some(dangling)),
    ];
    let breakdown = category_expense_breakdown(&txns, &[a, b, unnamed]);
    assert_eq!(breakdown.slices.len(), 2);
    assert_eq!(breakdown.slices[0].name, "Uncategorized");
    assert_eq!(breakdown.slices[0].total, dec!(15));
    assert_eq!(breakdown.slices[1].name, "Food");
    assert_eq!(breakdown.slices[1].total, dec!(11));
    assert_eq!(breakdown.total_expenses, dec!(26));
}

#[test]
fn test_breakdown_ties_sorted_by_name() {
    let rent = category(Some("Rent"), None);
    let bills = category(Some("Bills"), None);
    let on = date(2025, 3, 1);
    let txns = vec![
        txn(dec!(-10), on, Some(rent.id)),
        txn(dec!(-10), on, Some(bills.id)),
    ];
    let breakdown = category_expense_breakdown(&txns, &[rent, bills]);
    let names: Vec<&str> = breakdown.slices.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Bills", "Rent"]);
}

// ── Extreme values ────────────────────────────────────────────

#[test]
fn test_sums_saturate_instead_of_overflowing() {
    let on = date(2025, 3, 5);
    let food = category(Some("Food"), Some(dec!(10)));
    let incomes = vec![
        txn(Decimal::MAX, on, Some(food.id)),
        txn(Decimal::MAX, on, Some(food.id)),
    ];
    let expenses = vec![
        txn(Decimal::MIN, on, Some(food.id)),
        txn(Decimal::MIN, on, Some(food.id)),
    ];

    assert_eq!(total_income(&incomes), Decimal::MAX);
    assert_eq!(total_expense(&expenses), Decimal::MAX);
    assert_eq!(category_spend(&food, &incomes), Decimal::MAX);
    assert_eq!(category_spend(&food, &expenses), Decimal::MIN);
    assert_eq!(
        budget_progress(&food, &expenses),
        Some(BudgetProgress { ratio: Decimal::ONE })
    );

    let series = monthly_expense_series(&expenses, day(1), on, 3);
    assert_eq!(series[2].total, Decimal::MAX);

    let breakdown = category_expense_breakdown(&expenses, &[food]);
    assert_eq!(breakdown.slices[0].total, Decimal::MAX);
    assert_eq!(breakdown.total_expenses, Decimal::MAX);
}

#[test]
fn test_trailing_windows_stop_at_earliest_date() {
    let reference = NaiveDate::MIN
        .checked_add_days(chrono::Days::new(40))
        .unwrap();
    let windows = MonthWindow::trailing(reference, 1, 100);
    assert_eq!(windows.len(), 2);
    assert!(windows.iter().all(|w| w.start < w.end));
    assert_eq!(windows[0].end, windows[1].start);
    assert!(windows[1].contains(reference));
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn test_repeated_calls_are_identical() {
    let food = category(Some("Food"), Some(dec!(75)));
    let txns = vec![
        txn(dec!(-30), date(2025, 2, 3), Some(food.id)),
        txn(dec!(-12.5), date(2025, 3, 4), None),
        txn(dec!(99), date(2025, 3, 5), Some(food.id)),
    ];
    let cats = vec![food.clone()];
    let reference = date(2025, 3, 20);

    assert_eq!(total_income(&txns), total_income(&txns));
    assert_eq!(total_expense(&txns), total_expense(&txns));
    assert_eq!(category_spend(&food, &txns), category_spend(&food, &txns));
    assert_eq!(budget_progress(&food, &txns), budget_progress(&food, &txns));
    assert_eq!(
        monthly_expense_series(&txns, day(1), reference, 3),
        monthly_expense_series(&txns, day(1), reference, 3)
    );
    assert_eq!(
        category_expense_breakdown(&txns, &cats),
        category_expense_breakdown(&txns, &cats)
    );
}
