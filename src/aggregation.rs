//! Filtering and aggregation of transactions for the dashboard.
//!
//! Every function here is pure and total: malformed records (an unknown type,
//! a zero amount substituted for garbage, a missing date) never cause a
//! failure, they simply contribute nothing to the totals they do not fit.
//!
//! Results are derived on demand and never stored.

use std::collections::BTreeMap;

use time::{Date, Month};

use crate::{
    Error, Field, FieldErrors,
    date::{month_abbrev, parse_date},
    transaction::{Transaction, TransactionKind},
};

/// The search text and optional date range used to filter transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Text matched case-insensitively against the category and the type.
    pub query: String,
    /// The earliest date to include.
    pub date_from: Option<Date>,
    /// The latest date to include.
    pub date_to: Option<Date>,
}

impl FilterCriteria {
    /// Criteria that match every transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include transactions whose category or type contains `query`.
    pub fn query(mut self, query: &str) -> Self {
        self.query = query.to_owned();
        self
    }

    /// Only include transactions on or after `date`.
    pub fn date_from(mut self, date: Date) -> Self {
        self.date_from = Some(date);
        self
    }

    /// Only include transactions on or before `date`.
    pub fn date_to(mut self, date: Date) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Build criteria from the raw search box and date inputs.
    ///
    /// Empty date inputs leave that bound unset.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a date input is not a valid date.
    pub fn from_inputs(query: &str, date_from: &str, date_to: &str) -> Result<Self, Error> {
        let mut errors = FieldErrors::new();
        let mut parse_bound = |text: &str, field: Field| {
            if text.trim().is_empty() {
                return None;
            }

            let date = parse_date(text);
            if date.is_none() {
                errors.push(field, "Enter a valid date.");
            }
            date
        };

        let date_from = parse_bound(date_from, Field::DateFrom);
        let date_to = parse_bound(date_to, Field::DateTo);

        errors.into_result(|| FilterCriteria {
            query: query.to_owned(),
            date_from,
            date_to,
        })
    }

    /// Whether no filtering will happen.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Whether `transaction` satisfies the criteria.
    ///
    /// A transaction without a valid date never satisfies a date bound, but
    /// is included when no bound is set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_text(transaction) && self.matches_dates(transaction.date)
    }

    fn matches_text(&self, transaction: &Transaction) -> bool {
        if self.query.is_empty() {
            return true;
        }

        let query = self.query.to_lowercase();

        transaction.category.to_lowercase().contains(&query)
            || transaction.kind.as_str().to_lowercase().contains(&query)
    }

    fn matches_dates(&self, date: Option<Date>) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }

        let Some(date) = date else {
            return false;
        };

        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// Select the transactions that satisfy `criteria`, preserving their order.
pub fn filter_transactions(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| criteria.matches(transaction))
        .cloned()
        .collect()
}

/// Income and expense totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Sum the income and expense amounts of `transactions`.
///
/// Transactions that are neither income nor expense are ignored.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => summary.income += amount_of(transaction),
            TransactionKind::Expense => summary.expense += amount_of(transaction),
            TransactionKind::Other(_) => {}
        }
    }

    summary.balance = summary.income - summary.expense;
    summary
}

fn amount_of(transaction: &Transaction) -> f64 {
    if transaction.amount.is_finite() {
        transaction.amount
    } else {
        0.0
    }
}

/// Total amount per category, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(Vec<(String, f64)>);

impl CategoryBreakdown {
    /// The total for `category`, if any transaction used it.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    /// Iterate over the categories and their totals.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// The number of distinct categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum over every category.
    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, total)| total).sum()
    }
}

/// Sum the amounts of `transactions` per category, regardless of type.
pub fn group_by_category(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut totals: Vec<(String, f64)> = Vec::new();

    for transaction in transactions {
        let amount = amount_of(transaction);

        match totals
            .iter_mut()
            .find(|(name, _)| *name == transaction.category)
        {
            Some((_, total)) => *total += amount,
            None => totals.push((transaction.category.clone(), amount)),
        }
    }

    CategoryBreakdown(totals)
}

/// The income and expense totals of one month bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    /// The sum of income amounts in the month.
    pub income: f64,
    /// The sum of expense amounts in the month.
    pub expense: f64,
}

/// Income and expense totals per calendar month, January to December.
///
/// Buckets are keyed by month only, so the same month of different years
/// share a bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyBreakdown(BTreeMap<u8, MonthTotals>);

impl MonthlyBreakdown {
    /// The totals for the month labelled `label`, e.g. "Jan".
    pub fn get(&self, label: &str) -> Option<MonthTotals> {
        self.0
            .iter()
            .find(|(month, _)| month_label(**month) == label)
            .map(|(_, totals)| *totals)
    }

    /// Iterate over the month labels and their totals, January first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, MonthTotals)> + '_ {
        self.0
            .iter()
            .map(|(month, totals)| (month_label(*month), *totals))
    }

    /// The number of months with at least one transaction.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no months.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn month_label(month: u8) -> &'static str {
    Month::try_from(month).map(month_abbrev).unwrap_or("")
}

/// Sum income and expense per month of `transactions`.
///
/// Transactions without a valid date are left out.
pub fn group_by_month(transactions: &[Transaction]) -> MonthlyBreakdown {
    let mut buckets = BTreeMap::new();

    for transaction in transactions {
        let Some(date) = transaction.date else {
            continue;
        };

        let totals: &mut MonthTotals = buckets.entry(u8::from(date.month())).or_default();

        match transaction.kind {
            TransactionKind::Income => totals.income += amount_of(transaction),
            TransactionKind::Expense => totals.expense += amount_of(transaction),
            TransactionKind::Other(_) => {}
        }
    }

    MonthlyBreakdown(buckets)
}

/// Everything the dashboard derives from the transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// The transactions that satisfy the criteria, in input order.
    pub filtered: Vec<Transaction>,
    /// Income, expense and balance of the filtered transactions.
    pub summary: Summary,
    /// Total amount per category of the filtered transactions.
    pub by_category: CategoryBreakdown,
    /// Income and expense per month of the filtered transactions.
    pub by_month: MonthlyBreakdown,
}

impl Aggregates {
    /// Filter `transactions` and aggregate the result.
    pub fn compute(transactions: &[Transaction], criteria: &FilterCriteria) -> Self {
        let filtered = filter_transactions(transactions, criteria);

        Self {
            summary: summarize(&filtered),
            by_category: group_by_category(&filtered),
            by_month: group_by_month(&filtered),
            filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, Field,
        aggregation::{
            Aggregates, FilterCriteria, MonthTotals, Summary, filter_transactions,
            group_by_category, group_by_month, summarize,
        },
        transaction::{Transaction, TransactionKind},
    };

    fn income(category: &str, amount: f64, date: time::Date) -> Transaction {
        Transaction::build(TransactionKind::Income, category, amount)
            .date(date)
            .finalise()
    }

    fn expense(category: &str, amount: f64, date: time::Date) -> Transaction {
        Transaction::build(TransactionKind::Expense, category, amount)
            .date(date)
            .finalise()
    }

    fn example_transactions() -> Vec<Transaction> {
        vec![
            income("Salary", 1000.0, date!(2024 - 01 - 05)),
            expense("Food", 200.0, date!(2024 - 01 - 10)),
        ]
    }

    fn mixed_transactions() -> Vec<Transaction> {
        vec![
            income("Salary", 1000.0, date!(2024 - 01 - 05)),
            expense("Food", 200.0, date!(2024 - 01 - 10)),
            expense("Fuel", 60.0, date!(2024 - 02 - 01)),
            expense("Food", 35.5, date!(2024 - 02 - 14)),
            income("Freelance", 300.0, date!(2024 - 03 - 20)),
            Transaction::build(TransactionKind::Other("refund".to_owned()), "Food", 15.0)
                .date(date!(2024 - 03 - 21))
                .finalise(),
            Transaction::build(TransactionKind::Expense, "Misc", 5.0).finalise(),
        ]
    }

    #[test]
    fn example_in_january() {
        let transactions = example_transactions();
        let criteria = FilterCriteria::new()
            .date_from(date!(2024 - 01 - 01))
            .date_to(date!(2024 - 01 - 31));

        let aggregates = Aggregates::compute(&transactions, &criteria);

        assert_eq!(aggregates.filtered, transactions);
        assert_eq!(
            aggregates.summary,
            Summary {
                income: 1000.0,
                expense: 200.0,
                balance: 800.0
            }
        );
        assert_eq!(aggregates.by_category.get("Salary"), Some(1000.0));
        assert_eq!(aggregates.by_category.get("Food"), Some(200.0));
        assert_eq!(aggregates.by_category.len(), 2);
        assert_eq!(
            aggregates.by_month.get("Jan"),
            Some(MonthTotals {
                income: 1000.0,
                expense: 200.0
            })
        );
        assert_eq!(aggregates.by_month.len(), 1);
    }

    #[test]
    fn filter_is_ordered_subsequence_of_matches() {
        let transactions = mixed_transactions();
        let criteria = FilterCriteria::new()
            .query("FO")
            .date_from(date!(2024 - 01 - 06));

        let filtered = filter_transactions(&transactions, &criteria);

        let categories: Vec<&str> = filtered.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, ["Food", "Food", "Food"]);
        assert!(filtered.iter().all(|t| criteria.matches(t)));

        let mut remaining = transactions.iter();
        for transaction in &filtered {
            assert!(remaining.any(|t| t == transaction), "order not preserved");
        }
    }

    #[test]
    fn query_matches_type() {
        let transactions = mixed_transactions();

        let filtered = filter_transactions(&transactions, &FilterCriteria::new().query("Income"));

        let categories: Vec<&str> = filtered.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, ["Salary", "Freelance"]);
    }

    #[test]
    fn empty_criteria_keep_everything() {
        let transactions = mixed_transactions();

        let filtered = filter_transactions(&transactions, &FilterCriteria::new());

        assert_eq!(filtered, transactions);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let transactions = mixed_transactions();
        let criteria = FilterCriteria::new()
            .date_from(date!(2024 - 01 - 10))
            .date_to(date!(2024 - 02 - 01));

        let filtered = filter_transactions(&transactions, &criteria);

        let amounts: Vec<f64> = filtered.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [200.0, 60.0]);
    }

    #[test]
    fn invalid_dates_are_excluded_only_when_bounded() {
        let transactions = mixed_transactions();

        let unbounded = filter_transactions(&transactions, &FilterCriteria::new().query("misc"));
        let bounded = filter_transactions(
            &transactions,
            &FilterCriteria::new()
                .query("misc")
                .date_to(date!(2030 - 01 - 01)),
        );

        assert_eq!(unbounded.len(), 1);
        assert!(bounded.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let transactions = mixed_transactions();
        let criteria = FilterCriteria::new().query("f");

        let first = filter_transactions(&transactions, &criteria);
        let second = filter_transactions(&transactions, &criteria);

        assert_eq!(first, second);
        assert_eq!(filter_transactions(&first, &criteria), first);
    }

    #[test]
    fn summarize_empty_is_zero() {
        assert_eq!(summarize(&[]), Summary::default());
        assert_eq!(
            summarize(&[]),
            Summary {
                income: 0.0,
                expense: 0.0,
                balance: 0.0
            }
        );
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let transactions = mixed_transactions();

        for criteria in [
            FilterCriteria::new(),
            FilterCriteria::new().query("food"),
            FilterCriteria::new().date_from(date!(2024 - 02 - 01)),
        ] {
            let summary = summarize(&filter_transactions(&transactions, &criteria));

            assert_eq!(summary.balance, summary.income - summary.expense);
        }
    }

    #[test]
    fn unknown_types_and_bad_amounts_contribute_nothing() {
        let transactions = vec![
            income("Salary", 100.0, date!(2024 - 01 - 01)),
            Transaction::build(TransactionKind::Other(String::new()), "Gift", 50.0).finalise(),
            Transaction::build(TransactionKind::Expense, "Food", f64::NAN).finalise(),
        ];

        let summary = summarize(&transactions);

        assert_eq!(
            summary,
            Summary {
                income: 100.0,
                expense: 0.0,
                balance: 100.0
            }
        );
    }

    #[test]
    fn category_totals_match_summary_totals() {
        let transactions: Vec<Transaction> = mixed_transactions()
            .into_iter()
            .filter(|t| t.kind != TransactionKind::Other("refund".to_owned()))
            .collect();

        let summary = summarize(&transactions);
        let by_category = group_by_category(&transactions);

        assert!((by_category.total() - (summary.income + summary.expense)).abs() < 1e-9);
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let by_category = group_by_category(&mixed_transactions());

        let names: Vec<&str> = by_category.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Salary", "Food", "Fuel", "Freelance", "Misc"]);
        assert_eq!(by_category.get("Food"), Some(250.5));
    }

    #[test]
    fn months_merge_across_years() {
        let transactions = vec![
            expense("Food", 10.0, date!(2024 - 01 - 31)),
            expense("Food", 20.0, date!(2025 - 01 - 01)),
            income("Salary", 500.0, date!(2023 - 12 - 01)),
        ];

        let by_month = group_by_month(&transactions);

        let labels: Vec<&str> = by_month.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["Jan", "Dec"]);
        assert_eq!(
            by_month.get("Jan"),
            Some(MonthTotals {
                income: 0.0,
                expense: 30.0
            })
        );
    }

    #[test]
    fn months_skip_invalid_dates() {
        let by_month = group_by_month(&mixed_transactions());

        let labels: Vec<&str> = by_month.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["Jan", "Feb", "Mar"]);
        assert_eq!(by_month.get("Mar").map(|totals| totals.income), Some(300.0));
    }

    #[test]
    fn criteria_from_inputs() {
        let criteria = FilterCriteria::from_inputs("food", "2024-01-01", "").unwrap();

        assert_eq!(
            criteria,
            FilterCriteria::new()
                .query("food")
                .date_from(date!(2024 - 01 - 01))
        );

        let Err(Error::Validation(errors)) = FilterCriteria::from_inputs("", "soon", "later") else {
            panic!("want validation error");
        };
        assert_eq!(errors.get(Field::DateFrom), Some("Enter a valid date."));
        assert_eq!(errors.get(Field::DateTo), Some("Enter a valid date."));
    }
}
