//! Transaction data aggregation for the dashboard.
//!
//! Turns a flat list of one user's transactions for one year into monthly
//! totals, yearly totals, averages and per-category totals. Every function
//! here is pure: the handlers load the transactions and render the results.
//!
//! Sums saturate at [Decimal::MAX] and [Decimal::MIN] instead of overflowing.

use rust_decimal::Decimal;
use time::Month;

use crate::{
    category::{Category, TransactionType},
    transaction::Transaction,
};

/// The twelve calendar months in order.
pub(super) const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// One value per calendar month, all starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MonthlyTotals([Decimal; 12]);

impl Default for MonthlyTotals {
    fn default() -> Self {
        Self([Decimal::ZERO; 12])
    }
}

impl MonthlyTotals {
    /// The total for `month`.
    pub(super) fn get(&self, month: Month) -> Decimal {
        self.0[month_index(month)]
    }

    fn add(&mut self, month: Month, amount: Decimal) {
        let index = month_index(month);
        self.0[index] = self.0[index].saturating_add(amount);
    }

    /// The months paired with their totals in calendar order.
    pub(super) fn iter(&self) -> impl Iterator<Item = (Month, Decimal)> + '_ {
        MONTHS.into_iter().zip(self.0.iter().copied())
    }

    /// The totals in calendar order.
    pub(super) fn values(&self) -> &[Decimal; 12] {
        &self.0
    }
}

fn month_index(month: Month) -> usize {
    usize::from(u8::from(month)) - 1
}

/// Sum the amounts of the transactions matching `predicate` by the month they happened in.
pub(super) fn monthly_totals<P>(transactions: &[Transaction], predicate: P) -> MonthlyTotals
where
    P: Fn(&Transaction) -> bool,
{
    let mut totals = MonthlyTotals::default();

    for transaction in transactions.iter().filter(|t| predicate(t)) {
        totals.add(transaction.month(), transaction.amount);
    }

    totals
}

/// Income minus expenses for each month, i.e. how much was saved.
pub(super) fn monthly_net_totals(transactions: &[Transaction]) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();

    for transaction in transactions {
        totals.add(transaction.month(), transaction.signed_amount());
    }

    totals
}

/// The sum of all twelve months.
pub(super) fn total(monthly: &MonthlyTotals) -> Decimal {
    saturating_sum(monthly.values().iter().copied())
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `total` divided by the number of months with a non-zero value, rounded to cents.
///
/// Months without any activity do not count towards the average. Returns zero
/// when every month is zero.
pub(super) fn average(total: Decimal, monthly: &MonthlyTotals) -> Decimal {
    let active_months = monthly
        .values()
        .iter()
        .filter(|value| !value.is_zero())
        .count();

    if active_months == 0 {
        return Decimal::ZERO;
    }

    (total / Decimal::from(active_months)).round_dp(2)
}

/// The sum of transaction amounts for a single category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// Sum the amounts of `transactions` for each of `categories`, in the order given.
///
/// Categories without any transactions have a total of zero.
pub(super) fn category_totals(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    categories
        .iter()
        .map(|category| CategoryTotal {
            category: category.clone(),
            total: saturating_sum(
                transactions
                    .iter()
                    .filter(|transaction| &transaction.category == category)
                    .map(|transaction| transaction.amount),
            ),
        })
        .collect()
}

/// Monthly totals with their yearly total and average.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SeriesSummary {
    pub monthly: MonthlyTotals,
    pub total: Decimal,
    pub average: Decimal,
}

impl SeriesSummary {
    fn new(monthly: MonthlyTotals) -> Self {
        let total = total(&monthly);

        Self {
            monthly,
            total,
            average: average(total, &monthly),
        }
    }
}

/// Everything the dashboard shows for one year.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    pub income: SeriesSummary,
    pub expenses: SeriesSummary,
    pub savings: SeriesSummary,
    /// Totals for every fixed category, income categories first.
    pub categories: Vec<CategoryTotal>,
}

/// Build the dashboard summary for a year of one user's transactions.
pub(super) fn summarise(transactions: &[Transaction]) -> DashboardSummary {
    let income = monthly_totals(transactions, |transaction| {
        transaction.transaction_type() == TransactionType::Income
    });
    let expenses = monthly_totals(transactions, |transaction| {
        transaction.transaction_type() == TransactionType::Expense
    });

    DashboardSummary {
        income: SeriesSummary::new(income),
        expenses: SeriesSummary::new(expenses),
        savings: SeriesSummary::new(monthly_net_totals(transactions)),
        categories: category_totals(transactions, &Category::ALL),
    }
}

/// Three letter month names used for chart labels and table headers, e.g. "Jan".
pub(super) fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
