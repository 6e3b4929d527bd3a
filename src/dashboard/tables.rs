//! Table views for dashboard data display.
//!
//! Provides HTML tables for the monthly summary and the category breakdown.

use maud::{Markup, html};
use rust_decimal::Decimal;
use time::Month;

use crate::{
    category::TransactionType,
    dashboard::aggregation::{CategoryTotal, DashboardSummary, SeriesSummary, month_abbreviation},
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency},
};

// Table cell styles for monthly summary
const TABLE_HEADER_CELL_STYLE: &str = "px-3 py-3 text-center min-w-[100px]";
const TABLE_HEADER_FIRST_CELL_STYLE: &str =
    "px-3 py-3 sticky left-0 bg-gray-100 dark:bg-gray-700 z-10 font-semibold";
const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white sticky left-0 bg-white dark:bg-gray-800 z-10";
const TABLE_DATA_CELL_STYLE: &str = "text-center whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";
const CURRENT_MONTH_STYLE: &str = "bg-blue-50 dark:bg-blue-900 font-semibold";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount >= Decimal::ZERO {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

fn month_class(month: Month, current_month: Option<Month>) -> &'static str {
    if current_month == Some(month) {
        CURRENT_MONTH_STYLE
    } else {
        ""
    }
}

fn summary_row(
    label: &str,
    series: &SeriesSummary,
    color_class: impl Fn(Decimal) -> &'static str,
    current_month: Option<Month>,
) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) {
            th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                (label)
            }

            @for (month, value) in series.monthly.iter() {
                td
                    class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (color_class(value)) " " (month_class(month, current_month))}
                    data-month=(month_abbreviation(month))
                {
                    (format_currency(value))
                }
            }

            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (color_class(series.total)) " font-bold"} {
                (format_currency(series.total))
            }
            td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (color_class(series.average))} {
                (format_currency(series.average))
            }
        }
    }
}

/// Renders the income, expenses and savings for each month with yearly totals and averages.
///
/// The column for `current_month` is highlighted when given.
pub(super) fn monthly_summary_table(
    summary: &DashboardSummary,
    current_month: Option<Month>,
) -> Markup {
    html! {
        div id="monthly-summary" class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Monthly Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                        tr {
                            th scope="col" class={(TABLE_HEADER_FIRST_CELL_STYLE) " text-left"} {
                                ""
                            }
                            @for (month, _) in summary.income.monthly.iter() {
                                th
                                    scope="col"
                                    class={(TABLE_HEADER_CELL_STYLE) " " (month_class(month, current_month))}
                                    aria-current=[(current_month == Some(month)).then_some("date")]
                                {
                                    (month_abbreviation(month))
                                }
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-bold"} {
                                "Total"
                            }
                            th scope="col" class={(TABLE_HEADER_CELL_STYLE) " font-semibold"} {
                                "Monthly Avg"
                            }
                        }
                    }
                    tbody {
                        (summary_row("Income", &summary.income, |_| TABLE_CELL_GREEN_STYLE, current_month))
                        (summary_row("Expenses", &summary.expenses, |_| TABLE_CELL_RED_STYLE, current_month))
                        (summary_row("Savings", &summary.savings, amount_color_class, current_month))
                    }
                }
            }
        }
    }
}

/// Renders the yearly total for each category, income categories first.
pub(super) fn category_breakdown_table(category_totals: &[CategoryTotal]) -> Markup {
    html! {
        div id="category-breakdown" class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Category Breakdown" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400" {
                        tr {
                            th scope="col" class=(TABLE_HEADER_FIRST_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Total" }
                        }
                    }
                    tbody {
                        @for category_total in category_totals {
                            @let transaction_type = category_total.category.transaction_type();
                            @let color_class = match transaction_type {
                                TransactionType::Income => TABLE_CELL_GREEN_STYLE,
                                TransactionType::Expense => TABLE_CELL_RED_STYLE,
                            };

                            tr class=(TABLE_ROW_STYLE) data-category=(category_total.category) {
                                th scope="row" class={(TABLE_STICKY_CELL_STYLE) " text-left"} {
                                    (category_total.category)
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                    (transaction_type)
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (color_class)} {
                                    (format_currency(category_total.total))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::{Date, Month};

    use crate::{
        UserID,
        category::Category,
        dashboard::aggregation::summarise,
        transaction::Transaction,
    };

    use super::{category_breakdown_table, monthly_summary_table};

    fn transaction(month: Month, amount: rust_decimal::Decimal, category: Category) -> Transaction {
        Transaction {
            id: 1,
            user_id: UserID::new(1),
            date: Date::from_calendar_date(2024, month, 10).unwrap(),
            amount,
            category,
            description: String::new(),
        }
    }

    fn cell_texts(document: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn monthly_table_shows_every_month_with_totals() {
        let summary = summarise(&[
            transaction(Month::January, dec!(100), Category::Salary),
            transaction(Month::January, dec!(50), Category::Food),
        ]);

        let document =
            Html::parse_fragment(&monthly_summary_table(&summary, None).into_string());

        let headers = cell_texts(&document, "thead th");
        assert_eq!(headers.len(), 1 + 12 + 2);
        assert_eq!(headers[1], "Jan");
        assert_eq!(headers[12], "Dec");

        let rows = Selector::parse("tbody tr").unwrap();
        let row_cells = document
            .select(&rows)
            .map(|row| {
                row.text()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(ToOwned::to_owned)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_eq!(row_cells[0][0], "Income");
        assert_eq!(row_cells[0][1], "€100.00");
        assert_eq!(row_cells[1][0], "Expenses");
        assert_eq!(row_cells[1][1], "€50.00");
        assert_eq!(row_cells[2][0], "Savings");
        assert_eq!(row_cells[2][1], "€50.00");
        // Total and average of the savings row.
        assert_eq!(row_cells[2][13], "€50.00");
        assert_eq!(row_cells[2][14], "€50.00");
    }

    #[test]
    fn highlights_current_month() {
        let summary = summarise(&[]);

        let document = Html::parse_fragment(
            &monthly_summary_table(&summary, Some(Month::March)).into_string(),
        );

        assert_eq!(cell_texts(&document, "th[aria-current]"), vec!["Mar"]);
    }

    #[test]
    fn no_highlight_for_other_years() {
        let summary = summarise(&[]);

        let document = Html::parse_fragment(&monthly_summary_table(&summary, None).into_string());

        assert!(cell_texts(&document, "th[aria-current]").is_empty());
    }

    #[test]
    fn category_table_lists_every_category() {
        let summary = summarise(&[transaction(Month::May, dec!(42), Category::Medical)]);

        let document =
            Html::parse_fragment(&category_breakdown_table(&summary.categories).into_string());

        let categories = cell_texts(&document, "tbody th");
        let want = Category::ALL.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(categories, want);
        assert_eq!(
            cell_texts(&document, "tr[data-category=\"Medical\"] td"),
            vec!["Expense", "€42.00"]
        );
        assert_eq!(
            cell_texts(&document, "tr[data-category=\"Salary\"] td"),
            vec!["Income", "€0.00"]
        );
    }
}
