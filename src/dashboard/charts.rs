//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for a year of data:
//! - **Income & Expense Comparison**: monthly expenses as bars with monthly income as a line
//! - **Category Breakdown**: horizontal bars of the yearly total for each category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Label,
        LabelPosition, Tooltip, Trigger,
    },
    series::{Line, bar},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    category::TransactionType,
    dashboard::aggregation::{CategoryTotal, DashboardSummary, MONTHS, month_abbreviation},
    html::HeadElement,
};

const INCOME_COLOR: &str = "#16a34a";
const EXPENSE_COLOR: &str = "#dc2626";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Build both dashboard charts from a year summary.
pub(super) fn build_dashboard_charts(summary: &DashboardSummary) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "income-expense-chart",
            options: income_expense_chart(summary).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&summary.categories).to_string(),
        },
    ]
}

fn to_chart_value(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or_default()
}

pub(super) fn income_expense_chart(summary: &DashboardSummary) -> Chart {
    let labels = MONTHS
        .iter()
        .map(|month| month_abbreviation(*month).to_owned())
        .collect::<Vec<_>>();
    let expenses = summary
        .expenses
        .monthly
        .values()
        .iter()
        .copied()
        .map(to_chart_value)
        .collect::<Vec<_>>();
    let income = summary
        .income
        .monthly
        .values()
        .iter()
        .copied()
        .map(to_chart_value)
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Income & Expense Comparison")
                .subtext("Monthly totals"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(300).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .label(value_label(LabelPosition::Top))
                .data(expenses),
        )
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .label(value_label(LabelPosition::Top))
                .data(income),
        )
}

pub(super) fn category_chart(category_totals: &[CategoryTotal]) -> Chart {
    let labels = category_totals
        .iter()
        .map(|category_total| category_total.category.to_string())
        .collect::<Vec<_>>();
    let data = category_totals
        .iter()
        .map(|category_total| {
            let color = match category_total.category.transaction_type() {
                TransactionType::Income => INCOME_COLOR,
                TransactionType::Expense => EXPENSE_COLOR,
            };

            DataPointItem::new(to_chart_value(category_total.total))
                .item_style(ItemStyle::new().color(color))
        })
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Category Breakdown")
                .subtext("Yearly total per category"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("8%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .y_axis(
            Axis::new().type_(AxisType::Category).data(labels),
        )
        .series(
            bar::Bar::new()
                .name("Total")
                .label(value_label(LabelPosition::Right))
                .data(data),
        )
}

/// Shows each point's value in whole euros next to the point.
fn value_label(position: LabelPosition) -> Label {
    Label::new().show(true).position(position).formatter(JsFunction::new_with_args(
        "params",
        "return (params.value) ? '€' + Math.round(params.value).toLocaleString('en-US') : '';",
    ))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IE', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
