//! HTTP handlers for the dashboard page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::summarise,
        charts::{DashboardChart, build_dashboard_charts, charts_script, charts_view},
        tables::{category_breakdown_table, monthly_summary_table},
    },
    endpoints,
    html::{HeadElement, LINK_STYLE, base, link},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::get_transactions_in_year,
};

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The calendar year to summarise, defaults to the current year.
    pub year: Option<i32>,
}

/// Display a summary of the current user's transactions for one calendar year.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let year = query.year.unwrap_or(today.year());

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_year(user_id, year, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions for {year}: {error}"))?
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, year).into_response());
    }

    let summary = summarise(&transactions);
    let charts = build_dashboard_charts(&summary);
    let current_month = (year == today.year()).then_some(today.month());
    let tables = [
        monthly_summary_table(&summary, current_month),
        category_breakdown_table(&summary.categories),
    ];

    Ok(dashboard_view(nav_bar, year, &charts, &tables).into_response())
}

fn year_url(year: i32) -> String {
    format!("{}?year={year}", endpoints::DASHBOARD_VIEW)
}

fn year_navigation(year: i32) -> Markup {
    html!(
        nav class="flex justify-between items-center w-full mb-4" aria-label="Year navigation"
        {
            a href=(year_url(year - 1)) class=(LINK_STYLE) rel="prev" { "← " (year - 1) }
            h2 class="text-2xl font-bold" { (year) }
            a href=(year_url(year + 1)) class=(LINK_STYLE) rel="next" { (year + 1) " →" }
        }
    )
}

/// Renders the dashboard page when the year has no transactions.
fn dashboard_no_data_view(nav_bar: Markup, year: i32) -> Markup {
    let transactions_link = link(endpoints::TRANSACTIONS_VIEW, "transactions page");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            (year_navigation(year))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some transactions for " (year) ".
                You can add transactions on the " (transactions_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with charts and tables.
fn dashboard_view(
    nav_bar: Markup,
    year: i32,
    charts: &[DashboardChart],
    tables: &[Markup],
) -> Markup {
    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (year_navigation(year))

            (charts_view(charts))

            div class="grid grid-cols-1 gap-8 w-full"
            {
                @for table in tables {
                    (table)
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
