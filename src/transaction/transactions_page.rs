//! Defines the route handler for the page that lists a user's transactions and
//! the form for adding new ones.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    category::TransactionType,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        euro_input_styles, format_currency, loading_spinner,
    },
    navigation::NavBar,
    timezone::current_local_date,
};

use super::{
    core::{Transaction, get_transactions_for_user},
    form::{TransactionFormDefaults, transaction_form_fields},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the user's transactions, oldest first, along with a form for adding a transaction.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let transactions = get_transactions_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&user.username, today, &transactions).into_response())
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn new_transaction_form(today: Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="grid gap-4 sm:grid-cols-2 lg:grid-cols-5 items-end"
        {
            (transaction_form_fields(&TransactionFormDefaults {
                amount: None,
                date: today,
                category: None,
                description: None,
                autofocus_amount: false,
            }))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Add Transaction"
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let transaction_type = transaction.transaction_type();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction_type) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={ "px-6 py-4 text-right " (amount_class(transaction_type)) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn transactions_view(username: &str, today: Date, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Transactions" }
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "Hi " (username) ", it is currently "
                            span id="current-month" { (today.month()) " " (today.year()) }
                            "."
                        }
                    }

                    @if !transactions.is_empty() {
                        button
                            id="delete-all"
                            hx-delete=(endpoints::TRANSACTIONS_API)
                            hx-confirm="Are you sure you want to delete all of your transactions? This cannot be undone."
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete All"
                        }
                    }
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 p-4"
                {
                    h2 class="text-lg font-semibold mb-2" { "Add a transaction" }
                    (new_transaction_form(today))
                }

                div class="overflow-x-auto rounded"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row_view(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions yet, add one with the form above."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[euro_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, create_test_user, get_test_connection, must_get_form,
            parse_html_document,
        },
        transaction::{Transaction, create_transaction},
    };

    use super::{TransactionsViewState, get_transactions_page};

    fn get_test_state() -> (TransactionsViewState, crate::UserID, crate::UserID) {
        let connection = get_test_connection();
        let alice = create_test_user("alice", &connection);
        let bob = create_test_user("bob", &connection);

        let state = TransactionsViewState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, alice, bob)
    }

    fn transaction_rows(document: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        document
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn lists_own_transactions_ordered_by_date() {
        let (state, alice, bob) = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(dec!(50), date!(2024 - 02 - 10), Category::Food)
                    .description("Groceries"),
                alice,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(dec!(250), date!(2024 - 01 - 31), Category::Salary)
                    .description("January pay"),
                alice,
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(dec!(999), date!(2024 - 01 - 01), Category::Leisure)
                    .description("Not Alice's"),
                bob,
                &connection,
            )
            .unwrap();
        }

        let response = get_transactions_page(State(state), Extension(alice))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let rows = transaction_rows(&document);
        assert_eq!(rows.len(), 2, "want 2 rows, got {rows:?}");
        assert_eq!(rows[0][0], "2024-01-31");
        assert_eq!(rows[0][1], "Salary");
        assert_eq!(rows[0][2], "Income");
        assert_eq!(rows[0][4], "€250.00");
        assert_eq!(rows[1][0], "2024-02-10");
        assert_eq!(rows[1][2], "Expense");
        assert_eq!(rows[1][3], "Groceries");
    }

    #[tokio::test]
    async fn rows_link_to_edit_and_delete() {
        let (state, alice, _) = get_test_state();
        let transaction = create_transaction(
            Transaction::build(dec!(5), date!(2024 - 02 - 10), Category::Food),
            alice,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_transactions_page(State(state), Extension(alice))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let edit_link = Selector::parse("tr[data-transaction-row] a").unwrap();
        let delete_button = Selector::parse("tr[data-transaction-row] button").unwrap();
        assert_eq!(
            document.select(&edit_link).next().unwrap().value().attr("href"),
            Some(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id).as_str())
        );
        assert_eq!(
            document.select(&delete_button).next().unwrap().value().attr("hx-delete"),
            Some(format_endpoint(endpoints::TRANSACTION, transaction.id).as_str())
        );

        let delete_all = Selector::parse("#delete-all").unwrap();
        assert_eq!(
            document.select(&delete_all).next().unwrap().value().attr("hx-delete"),
            Some(endpoints::TRANSACTIONS_API)
        );
    }

    #[tokio::test]
    async fn shows_empty_state_and_current_month() {
        let (state, alice, _) = get_test_state();

        let response = get_transactions_page(State(state), Extension(alice))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let empty_state = Selector::parse("td[data-empty-state]").unwrap();
        assert!(document.select(&empty_state).next().is_some());
        let delete_all = Selector::parse("#delete-all").unwrap();
        assert!(document.select(&delete_all).next().is_none());

        let today = OffsetDateTime::now_utc().date();
        let current_month = Selector::parse("#current-month").unwrap();
        let month_text = document
            .select(&current_month)
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(month_text.starts_with(&today.month().to_string()));
    }

    #[tokio::test]
    async fn renders_add_transaction_form() {
        let (state, alice, _) = get_test_state();

        let response = get_transactions_page(State(state), Extension(alice))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "amount", "number");
        let category = Selector::parse("select[name=category]").unwrap();
        assert!(form.select(&category).next().is_some());
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn fails_on_invalid_timezone() {
        let (mut state, alice, _) = get_test_state();
        state.local_timezone = "Middle/Earth".to_owned();

        let result = get_transactions_page(State(state), Extension(alice)).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }
}
