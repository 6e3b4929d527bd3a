//! Defines the page for editing an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, euro_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
};

use super::{
    core::{Transaction, TransactionId, get_transaction},
    form::{TransactionFormDefaults, transaction_form_fields},
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// Responds with the 404 page if the transaction does not exist or belongs to another user.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection).inspect_err(|error| {
        tracing::debug!("could not get transaction {transaction_id} for user {user_id}: {error}")
    })?;

    Ok(edit_transaction_view(&transaction).into_response())
}

fn edit_transaction_view(transaction: &Transaction) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::TRANSACTION, transaction.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit Transaction" }

                form
                    hx-put=(update_endpoint)
                    hx-target-error="#alert-container"
                    hx-indicator="#indicator"
                    hx-disabled-elt="#submit-button"
                    class="space-y-4"
                {
                    (transaction_form_fields(&TransactionFormDefaults {
                        amount: Some(transaction.amount),
                        date: transaction.date,
                        category: Some(&transaction.category),
                        description: Some(&transaction.description),
                        autofocus_amount: true,
                    }))

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="inline htmx-indicator" id="indicator"
                        {
                            (loading_spinner())
                        }
                        "Save Changes"
                    }
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back to transactions" }
            }
        }
    };

    base("Edit Transaction", &[euro_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rust_decimal_macros::dec;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, create_test_user, get_test_connection,
            must_get_form, parse_html_document,
        },
        transaction::{Transaction, create_transaction},
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    #[tokio::test]
    async fn renders_prefilled_form() {
        let connection = get_test_connection();
        let user_id = create_test_user("alice", &connection);
        let transaction = create_transaction(
            Transaction::build(dec!(42.5), date!(2024 - 07 - 04), Category::Utilities)
                .description("Power bill"),
            user_id,
            &connection,
        )
        .unwrap();
        let state = EditTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            get_edit_transaction_page(State(state), Extension(user_id), Path(transaction.id))
                .await
                .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, transaction.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "amount", "number", "42.50");
        assert_form_input_with_value(&form, "date", "date", "2024-07-04");
        assert_form_submit_button(&form);

        let selected = Selector::parse("select[name=category] option[selected]").unwrap();
        assert_eq!(
            form.select(&selected).next().unwrap().value().attr("value"),
            Some("Utilities")
        );
        let description = Selector::parse("input[name=description]").unwrap();
        assert_eq!(
            form.select(&description).next().unwrap().value().attr("value"),
            Some("Power bill")
        );
    }

    #[tokio::test]
    async fn other_users_get_not_found() {
        let connection = get_test_connection();
        let alice = create_test_user("alice", &connection);
        let bob = create_test_user("bob", &connection);
        let transaction = create_transaction(
            Transaction::build(dec!(1), date!(2024 - 07 - 04), Category::Food),
            alice,
            &connection,
        )
        .unwrap();
        let state = EditTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result =
            get_edit_transaction_page(State(state), Extension(bob), Path(transaction.id)).await;

        let error = result.err().unwrap();
        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
