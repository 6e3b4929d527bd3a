//! The registration page and the handler that creates new users.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{password::PASSWORD_MIN_LENGTH, user::create_user},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TextInput, base,
        loading_spinner, log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

/// The error messages to show next to each field of the registration form.
#[derive(Default)]
struct RegistrationErrors<'a> {
    username: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(
    username: &str,
    email: &str,
    password: &str,
    errors: RegistrationErrors,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (TextInput {
                label: "Username",
                name: "username",
                type_: "text",
                placeholder: "Your name",
                value: username,
                error_message: errors.username,
            }.into_html())

            (TextInput {
                label: "Email",
                name: "email",
                type_: "email",
                placeholder: "name@example.com",
                value: email,
                error_message: errors.email,
            }.into_html())

            (password_input(password, PASSWORD_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_MIN_LENGTH, errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", "", RegistrationErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data entered by the user in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a user from the registration form and send the client to the log-in page.
///
/// Invalid input and taken usernames or emails are reported next to the
/// offending field and the form is returned with the entered values.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let username = user_data.username.trim();
    let email = user_data.email.trim();
    let rerender = |errors: RegistrationErrors| {
        registration_form(username, email, &user_data.password, errors).into_response()
    };

    if username.is_empty() {
        return rerender(RegistrationErrors {
            username: Some("Please enter a username."),
            ..Default::default()
        });
    }

    let email_address = match EmailAddress::from_str(email) {
        Ok(email_address) => email_address,
        Err(_) => {
            return rerender(RegistrationErrors {
                email: Some("Please enter a valid email address."),
                ..Default::default()
            });
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            let errors = RegistrationErrors {
                password: Some(&message),
                ..Default::default()
            };
            return registration_form(username, email, &user_data.password, errors)
                .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return rerender(RegistrationErrors {
            confirm_password: Some("Passwords do not match"),
            ..Default::default()
        });
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");

            return get_internal_server_error_redirect();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_user(username, email_address, password_hash, &connection),
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    match result {
        Ok(user) => {
            tracing::info!("Registered user {} with ID {}", user.username, user.id);

            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateEmail) => rerender(RegistrationErrors {
            email: Some("That email is already registered, try logging in instead."),
            ..Default::default()
        }),
        Err(Error::DuplicateUsername) => rerender(RegistrationErrors {
            username: Some("That username is taken, please choose another."),
            ..Default::default()
        }),
        Err(Error::EmptyUsername) => rerender(RegistrationErrors {
            username: Some("Please enter a username."),
            ..Default::default()
        }),
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");

            get_internal_server_error_redirect()
        }
    }
}


#[cfg(test)]
mod register_user_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{Form, extract::State, http::StatusCode, response::Response};
    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        PasswordHash,
        auth::{create_user, create_user_table},
        endpoints,
        test_utils::{assert_hx_redirect, parse_html_fragment},
    };

    use super::{RegisterForm, RegistrationState, register_user};

    const STRONG_PASSWORD: &str = "iamtestingwhethericanregisternewuser";

    fn get_test_state() -> RegistrationState {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();

        RegistrationState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(username: &str, email: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    async fn response_text(response: Response) -> String {
        parse_html_fragment(response)
            .await
            .root_element()
            .text()
            .collect()
    }

    fn insert_existing_user(state: &RegistrationState) {
        create_user(
            "alice",
            EmailAddress::from_str("alice@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn register_user_succeeds() {
        let state = get_test_state();

        let response = register_user(
            State(state.clone()),
            Form(form("bob", "bob@example.com", STRONG_PASSWORD, STRONG_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::LOG_IN_VIEW);

        let count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn register_user_rejects_empty_username() {
        let response = register_user(
            State(get_test_state()),
            Form(form("  ", "bob@example.com", STRONG_PASSWORD, STRONG_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("Please enter a username."));
    }

    #[tokio::test]
    async fn register_user_rejects_invalid_email() {
        let response = register_user(
            State(get_test_state()),
            Form(form("bob", "not-an-email", STRONG_PASSWORD, STRONG_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response_text(response)
                .await
                .contains("Please enter a valid email address.")
        );
    }

    #[tokio::test]
    async fn register_user_rejects_weak_password() {
        let response = register_user(
            State(get_test_state()),
            Form(form("bob", "bob@example.com", "short", "short")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("at least 8 characters"));
    }

    #[tokio::test]
    async fn register_user_rejects_mismatched_passwords() {
        let response = register_user(
            State(get_test_state()),
            Form(form(
                "bob",
                "bob@example.com",
                STRONG_PASSWORD,
                "adifferentbutalsolongpassword",
            )),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("Passwords do not match"));
    }

    #[tokio::test]
    async fn register_user_rejects_duplicate_email() {
        let state = get_test_state();
        insert_existing_user(&state);

        let response = register_user(
            State(state),
            Form(form("bob", "alice@example.com", STRONG_PASSWORD, STRONG_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response_text(response)
                .await
                .contains("That email is already registered")
        );
    }

    #[tokio::test]
    async fn register_user_rejects_duplicate_username() {
        let state = get_test_state();
        insert_existing_user(&state);

        let response = register_user(
            State(state),
            Form(form("alice", "bob@example.com", STRONG_PASSWORD, STRONG_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("That username is taken"));
    }
}
