//! Defines the core data models and database queries for transactions.
//!
//! Every query is scoped to a user: a transaction is only ever visible to,
//! editable by, or deletable by the user who created it.

use std::str::FromStr;

use rusqlite::{Connection, Row, params, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    auth::UserID,
    category::{Category, TransactionType},
};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The largest amount a single transaction may have, one billion euros.
pub const MAX_TRANSACTION_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who recorded the transaction.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// How much money was spent or earned, always positive.
    pub amount: Decimal,
    /// What the money was spent on or where it came from.
    pub category: Category,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Decimal, date: Date, category: Category) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            category,
            description: String::new(),
        }
    }

    /// The calendar month the transaction happened in.
    pub fn month(&self) -> Month {
        self.date.month()
    }

    /// Whether the transaction is income or an expense, decided by its category.
    pub fn transaction_type(&self) -> TransactionType {
        self.category.transaction_type()
    }

    /// The amount with expenses negated, so that summing gives the net change.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type() {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// The user editable fields of a [Transaction].
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::macros::date;
///
/// let builder = Transaction::build(dec!(45.99), date!(2024-01-15), Category::Food)
///     .description("Weekly groceries");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money, must be greater than zero.
    pub amount: Decimal,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The category, which also decides whether this is income or an expense.
    pub category: Category,
    /// A human-readable description of the transaction, may be empty.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.amount > MAX_TRANSACTION_AMOUNT {
            return Err(Error::AmountTooLarge(self.amount));
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, user_id, date, amount, category, description";

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::AmountTooLarge] if the amount is over [MAX_TRANSACTION_AMOUNT],
/// - or [Error::SqlError] if there is some other SQL error, e.g. `user_id` does not exist.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, date, amount, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                user_id.as_i64(),
                builder.date,
                builder.amount.to_string(),
                builder.category.as_str(),
                builder.description,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` that belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row(params![id, user_id.as_i64()], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite the fields of the transaction with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::AmountTooLarge] if the amount is over [MAX_TRANSACTION_AMOUNT],
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET date = ?1, amount = ?2, category = ?3, description = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.date,
                builder.amount.to_string(),
                builder.category.as_str(),
                builder.description,
                id,
                user_id.as_i64(),
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction with `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Delete every transaction owned by `user_id`, returning how many were deleted.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_all_transactions(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE user_id = ?1",
            params![user_id.as_i64()],
        )
        .map_err(Error::from)
}

/// All of the transactions owned by `user_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY date ASC, id ASC"
        ))?
        .query_map(params![user_id.as_i64()], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// The transactions owned by `user_id` dated within the calendar `year`, oldest first.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidYear] if `year` cannot be represented as a date,
/// - or [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_year(
    user_id: UserID,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| Error::InvalidYear(year))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::InvalidYear(year))?;

    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC, id ASC"
        ))?
        .query_map(params![user_id.as_i64(), start, end], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Used by the dashboard, which reads one user's transactions for one year.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns in the order of [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_amount: String = row.get(3)?;
    let amount = Decimal::from_str(&raw_amount)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;
    let raw_category: String = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        amount,
        category: Category::from(raw_category),
        description: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
