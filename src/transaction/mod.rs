//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing a user's transactions
//! - View handlers and HTMX endpoints for the transaction pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;

pub use core::{
    MAX_TRANSACTION_AMOUNT, Transaction, TransactionBuilder, TransactionId, create_transaction,
    create_transaction_table, get_transactions_in_year,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{delete_all_transactions_endpoint, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::get_transactions_page;
