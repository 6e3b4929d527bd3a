use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Month, OffsetDateTime};

use tally_rs::{
    Category, PasswordHash, Transaction, ValidatedPassword, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the Tally web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to create sample transactions for, defaults to the current year.
    #[arg(long, short)]
    year: Option<i32>,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        "demo",
        EmailAddress::from_str("demo@example.com")?,
        password_hash,
        &conn,
    )?;

    let year = args.year.unwrap_or(OffsetDateTime::now_utc().year());
    println!("Creating sample transactions for {year}...");

    let mut count = 0;
    for month_number in 1..=12u8 {
        let month = Month::try_from(month_number)?;

        for (day, cents, category, description) in sample_month(month_number) {
            let date = Date::from_calendar_date(year, month, day)?;
            let builder = Transaction::build(Decimal::new(cents, 2), date, category)
                .description(description);

            create_transaction(builder, user.id, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions for {}.", user.email);
    println!("Log in with the email \"demo@example.com\" and password \"test\".");
    println!("Success!");

    Ok(())
}

/// The transactions for one month, with amounts in cents.
///
/// Amounts vary a little from month to month so the charts have some shape.
fn sample_month(month_number: u8) -> Vec<(u8, i64, Category, &'static str)> {
    let wobble = i64::from(month_number) * 731 % 5000;

    let mut transactions = vec![
        (1, 950_00, Category::Housing, "Rent"),
        (3, 32_50 + wobble / 10, Category::Transportation, "Bus pass"),
        (5, 84_20 + wobble, Category::Food, "Groceries"),
        (12, 61_45 + wobble / 2, Category::Utilities, "Electricity"),
        (19, 45_90 + wobble / 3, Category::Food, "Groceries"),
        (25, 2_500_00, Category::Salary, "Monthly salary"),
        (27, 40_00 + wobble / 4, Category::Leisure, "Concert tickets"),
    ];

    if month_number % 3 == 0 {
        transactions.push((15, 120_00 + wobble, Category::Investments, "Dividends"));
    }

    if month_number % 2 == 0 {
        transactions.push((20, 300_00, Category::SideHustle, "Freelance work"));
    }

    if month_number == 4 || month_number == 10 {
        transactions.push((8, 65_00, Category::Medical, "Dentist"));
    }

    if month_number == 9 {
        transactions.push((2, 180_00, Category::Education, "Evening course"));
    }

    transactions
}
