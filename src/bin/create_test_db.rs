use std::{
    error::Error,
    path::{Path, PathBuf},
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use expense_manager::{
    SqliteAuthProvider, SqliteProvider,
    auth::{self, SignUpForm},
    category::{CategoryForm, CategoryStore},
    date::format_date,
    initialize_db,
    transaction::{TransactionForm, TransactionOrder, TransactionStore},
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "Demo@1234";
const DEMO_USERNAME: &str = "demo";

const CATEGORIES: [(&str, &str); 6] = [
    ("Salary", "income"),
    ("Freelance", "income"),
    ("Rent", "expense"),
    ("Food", "expense"),
    ("Transport", "expense"),
    ("Entertainment", "expense"),
];

/// A utility for creating a demo database for the expense manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: PathBuf,

    /// The year to create transactions for.
    #[arg(long, default_value_t = 2024)]
    year: i32,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let output_path = args.output_path.as_path();

    validate_output_path(output_path);

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;
    initialize_db(&connection)?;
    let connection = Arc::new(Mutex::new(connection));

    let auth = SqliteAuthProvider::new(connection.clone());
    let provider = SqliteProvider::new(connection).scoped_to(auth.sessions());

    println!("Creating demo user...");
    let session = auth::sign_up(
        &auth,
        &SignUpForm {
            username: DEMO_USERNAME.to_owned(),
            email: DEMO_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        },
    )
    .await?;

    println!("Creating categories...");
    let categories = CategoryStore::new(&provider, &session);
    let mut category_feed = categories.subscribe().await?;
    for (name, kind) in CATEGORIES {
        let form = CategoryForm {
            name: name.to_owned(),
            kind: kind.to_owned(),
        };
        categories.add(&form, &category_feed.current()).await?;
        category_feed.changed().await?;
    }
    category_feed.unsubscribe();

    println!("Creating transactions...");
    let transactions = TransactionStore::new(&provider, &session);
    let feed = transactions.subscribe(TransactionOrder::Stored).await?;
    let mut count = 0;
    for month in 1..=12u8 {
        for form in month_of_transactions(args.year, Month::try_from(month)?)? {
            transactions.add(&form).await?;
            count += 1;
        }
    }
    println!("Created {count} transactions ({} in feed).", feed.current().len());
    feed.unsubscribe();

    auth::sign_out(&auth).await?;

    println!("Success! Sign in with {DEMO_EMAIL} / {DEMO_PASSWORD}");

    Ok(())
}

fn validate_output_path(output_path: &Path) {
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
}

/// A fixed set of transactions for `month`, with amounts that drift month to month.
fn month_of_transactions(year: i32, month: Month) -> Result<Vec<TransactionForm>, Box<dyn Error>> {
    let step = f64::from(u8::from(month));
    let on = |day: u8| -> Result<String, time::error::ComponentRange> {
        Ok(format_date(Date::from_calendar_date(year, month, day)?))
    };

    let form = |kind: &str, category: &str, amount: f64, date: String, note: &str| TransactionForm {
        kind: kind.to_owned(),
        category: category.to_owned(),
        amount: format!("{amount:.2}"),
        date,
        note: note.to_owned(),
    };

    let mut forms = vec![
        form("income", "Salary", 50_000.0, on(1)?, "Monthly salary"),
        form("expense", "Rent", 15_000.0, on(3)?, ""),
        form("expense", "Food", 3_000.0 + step * 125.0, on(8)?, "Groceries"),
        form("expense", "Transport", 900.0 + step * 35.5, on(12)?, ""),
        form("expense", "Food", 450.0 + step * 20.0, on(19)?, "Eating out"),
    ];

    if u8::from(month) % 3 == 0 {
        forms.push(form("income", "Freelance", 8_000.0 + step * 250.0, on(15)?, "Side project"));
    }

    if u8::from(month) % 2 == 0 {
        forms.push(form("expense", "Entertainment", 1_200.0, on(24)?, "Concert tickets"));
    }

    Ok(forms)
}
