use std::{
    env,
    error::Error,
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Mutex},
};

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use time::OffsetDateTime;

use expense_manager::{
    Alert, SqliteAuthProvider, SqliteProvider,
    aggregation::FilterCriteria,
    auth::{self, SessionGate, SignInForm, SignUpForm},
    category::{CategoryForm, CategoryId, CategoryStore},
    dashboard::{DashboardView, categories_text, dashboard_text, transactions_text},
    date::format_date,
    initialize_db,
    logging::setup_logging,
    navigation::{Navigation, Screen},
    pagination::{PageState, PaginationConfig},
    store::Feed,
    transaction::{TransactionForm, TransactionId, TransactionOrder, TransactionStore},
};

const PASSWORD_ENV: &str = "EXPENSE_MANAGER_PASSWORD";
const NEW_PASSWORD_ENV: &str = "EXPENSE_MANAGER_NEW_PASSWORD";

/// Track income and expenses from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File path to the SQLite database.
    #[arg(long, env = "EXPENSE_MANAGER_DB", default_value = "expenses.db")]
    db_path: PathBuf,

    /// File path to append debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,

    /// The email address of your account. Prompted for when not set.
    #[arg(long, env = "EXPENSE_MANAGER_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Register {
        /// The name shown in the navigation bar.
        #[arg(long)]
        username: String,
    },
    /// Ask for a password reset email.
    ResetPassword,
    /// Sign in and choose a new password.
    SetPassword,
    /// Show totals, charts and the filtered transactions.
    Dashboard(DashboardArgs),
    /// List, add, edit or delete transactions.
    #[command(subcommand)]
    Transactions(TransactionCommand),
    /// List, add, edit or delete categories.
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Write an HTML report to this path instead of printing text.
    #[arg(long)]
    html: Option<PathBuf>,
    /// Only show transactions whose category or type contains this text.
    #[arg(long, default_value = "")]
    query: String,
    /// Only show transactions on or after this date (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    from: String,
    /// Only show transactions on or before this date (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    to: String,
    /// The page of the transaction table to show, counting from 1.
    #[arg(long)]
    page: Option<usize>,
    /// The number of transactions per page.
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// List transactions, newest first.
    List,
    /// Record a transaction.
    Add(TransactionArgs),
    /// Change a transaction. Fields that are not given keep their value.
    Edit {
        /// The ID shown by `transactions list`.
        id: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Remove a transaction.
    Delete {
        /// The ID shown by `transactions list`.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct TransactionArgs {
    /// "income" or "expense". New transactions default to "expense".
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    /// The date (YYYY-MM-DD). New transactions default to today.
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    note: Option<String>,
}

impl TransactionArgs {
    fn apply(self, form: &mut TransactionForm) {
        let TransactionArgs {
            kind,
            category,
            amount,
            date,
            note,
        } = self;

        if let Some(kind) = kind {
            form.kind = kind;
        }
        if let Some(category) = category {
            form.category = category;
        }
        if let Some(amount) = amount {
            form.amount = amount;
        }
        if let Some(date) = date {
            form.date = date;
        }
        if let Some(note) = note {
            form.note = note;
        }
    }
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List categories by name.
    List,
    /// Create a category.
    Add(CategoryArgs),
    /// Rename a category or change its type.
    Edit {
        /// The ID shown by `categories list`.
        id: String,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    /// Remove a category.
    Delete {
        /// The ID shown by `categories list`.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct CategoryArgs {
    #[arg(long)]
    name: Option<String>,
    /// "income" or "expense". New categories default to "expense".
    #[arg(long = "type")]
    kind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(&cli.log_path) {
        eprintln!("Could not open log file {:?}: {error}", cli.log_path);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error.as_ref());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let connection = open_database(&cli.db_path)?;
    let auth = SqliteAuthProvider::new(connection.clone());
    let provider = SqliteProvider::new(connection).scoped_to(auth.sessions());

    let email = match cli.email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };

    match cli.command {
        Command::Register { username } => {
            let form = SignUpForm {
                username,
                email,
                password: read_new_password(PASSWORD_ENV, "Password: ")?,
            };
            let session = auth::sign_up(&auth, &form).await?;
            println!("Registered {}.", session.email);
            auth::sign_out(&auth).await?;
        }
        Command::ResetPassword => {
            let alert = auth::request_password_reset(&auth, email.trim()).await?;
            print_alert(&alert);
        }
        Command::SetPassword => {
            let current = SignInForm {
                email,
                password: read_password("Current password: ")?,
            };
            let new_password = read_new_password(NEW_PASSWORD_ENV, "New password: ")?;
            let result = auth::change_password(&auth, &current, &new_password).await;
            auth::sign_out(&auth).await?;
            print_alert(&result?);
        }
        command => {
            let form = SignInForm {
                email,
                password: read_password("Password: ")?,
            };
            auth::sign_in(&auth, &form).await?;

            let result = run_signed_in(command, &auth, &provider).await;
            auth::sign_out(&auth).await?;
            result?;
        }
    }

    Ok(())
}

async fn run_signed_in(
    command: Command,
    auth: &SqliteAuthProvider,
    provider: &SqliteProvider,
) -> Result<(), Box<dyn Error>> {
    let gate = SessionGate::new(auth);
    let screen = match &command {
        Command::Transactions(_) => Screen::Transactions,
        Command::Categories(_) => Screen::Categories,
        _ => Screen::Dashboard,
    };

    if let Navigation::Redirect(other) = gate.route(screen.path()) {
        tracing::warn!("Redirected from {} to {}", screen.path(), other.path());
        return Err(expense_manager::Error::NotAuthenticated.into());
    }

    let session = gate.require_session()?;

    match command {
        Command::Dashboard(args) => {
            let store = TransactionStore::new(provider, &session);
            let feed = store.subscribe(TransactionOrder::Stored).await?;
            let transactions = feed.current();
            feed.unsubscribe();

            let criteria = FilterCriteria::from_inputs(&args.query, &args.from, &args.to)?;
            let config = PaginationConfig::default();
            let mut page = PageState::new(&config);
            if let Some(page_size) = args.page_size {
                page.set_page_size(page_size);
            }
            if let Some(page_number) = args.page {
                page.set_page(page_number);
            }

            let view = DashboardView::new(&session, &transactions, &criteria, page, &config);

            match args.html {
                Some(path) => {
                    fs::write(&path, view.into_html().into_string())?;
                    println!("Wrote dashboard to {}", path.display());
                }
                None => {
                    let filtered = view.aggregates().filtered.len();
                    print!("{}", dashboard_text(view.aggregates()));
                    println!();
                    print!("{}", transactions_text(view.page_rows()));
                    println!(
                        "Page {} of {} ({} transactions)",
                        page.page(),
                        page.page_count(filtered).max(1),
                        filtered
                    );
                }
            }
        }
        Command::Transactions(command) => {
            let store = TransactionStore::new(provider, &session);
            let mut feed = store.subscribe(TransactionOrder::NewestFirst).await?;

            match command {
                TransactionCommand::List => print!("{}", transactions_text(&feed.current())),
                TransactionCommand::Add(args) => {
                    let mut form = TransactionForm {
                        date: format_date(OffsetDateTime::now_utc().date()),
                        ..TransactionForm::default()
                    };
                    args.apply(&mut form);

                    let (id, alert) = store.add(&form).await?;
                    await_change(&mut feed, &alert).await?;
                    println!("ID: {id}");
                }
                TransactionCommand::Edit { id, fields } => {
                    let id = TransactionId::new(id);
                    let current = feed
                        .current()
                        .into_iter()
                        .find(|transaction| transaction.id == id)
                        .ok_or(expense_manager::ProviderError::NotFound)?;

                    let mut form = TransactionForm::from_transaction(&current);
                    fields.apply(&mut form);

                    let alert = store.update(&id, &form).await?;
                    await_change(&mut feed, &alert).await?;
                }
                TransactionCommand::Delete { id, yes } => {
                    if !yes && !confirm("Delete this transaction?")? {
                        println!("Cancelled.");
                        return Ok(());
                    }

                    let alert = store.delete(&TransactionId::new(id)).await?;
                    await_change(&mut feed, &alert).await?;
                }
            }
        }
        Command::Categories(command) => {
            let store = CategoryStore::new(provider, &session);
            let mut feed = store.subscribe().await?;

            match command {
                CategoryCommand::List => print!("{}", categories_text(&feed.current())),
                CategoryCommand::Add(args) => {
                    let mut form = CategoryForm::default();
                    if let Some(name) = args.name {
                        form.name = name;
                    }
                    if let Some(kind) = args.kind {
                        form.kind = kind;
                    }

                    let (id, alert) = store.add(&form, &feed.current()).await?;
                    await_change(&mut feed, &alert).await?;
                    println!("ID: {id}");
                }
                CategoryCommand::Edit { id, fields } => {
                    let id = CategoryId::new(id);
                    let existing = feed.current();
                    let current = existing
                        .iter()
                        .find(|category| category.id == id)
                        .ok_or(expense_manager::ProviderError::NotFound)?;

                    let mut form = CategoryForm::from_category(current);
                    if let Some(name) = fields.name {
                        form.name = name;
                    }
                    if let Some(kind) = fields.kind {
                        form.kind = kind;
                    }

                    let alert = store.update(&id, &form, &existing).await?;
                    await_change(&mut feed, &alert).await?;
                }
                CategoryCommand::Delete { id, yes } => {
                    if !yes && !confirm("Delete this category?")? {
                        println!("Cancelled.");
                        return Ok(());
                    }

                    let alert = store.delete(&CategoryId::new(id)).await?;
                    await_change(&mut feed, &alert).await?;
                }
            }
        }
        Command::Register { .. } | Command::ResetPassword | Command::SetPassword => {}
    }

    Ok(())
}

fn open_database(db_path: &Path) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    tracing::debug!("Opening database at {db_path:?}");

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    Ok(Arc::new(Mutex::new(connection)))
}

/// Wait for the feed to deliver the change before reporting it.
async fn await_change<T>(feed: &mut Feed<T>, alert: &Alert) -> Result<(), expense_manager::Error> {
    feed.changed().await?;
    print_alert(alert);

    Ok(())
}

fn print_alert(alert: &Alert) {
    println!("{alert}");
}

fn print_error(error: &(dyn Error + 'static)) {
    match error.downcast_ref::<expense_manager::Error>() {
        Some(expense_manager::Error::Validation(errors)) => {
            eprintln!("Please fix the following:");
            for (field, message) in errors.iter() {
                eprintln!("  {}: {message}", field.label());
            }
        }
        Some(error) => eprintln!("{}", Alert::from_error(error)),
        None => eprintln!("Error! {error}"),
    }
}

fn prompt_line(prompt: &str) -> Result<String, io::Error> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim().to_owned())
}

fn confirm(question: &str) -> Result<bool, io::Error> {
    let answer = prompt_line(&format!("{question} [y/N] "))?;

    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn read_password(prompt: &str) -> Result<String, io::Error> {
    match env::var(PASSWORD_ENV) {
        Ok(password) => Ok(password),
        Err(_) => rpassword::prompt_password(prompt),
    }
}

fn read_new_password(env_var: &str, prompt: &str) -> Result<String, Box<dyn Error>> {
    if let Ok(password) = env::var(env_var) {
        return Ok(password);
    }

    let first = rpassword::prompt_password(prompt)?;
    let second = rpassword::prompt_password("Enter the same password again: ")?;

    if first != second {
        return Err("Passwords do not match.".into());
    }

    Ok(first)
}
