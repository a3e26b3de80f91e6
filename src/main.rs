//! Finhero main entry point

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use finhero_client::ApiClient;
use finhero_config::{Config, LoggingConfig};
use finhero_core::{App, RouteAction, Session, TransactionDraft, TransactionKind};
use finhero_store::SessionStore;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "finhero")]
#[command(version = "0.1.0")]
#[command(about = "Command-line client for the FinHero personal finance backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with an existing account
    Login { email: String, password: String },
    /// Create an account and log in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Record a new transaction
    Add {
        title: String,
        amount: f64,
        /// "income" or "expense"
        kind: String,
        #[arg(long, default_value = "Geral")]
        category: String,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List transactions, most recent first
    List,
    /// Show income, expense, and balance totals
    Summary,
    /// Shared-finance partner link
    Duo {
        #[command(subcommand)]
        action: DuoCommand,
    },
    /// Resolve an application route against the current session
    Open { path: String },
    /// Write a default config.yaml
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum DuoCommand {
    /// Show the current duo link state
    Status,
    /// Request a link with another user
    Link { user_id: String },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let rt = Runtime::new()?;
    rt.block_on(run(args))
}

/// Set up the logger; RUST_LOG overrides the configured level
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    if let Command::InitConfig = args.command {
        init_logging(&LoggingConfig::default().level);
        return init_config(&args.config);
    }

    let from_file = args.config.exists();
    let config = if from_file {
        Config::load(args.config.clone())
            .with_context(|| format!("failed to load {}", args.config.display()))?
    } else {
        Config::default()
    };
    init_logging(&config.logging.level);
    if !from_file {
        info!("no config file at {}; using defaults", args.config.display());
    }

    let client = Arc::new(
        ApiClient::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_seconds),
        )
        .context("failed to build API client")?,
    );
    let store = SessionStore::new(config.storage.path.clone());
    let app = App::new(store, client.clone());
    app.hydrate()?;

    let style = config.currency.style();

    match args.command {
        Command::Login { email, password } => {
            if app.is_authenticated() {
                bail!("already logged in; run `finhero logout` first");
            }
            let session = app.login(&email, &password).await?;
            println!("Logged in as {} <{}>", session.user.name, session.user.email);
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            if app.is_authenticated() {
                bail!("already logged in; run `finhero logout` first");
            }
            let session = app.signup(&name, &email, &password).await?;
            println!("Welcome, {}! Account created.", session.user.name);
        }
        Command::Logout => {
            app.logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let session = app.require_session()?;
            println!(
                "{} <{}> (id {})",
                session.user.name, session.user.email, session.user.id
            );
        }
        Command::Add {
            title,
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let session = app.require_session()?;
            let kind: TransactionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let draft = TransactionDraft {
                id: None,
                title,
                amount,
                kind,
                category,
                date,
                description,
            };
            // Local validation first; nothing is sent for bad input
            draft.validate()?;

            let created = client
                .create_transaction(&session.token, &draft.to_record())
                .await?;
            let stored = app.add_transaction(TransactionDraft::try_from(created)?)?;
            println!(
                "Recorded {} {} ({})",
                stored.title,
                style.format(stored.amount),
                stored.kind
            );
        }
        Command::List => {
            let session = refresh_ledger(&app, &client).await?;
            let transactions = app.transactions()?;
            if transactions.is_empty() {
                println!("No transactions for {}", session.user.name);
                return Ok(());
            }
            for t in &transactions {
                let sign = match t.kind {
                    TransactionKind::Income => '+',
                    TransactionKind::Expense => '-',
                };
                println!(
                    "{}  {}{}  {}  [{}]",
                    t.date,
                    sign,
                    style.format(t.amount),
                    t.title,
                    t.category
                );
            }
        }
        Command::Summary => {
            refresh_ledger(&app, &client).await?;
            let totals = app.totals()?;
            println!("Income:   {}", style.format(totals.income));
            println!("Expenses: {}", style.format(totals.expense));
            println!("Balance:  {}", style.format(totals.balance));
        }
        Command::Duo { action } => {
            let session = app.require_session()?;
            let link = match action {
                DuoCommand::Status => client.duo_status(&session.token, &session.user.id).await?,
                DuoCommand::Link { user_id } => client.duo_link(&session.token, &user_id).await?,
            };
            println!("Duo status: {}", link.status);
            if let Some(code) = link.invite_code {
                println!("Invite code: {}", code);
            }
            if let Some(partner) = link.partner {
                println!("Partner: {} <{}>", partner.name, partner.email);
            }
        }
        Command::Open { path } => match app.resolve_route(&path) {
            RouteAction::Render(route) => println!("render {}", route),
            RouteAction::RedirectToAuth => println!("redirect to /login"),
            RouteAction::RedirectToHome => println!("redirect to /home"),
            RouteAction::NotFound => println!("not found: {}", path),
        },
        Command::InitConfig => unreachable!("handled above"),
    }

    Ok(())
}

/// Pull the remote transaction list into the in-memory ledger
async fn refresh_ledger(app: &App, client: &ApiClient) -> anyhow::Result<Session> {
    let session = app.require_session()?;
    let records = client.list_transactions(&session.token).await?;
    let count = app.ingest_remote(records)?;
    info!("refreshed ledger with {} transactions", count);
    Ok(session)
}

fn init_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::write(path, Config::generate_default())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
