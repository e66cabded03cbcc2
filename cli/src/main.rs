//! Finance CLI - income and expense tracking against the finance API

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use finance_core::config::{API_URL_ENV, TOKEN_PATH_ENV};
use finance_core::{ClientConfig, TransactionType, UpdateTransaction};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{auth, profile, transactions};

/// Finance - track income and expenses from your terminal
#[derive(Parser)]
#[command(name = "finance", version, about, long_about = None)]
struct Cli {
    /// Base URL of the finance API
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// File holding the session token
    #[arg(long, global = true, env = TOKEN_PATH_ENV)]
    token_path: Option<PathBuf>,

    /// Log requests to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in to an existing account
    Signin {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show API endpoint and session state
    Status,

    /// List your transactions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show income, expense and balance totals
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the summary followed by the transaction list
    Dashboard,

    /// Record a transaction
    Add {
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show one transaction
    Show {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a transaction
    Edit {
        id: i64,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a transaction
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show your profile
    Profile,

    /// Update your name and mobile number
    UpdateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: Option<String>,
    },

    /// List the categories offered for a transaction type
    Categories {
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&report(&e));
            ExitCode::FAILURE
        }
    }
}

/// The error with its whole cause chain on one line.
fn report(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "finance_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config(api_url: Option<String>, token_path: Option<PathBuf>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }
    if let Some(path) = token_path {
        config.token_path = path;
    }
    config
}

fn run(cli: Cli) -> Result<()> {
    let config = config(cli.api_url, cli.token_path);
    tracing::debug!(base_url = %config.base_url, token_path = %config.token_path.display(), "configured");

    let api = commands::connect(&config)?;
    match cli.command {
        Commands::Signup { name, email, password } => auth::sign_up(&api, name, email, password),
        Commands::Signin { email, password } => auth::sign_in(&api, email, password),
        Commands::Logout => auth::logout(&api),
        Commands::Status => auth::status(&api, &config),
        Commands::List { json } => transactions::list(&api, json),
        Commands::Summary { json } => transactions::summary(&api, json),
        Commands::Dashboard => transactions::dashboard(&api),
        Commands::Add { kind, category, amount, description, date } => {
            transactions::add(&api, kind, category, amount, description, date)
        }
        Commands::Show { id, json } => transactions::show(&api, id, json),
        Commands::Edit { id, kind, category, amount, description, date } => {
            let patch = UpdateTransaction {
                kind,
                category,
                amount,
                description,
                transaction_date: date,
            };
            transactions::edit(&api, id, &patch)
        }
        Commands::Delete { id, force } => transactions::delete(&api, id, force),
        Commands::Profile => profile::show(&api),
        Commands::UpdateProfile { name, mobile } => profile::update(&api, name, mobile),
        Commands::Categories { kind } => {
            transactions::categories(kind);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn add_defaults_to_expense() {
        let cli = Cli::parse_from(["finance", "add", "--category", "Food", "--amount", "12.5"]);
        match cli.command {
            Commands::Add { kind, category, amount, date, .. } => {
                assert_eq!(kind, TransactionType::Expense);
                assert_eq!(category.as_deref(), Some("Food"));
                assert_eq!(amount.as_deref(), Some("12.5"));
                assert!(date.is_none());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn edit_parses_typed_fields() {
        let cli = Cli::parse_from([
            "finance", "edit", "7", "--type", "income", "--amount", "20", "--date", "2024-05-02",
        ]);
        match cli.command {
            Commands::Edit { id, kind, amount, date, category, .. } => {
                assert_eq!(id, 7);
                assert_eq!(kind, Some(TransactionType::Income));
                assert_eq!(amount, Some(Decimal::from(20)));
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 2));
                assert!(category.is_none());
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["finance", "categories", "--type", "gift"]).is_err());
    }

    #[test]
    fn report_includes_the_cause() {
        use anyhow::Context;

        let error = Err::<(), _>(std::io::Error::other("session storage is corrupt"))
            .context("Failed to open session file /tmp/session.json")
            .unwrap_err();
        assert_eq!(
            report(&error),
            "Failed to open session file /tmp/session.json: session storage is corrupt"
        );
    }

    #[test]
    fn flags_override_environment_config() {
        let config = config(
            Some("http://127.0.0.1:9999".to_string()),
            Some(PathBuf::from("/tmp/finance/session.json")),
        );
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.token_path, PathBuf::from("/tmp/finance/session.json"));
    }
}
