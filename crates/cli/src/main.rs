//! Stockdash - dashboard shell with session-gated navigation.
//!
//! # Usage
//!
//! ```bash
//! # Print the route table
//! stockdash routes
//!
//! # Where does an anonymous visitor land?
//! stockdash check /dashboard/database
//!
//! # Same route as a logged-in admin, as JSON
//! stockdash check /dashboard/database --user root --admin --json
//!
//! # Interactive shell
//! stockdash shell
//!
//! # Use a custom route table
//! stockdash --routes config/routes.yaml shell
//! ```
//!
//! # Commands
//!
//! - `routes` - Print the route tree and configuration lints
//! - `check` - Evaluate one navigation
//! - `shell` - Interactive dashboard shell

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::check::CheckSession;
use config::{LogFormat, ShellConfig};

#[derive(Parser)]
#[command(name = "stockdash")]
#[command(author, version, about = "Stockdash dashboard shell")]
struct Cli {
    /// Route table YAML file (overrides `STOCKDASH_ROUTES`)
    #[arg(long, global = true)]
    routes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route tree and configuration lints
    Routes,
    /// Evaluate one navigation from a fresh session
    Check {
        /// Requested path, optionally with a query string
        path: String,

        /// Log in as this user before navigating
        #[arg(short, long)]
        user: Option<String>,

        /// Log in as an admin (requires --user)
        #[arg(short, long, requires = "user")]
        admin: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive dashboard shell
    Shell,
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays clean.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockdash=info,stockdash_core=info".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShellConfig) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.load_route_table(cli.routes.as_deref())?;
    let guard = config.guard.clone();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Routes => commands::routes::render(&table, &mut stdout)?,
        Commands::Check {
            path,
            user,
            admin,
            json,
        } => {
            let session = CheckSession { user, admin };
            commands::check::run(table, guard, &path, &session, json, &mut stdout)?;
        }
        Commands::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            commands::shell::run(table, guard, input, &mut stdout).await?;
        }
    }
    Ok(())
}
