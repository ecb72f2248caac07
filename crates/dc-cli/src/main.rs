use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dc_cli::commands::{category, event, export, limit, report, status};
use dc_cli::{CategoryAction, Cli, Commands, Config, EventAction, LimitAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(dc_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = dc_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match cli.command {
        Some(Commands::Category { action }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            match action {
                CategoryAction::Add { name, color } => category::add(&db, name, color)?,
                CategoryAction::List { json } => category::list(&db, json)?,
                CategoryAction::Rm { id } => category::remove(&db, &id)?,
                CategoryAction::Use { id } => category::switch(&db, &id)?,
            }
        }
        Some(Commands::Event { action }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            match action {
                EventAction::Add { from, to, note } => {
                    event::add(&db, &from, to.as_deref(), note)?;
                }
                EventAction::List { json } => event::list(&db, json)?,
                EventAction::Rm { id } => event::remove(&db, &id)?,
            }
        }
        Some(Commands::Limit { action }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            match action {
                LimitAction::Add {
                    name,
                    max_days,
                    yearly,
                    monthly,
                    running,
                    unit,
                    from,
                    to,
                    favorite,
                } => {
                    let kind = limit::KindArgs {
                        yearly,
                        monthly,
                        running,
                        unit: unit.as_deref(),
                        from: from.as_deref(),
                        to: to.as_deref(),
                    };
                    limit::add(&db, name, max_days, &kind, favorite)?;
                }
                LimitAction::List { json } => limit::list(&db, json)?,
                LimitAction::Rm { id } => limit::remove(&db, &id)?,
            }
        }
        Some(Commands::Status { as_of, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            status::run(&db, as_of.as_deref(), json)?;
        }
        Some(Commands::Report { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            report::run(&db, json)?;
        }
        Some(Commands::Export) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            export::run(&db)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
