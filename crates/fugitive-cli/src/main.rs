//! fugitive-setup
//!
//! Registers the Fugitive Simple DocType, seeds sample purchases and
//! manages refrigerant emission records.

#![forbid(unsafe_code)]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use fugitive_cli::commands;
use fugitive_cli::config_handlers::handle_config_command;
use fugitive_cli::{Cli, Command, SetupConfig, logging};
use fugitive_store::create_store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Config { action } = cli.command {
        logging::init(cli.verbose, &Default::default());
        handle_config_command(cli.config.as_deref(), action, &mut io::stdout())?;
        return Ok(());
    }

    let config = SetupConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init(cli.verbose, &config.logging);
    let schema = config.load_schema().context("loading DocType schema")?;
    tracing::debug!(doctype = %schema.name, backend = %config.store.backend, "Starting");

    let mut out = io::stdout().lock();

    if !cli.command.needs_store() {
        match cli.command {
            Command::Estimate {
                amount,
                unit,
                gwp,
                refrigerant,
            } => {
                commands::cmd_estimate(amount, &unit, gwp, refrigerant.as_deref(), &mut out)?;
            }
            Command::Schema { json } => commands::cmd_schema(&schema, json, &mut out)?,
            _ => {}
        }
        return Ok(());
    }

    let store = create_store(&config.store)
        .await
        .context("opening document store")?;
    let store = store.as_ref();

    match cli.command {
        Command::Setup {
            with_samples,
            no_samples,
        } => {
            let choice = match (with_samples, no_samples) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let mut input = io::stdin().lock();
            commands::cmd_setup(store, &schema, choice, &mut input, &mut out).await?;
        }
        Command::CreateDoctype => commands::cmd_create_doctype(store, &schema, &mut out).await?,
        Command::AddSamples => {
            commands::cmd_add_samples(store, &schema, &mut out).await?;
        }
        Command::Add(args) => {
            commands::require_doctype(store, &schema).await?;
            commands::cmd_add(store, &schema, &args, &mut out).await?;
        }
        Command::Delete { s_no } => {
            commands::require_doctype(store, &schema).await?;
            commands::cmd_delete(store, &schema, s_no, &mut out).await?;
        }
        Command::List { json, company } => {
            commands::require_doctype(store, &schema).await?;
            commands::cmd_list(store, &schema, json, company.as_deref(), &mut out).await?;
        }
        Command::Summary { period, company } => {
            commands::require_doctype(store, &schema).await?;
            let today = chrono::Local::now().date_naive();
            commands::cmd_summary(store, &schema, period, company.as_deref(), today, &mut out)
                .await?;
        }
        Command::Estimate { .. } | Command::Schema { .. } | Command::Config { .. } => {}
    }
    Ok(())
}
