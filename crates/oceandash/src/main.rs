//! `oceandash` - CLI for the oceanographic dashboard backend.
//!
//! Runs the HTTP API and offers store and configuration checks.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use oceandash::cli::{CheckCommand, Cli, Command, ConfigCommand, ServeCommand};
use oceandash::{init_logging, server, Config, PersistenceGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(serve_cmd) => {
            let config = load_config(cli.config, &serve_cmd)?;
            server::run(config).await.context("server error")
        }
        Command::Check(check_cmd) => {
            let config = load_config(cli.config, &ServeCommand::default())?;
            handle_check(&config, &check_cmd).await
        }
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>, overrides: &ServeCommand) -> anyhow::Result<Config> {
    let mut config =
        Config::load_from(path).context("failed to load application configuration")?;
    overrides.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<()> {
    let gateway = PersistenceGateway::connect(&config.database);
    let report = gateway.diagnostics().await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("oceandash check");
        println!("---------------");
        println!("Backend:       {}", report.backend);
        println!("Database:      {}", report.database);
        println!(
            "Database URL:  {}",
            report.database_url.as_deref().unwrap_or("-")
        );
        println!(
            "Database name: {}",
            report.database_name.as_deref().unwrap_or("-")
        );
        println!("Connection:    {}", report.connection_status);
        if report.collections.is_empty() {
            println!("Collections:   (none)");
        } else {
            println!("Collections:   {}", report.collections.join(", "));
        }
    }
    Ok(())
}

fn handle_config(path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Listen address:     {}", config.listen_address());
                println!();
                println!("[Database]");
                println!(
                    "  URL:                {}",
                    if config.database.url.is_some() { "Set" } else { "Not Set" }
                );
                println!("  Name:               {}", config.database.name);
                println!();
                println!("[CORS]");
                println!("  Allow credentials:  {}", config.cors.allow_credentials);
                println!();
                println!("[Limits]");
                println!("  Vessels:            {}", config.limits.vessels);
                println!("  Missions:           {}", config.limits.missions);
                println!("  Logs:               {}", config.limits.logs);
                println!("  Telemetry:          {}", config.limits.telemetry);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
