//! `rollcall` - student-record management web service
//!
//! This binary provides the command-line interface for running the HTTP
//! server and inspecting configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use rollcall::cli::{Cli, Command, ConfigCommand, ServeCommand};
use rollcall::web::{self, AppState};
use rollcall::{init_logging, Config, Records, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(&config, serve_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(config: &Config, cmd: ServeCommand) -> anyhow::Result<()> {
    let database_path = cmd.database.unwrap_or_else(|| config.database_path());
    let bind_addr = cmd
        .bind
        .unwrap_or_else(|| config.server.bind_addr.clone());

    let storage = Storage::open(&database_path)?;
    let state = AppState::new(Records::new(storage));

    web::serve(state, &bind_addr).await?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:  {}", config.server.bind_addr);
                println!();
                println!("[Storage]");
                println!("  Database path: {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
