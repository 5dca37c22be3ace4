mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::App;
use config::{CliConfig, SESSION_DB};
use scratch_core::routes::Route;
use scratch_core::{ScratchError, SqliteSessionStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scratch")]
#[command(about = "Scratch & Win - play, redeem and manage prizes")]
#[command(version)]
struct Cli {
    /// Data directory for configuration and sessions
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "SCRATCH_API_URL")]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter your details and scratch a card
    Play(commands::PlayArgs),

    /// Check whether a token can still be played
    Check {
        /// Token code
        token: String,
    },

    /// Show the status of a play
    Status {
        /// Play ID
        play_id: String,
    },

    /// Staff portal commands
    #[command(subcommand)]
    Staff(commands::StaffCommands),

    /// Admin portal commands
    #[command(subcommand)]
    Admin(commands::AdminCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "scratch={0},scratch_core={0},scratch_reveal={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(CliConfig::default_data_dir);
    tokio::fs::create_dir_all(&data_dir).await?;

    let result = run(cli.command, &data_dir, cli.api_url.as_deref()).await;

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, data_dir: &Path, api_url: Option<&str>) -> scratch_core::Result<()> {
    let config = CliConfig::load(data_dir).await?;
    let client = config.client(api_url);
    client.validate()?;

    let store = SqliteSessionStore::new(&data_dir.join(SESSION_DB)).await?;
    let app = App {
        config,
        client,
        store: Arc::new(store),
    };

    match command {
        Commands::Play(args) => commands::handle_play(args, &app).await,
        Commands::Check { token } => commands::handle_check(&token, &app).await,
        Commands::Status { play_id } => commands::handle_status(&play_id, &app).await,
        Commands::Staff(cmd) => commands::handle_staff_command(cmd, &app).await,
        Commands::Admin(cmd) => commands::handle_admin_command(cmd, &app).await,
    }
}

fn report(e: &ScratchError) {
    match e {
        ScratchError::Validation(errors) => {
            eprintln!("Error: Please fix the following:");
            for violation in errors.iter() {
                eprintln!("  {}: {}", violation.field, violation.message);
            }
        }
        ScratchError::Unauthenticated { message, login_route } => {
            eprintln!("Error: {}", message);
            eprintln!("{}", login_hint(*login_route));
        }
        ScratchError::Api { .. } | ScratchError::NetworkConnection(_) => {
            eprintln!("Error: {}", e.user_message());
        }
        _ => {
            eprintln!("Error: {}", e);
        }
    }
}

fn login_hint(route: Route) -> &'static str {
    match route {
        Route::StaffLogin => "Store a staff token with: scratch staff session set",
        _ => "Log in with: scratch admin login",
    }
}
