mod commands;
mod config;

use bonusball_core::{BonusBallError, PoolManager};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bonusball")]
#[command(about = "Bonus Ball - club lottery tracker")]
#[command(version)]
struct Cli {
    /// Data directory for the pool database and config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Admin password (falls back to BONUSBALL_ADMIN_PASSWORD, then a prompt)
    #[arg(short, long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and pool if missing
    Init,

    /// Show the board of balls
    Board {
        /// Filter by ball number or owner name
        #[arg(short, long)]
        search: Option<String>,
        /// Only show owners who have not paid for the next draw
        #[arg(short, long)]
        unpaid: bool,
    },

    /// Pot status and draw rules
    Stats,

    /// Ball ownership and payment commands
    #[command(subcommand)]
    Slot(commands::SlotCommands),

    /// Draw settlement and results
    #[command(subcommand)]
    Draw(commands::DrawCommands),

    /// Admin settings and announcements
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
            "bonusball={},bonusball_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bonusball")
    });

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;
    tracing::debug!("Using data directory {}", data_dir.display());

    let manager = PoolManager::new(&data_dir).await?;
    let ctx = commands::Context {
        manager,
        data_dir,
        password: cli.password,
    };

    // Execute command
    let result = match cli.command {
        Commands::Init => commands::init(&ctx).await,
        Commands::Board { search, unpaid } => {
            commands::show_board(&ctx, search.as_deref(), unpaid).await
        }
        Commands::Stats => commands::show_stats(&ctx).await,
        Commands::Slot(cmd) => commands::handle_slot_command(cmd, &ctx).await,
        Commands::Draw(cmd) => commands::handle_draw_command(cmd, &ctx).await,
        Commands::Admin(cmd) => commands::handle_admin_command(cmd, &ctx).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<BonusBallError>() {
            Some(BonusBallError::InvalidSelection { number, total }) => {
                eprintln!("Error: there is no ball {}", number);
                eprintln!("Choose a ball between 1 and {}", total);
            }
            Some(BonusBallError::InvalidDuration { weeks }) => {
                eprintln!("Error: cannot pay for {} weeks", weeks);
                eprintln!("Enter a whole number of weeks, 1 or more");
            }
            Some(BonusBallError::AccessDenied) => {
                eprintln!("Error: Access denied");
            }
            Some(BonusBallError::StaleState { .. }) => {
                eprintln!("Error: the pool was changed by someone else");
                eprintln!("Nothing was saved; run the command again");
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
