//! Multisig Advisor CLI Application
//!
//! A command-line interface for planning multisig custody.

use clap::{Parser, Subcommand};
use multisig_advisor::advisor::SessionManager;
use multisig_advisor::api::{create_router, ApiState, ENDPOINTS};
use multisig_advisor::cli::{self, AppState};
use multisig_advisor::storage::{load_from_file, save_to_file};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "advisor")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Multisig custody advisor", long_about = None)]
struct Cli {
    /// Data directory for advisor state
    #[arg(short, long, default_value = ".advisor_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend an M-of-N configuration
    Recommend {
        /// Threats to protect against (comma-separated: loss,theft,coercion,collusion)
        #[arg(short, long, default_value = "")]
        threats: String,

        /// Amount tier (small, medium, large, very-large)
        #[arg(long)]
        tier: String,

        /// Apply the recommendation to the current configuration
        #[arg(long)]
        apply: bool,
    },

    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Store a key distribution (used for scoring)
    Distribute {
        /// Location entry, e.g. home=key-1,key-2 (repeatable)
        #[arg(short, long = "location", required = true)]
        locations: Vec<String>,
    },

    /// Validate a key distribution (defaults to the stored one)
    Validate {
        /// Location entry, e.g. bank=key-3 (repeatable)
        #[arg(short, long = "location")]
        locations: Vec<String>,
    },

    /// Show the security score
    Score,

    /// Show the configuration summary
    Summary,

    /// Simulate signing with a key
    Sign {
        /// Key to sign with, e.g. key-1
        #[arg(short, long)]
        key: Option<String>,

        /// Clear all signatures
        #[arg(long)]
        reset: bool,
    },

    /// Delete saved state and return to the default 2-of-3 configuration
    Reset,

    /// REST API server
    Api {
        #[command(subcommand)]
        action: ApiCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a new M-of-N configuration (resets keys and distribution)
    Set {
        /// Required signatures
        #[arg(short)]
        m: u32,

        /// Total keys
        #[arg(short)]
        n: u32,
    },

    /// Show the current configuration
    Show,
}

#[derive(Subcommand)]
enum ApiCommands {
    /// Start the REST API server
    Start {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle API commands with tokio runtime
    if let Commands::Api { ref action } = cli.command {
        return run_api_command(action, &cli.data_dir);
    }

    // Reset must work even when the saved state no longer loads
    if let Commands::Reset = cli.command {
        let mut state = AppState::unloaded(cli.data_dir.clone())?;
        return cli::cmd_reset(&mut state);
    }

    // Initialize application state
    let mut state = AppState::new(cli.data_dir.clone())?;

    // Process commands
    match cli.command {
        Commands::Api { .. } | Commands::Reset => unreachable!(),

        Commands::Recommend {
            threats,
            tier,
            apply,
        } => {
            cli::cmd_recommend(&mut state, &threats, &tier, apply)?;
        }

        Commands::Config { action } => match action {
            ConfigCommands::Set { m, n } => {
                cli::cmd_config_set(&mut state, m, n)?;
            }
            ConfigCommands::Show => {
                cli::cmd_config_show(&state)?;
            }
        },

        Commands::Distribute { locations } => {
            cli::cmd_distribute(&mut state, &locations)?;
        }

        Commands::Validate { locations } => {
            cli::cmd_validate(&state, &locations)?;
        }

        Commands::Score => {
            cli::cmd_score(&state)?;
        }

        Commands::Summary => {
            cli::cmd_summary(&state)?;
        }

        Commands::Sign { key, reset } => {
            cli::cmd_sign(&mut state, key.as_deref(), reset)?;
        }
    }

    Ok(())
}

fn load_sessions(path: &Path) -> Result<SessionManager, Box<dyn std::error::Error>> {
    if path.exists() {
        println!("📂 Loading saved sessions...");
        Ok(load_from_file(path)?)
    } else {
        Ok(SessionManager::new())
    }
}

fn run_api_command(
    action: &ApiCommands,
    data_dir: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        match action {
            ApiCommands::Start { port } => {
                std::fs::create_dir_all(data_dir)?;
                let sessions_file = data_dir.join("sessions.json");

                let state = ApiState::new(load_sessions(&sessions_file)?);

                // Clone state for shutdown handler
                let shutdown_state = state.clone();

                let app = create_router(state);

                let addr = format!("0.0.0.0:{}", port);
                println!("🚀 REST API server starting on http://localhost:{}", port);
                println!();
                println!("📖 Available endpoints:");
                for (method, path, description) in ENDPOINTS {
                    println!("   {:<6} {:<38} - {}", method, path, description);
                }
                println!();

                // Handle Ctrl+C with graceful shutdown
                tokio::spawn(async move {
                    tokio::signal::ctrl_c().await.ok();
                    println!("\n📴 Shutting down API server...");

                    println!("💾 Saving sessions...");
                    let sessions = shutdown_state.session_manager.read().await;
                    match save_to_file(&*sessions, &sessions_file) {
                        Ok(()) => println!("✅ Sessions saved successfully!"),
                        Err(e) => log::error!("Failed to save sessions: {}", e),
                    }
                    std::process::exit(0);
                });

                let listener = tokio::net::TcpListener::bind(&addr).await?;
                log::info!("Listening on {}", addr);
                axum::serve(listener, app).await?;
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
