//! classroom CLI: timed quiz, leaderboard, and student records from the console.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

use commands::students::StudentCommand;

#[derive(Parser)]
#[command(
    name = "classroom",
    version,
    about = "Timed quiz with leaderboard and a student record manager"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a timed quiz
    Quiz {
        /// Player name shown on the leaderboard
        #[arg(long)]
        name: String,

        /// Seed for the question shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the quiz leaderboard
    Leaderboard {
        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Number of rows to show (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage student records
    Students {
        #[command(subcommand)]
        command: StudentCommand,
    },

    /// Validate a TOML question bank
    ValidateQuestions {
        /// Path to the question bank
        #[arg(long)]
        file: PathBuf,
    },

    /// Create a starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("classroom=info,classroom_core=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz { name, seed } => commands::quiz::execute(name, seed, cli.config).await,
        Commands::Leaderboard { format, limit } => {
            commands::leaderboard::execute(format, limit, cli.config)
        }
        Commands::Students { command } => commands::students::execute(command, cli.config),
        Commands::ValidateQuestions { file } => commands::validate::execute(file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
