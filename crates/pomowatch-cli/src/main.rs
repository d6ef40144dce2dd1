use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod alert;
mod commands;

#[derive(Parser)]
#[command(name = "pomowatch-cli", version, about = "Pomowatch CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive timer session
    Run {
        /// Mode of the first interval (work or break)
        #[arg(long, default_value = "work")]
        mode: String,
    },
    /// Completed sessions
    History {
        /// Delete all stored sessions
        #[arg(long)]
        clear: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("POMOWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { mode } => commands::run::run(&mode),
        Commands::History { clear } => commands::history::run(clear),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
