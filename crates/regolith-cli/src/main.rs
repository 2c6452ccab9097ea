//! Regolith CLI — scenario runs and input validation.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "regolith")]
#[command(version, about = "Regolith — rigid-body contact dynamics engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario from a JSON file.
    Simulate {
        /// Path to the scenario file.
        #[arg(short, long, default_value = "scenario.json")]
        scenario: String,

        /// Output JSON file path (stdout when omitted).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a scenario file and report its preprocessed geometry.
    Validate {
        /// Path to the scenario file.
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate { scenario, output } => {
            commands::simulate(&scenario, output.as_deref())
        }
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
