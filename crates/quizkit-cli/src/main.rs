//! quizkit CLI: the user-facing command-line interface.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod builtins;
mod commands;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Quiz evaluation and session runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question pool files
    Validate {
        /// Path to a .json/.toml pool file or directory
        #[arg(long)]
        pool: PathBuf,
    },

    /// Search the question bank
    Fetch {
        /// Search queries (repeatable)
        #[arg(long, required = true)]
        query: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the fetched questions as a pool file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Take a quiz in the terminal
    Take {
        /// Pool file or directory
        #[arg(long, conflicts_with = "query", required_unless_present = "query")]
        pool: Option<PathBuf>,

        /// Question bank queries (repeatable)
        #[arg(long)]
        query: Vec<String>,

        /// Questions shown per attempt (default: all)
        #[arg(long)]
        count: Option<NonZeroUsize>,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the session summary as JSON when done
        #[arg(long)]
        json: bool,
    },

    /// Render a drawn quiz as a standalone HTML page
    Render {
        /// Pool file or directory
        #[arg(long)]
        pool: PathBuf,

        /// Questions to draw (default: all)
        #[arg(long)]
        count: Option<NonZeroUsize>,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Output HTML file
        #[arg(long)]
        output: PathBuf,
    },

    /// Create starter config and example question pool
    Init,
}

#[tokio::main]
async fn main() {
    let directive: tracing_subscriber::filter::Directive = match "quizkit=info".parse() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Error: invalid log directive: {e}");
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { pool } => commands::validate::execute(pool),
        Commands::Fetch {
            query,
            config,
            output,
        } => commands::fetch::execute(query, config, output).await,
        Commands::Take {
            pool,
            query,
            count,
            seed,
            config,
            json,
        } => {
            commands::take::execute(commands::take::TakeArgs {
                pool,
                query,
                count,
                seed,
                config,
                json,
            })
            .await
        }
        Commands::Render {
            pool,
            count,
            seed,
            output,
        } => commands::render::execute(pool, count, seed, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
