//! CLI binary entry point for pg-hotswap

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use pg_hotswap::cli::commands::plan::{PlanArgs, handle_plan};
#[cfg(feature = "cli")]
use pg_hotswap::cli::commands::run::{RunArgs, handle_run};
#[cfg(feature = "cli")]
use pg_hotswap::cli::output::OutputFormat;
#[cfg(feature = "cli")]
use pg_hotswap::config::{CONFIG_FILENAME, sample_config};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "pg-hotswap")]
#[command(about = "Replace the contents of a live PostgreSQL table without downtime")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Load the configured source and swap it into the live table
    Run {
        /// Job configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        config: PathBuf,
        /// Live table name, overriding the configuration
        #[arg(short, long)]
        table: Option<String>,
        /// Statement timeout such as "30min" or "0min" to disable it
        #[arg(long)]
        statement_timeout: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the statements a run would send, without connecting
    Plan {
        /// Job configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        config: PathBuf,
        /// Live table name, overriding the configuration
        #[arg(short, long)]
        table: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print a sample job configuration
    SampleConfig,
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            table,
            statement_timeout,
            format,
        } => {
            let args = RunArgs {
                config,
                table,
                statement_timeout,
                format,
            };
            handle_run(&args)
        }
        Commands::Plan {
            config,
            table,
            format,
        } => {
            let args = PlanArgs {
                config,
                table,
                format,
            };
            handle_plan(&args)
        }
        Commands::SampleConfig => {
            print!("{}", sample_config());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
