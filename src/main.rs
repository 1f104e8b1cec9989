use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use poolkeeper::cli::{
    handle_check_command, handle_import_command, handle_max_payment_command, OutputFormat,
};
use poolkeeper::config::{PoolkeeperPaths, Settings};
use poolkeeper::Validator;

#[derive(Parser)]
#[command(
    name = "poolkeeper",
    version,
    about = "Allocation and transaction integrity checks for pool budgets",
    long_about = "Poolkeeper validates budgets that track money both by purpose (pools) \
                  and by location (channels). It checks allocations, transactions, \
                  strategies, balances, and bulk imports without modifying anything."
)]
struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "poolkeeper=trace"
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a whole budget document (JSON or YAML)
    Check {
        /// Path to the budget document
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Partition import rows (CSV or JSON) into valid and invalid sets
    Import {
        /// Path to the rows file
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Largest credit payment a transfer's source pools could cover
    MaxPayment {
        /// Path to the budget document
        file: PathBuf,
        /// Transfer transaction ID
        #[arg(short, long)]
        transfer: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show current configuration and paths
    Config,
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let paths = PoolkeeperPaths::new()?;
    let settings_file = cli.config.clone().unwrap_or_else(|| paths.settings_file());
    let settings = Settings::load_or_default(&settings_file)
        .with_context(|| format!("loading settings from {}", settings_file.display()))?;
    let validator = Validator::from_settings(&settings);

    let clean = match cli.command {
        Commands::Check { file, format } => handle_check_command(&validator, &file, format)?,
        Commands::Import { file, format } => handle_import_command(&validator, &file, format)?,
        Commands::MaxPayment {
            file,
            transfer,
            format,
        } => handle_max_payment_command(&validator, &file, &transfer, format)?,
        Commands::Config => {
            println!("Poolkeeper Configuration");
            println!("========================");
            println!("Config directory: {}", paths.config_dir().display());
            println!("Settings file:    {}", settings_file.display());
            println!();
            println!("Settings:");
            println!("  Amount tolerance:     {}", settings.tolerances.amount);
            println!("  Proportion tolerance: {}", settings.tolerances.proportion);
            println!(
                "  Credit negatives:     {}",
                if settings.flag_credit_negative_as_warning {
                    "warning"
                } else {
                    "error"
                }
            );
            if !settings.import_date_formats.is_empty() {
                println!(
                    "  Import date formats:  {}",
                    settings.import_date_formats.join(", ")
                );
            }
            true
        }
    };

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
