//! CLI command handlers
//!
//! This module bridges the clap argument parsing in the binary with the
//! validation engine. Handlers return whether the input was clean so the
//! binary can choose its exit code.

pub mod check;
pub mod import;
pub mod payment;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::PoolkeeperResult;

pub use check::handle_check_command;
pub use import::handle_import_command;
pub use payment::handle_max_payment_command;

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    Json,
    Yaml,
}

/// Render a serializable report in a machine-readable format
pub(crate) fn render<T: Serialize>(format: OutputFormat, value: &T) -> PoolkeeperResult<Option<String>> {
    match format {
        OutputFormat::Table => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}
