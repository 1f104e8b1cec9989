//! Configuration module for Poolkeeper
//!
//! This module provides configuration management including:
//! - Comparison tolerances injected into the validator
//! - User settings persistence
//! - Config path resolution

pub mod paths;
pub mod settings;

pub use paths::PoolkeeperPaths;
pub use settings::{Settings, Tolerances};
