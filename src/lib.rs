//! Poolkeeper - allocation and transaction integrity engine
//!
//! Money in a Poolkeeper budget lives in two dimensions at once: *pools*
//! (purpose-based envelopes such as groceries or an emergency fund) and
//! *channels* (where the money physically sits, such as a checking account
//! or a credit card). This library decides whether allocations,
//! transactions, strategies, balances, and bulk imports across those two
//! dimensions are internally consistent. It never persists anything.
//!
//! # Architecture
//!
//! - `config`: Tolerances, user settings, and path management
//! - `error`: Custom error types
//! - `models`: Pools, channels, allocations, transactions, balances
//! - `validation`: The [`Validator`] engine and its structured results
//! - `import`: Reading raw rows for the import pipeline
//! - `cli` / `display`: Command handlers and table output for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use poolkeeper::models::{AllocationBreakdown, AllocationItem};
//! use poolkeeper::Validator;
//!
//! let breakdown = AllocationBreakdown::new(
//!     vec![AllocationItem::new("pool1", 60.0), AllocationItem::new("pool2", 40.0)],
//!     100.0,
//! );
//! assert!(Validator::default().validate_allocation_breakdown(&breakdown).is_valid);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod import;
pub mod models;
pub mod validation;

pub use error::{PoolkeeperError, PoolkeeperResult};
pub use validation::{ValidationResult, Validator};
