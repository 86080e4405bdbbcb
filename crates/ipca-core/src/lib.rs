//! Domain types and shared plumbing for the IPCA pipeline.
//!
//! Holds the period and record models, the error type, comma-decimal
//! parsing, label cleaning and the CLI/config settings used by every other
//! crate in the workspace.

pub mod decimal;
pub mod error;
pub mod labels;
pub mod models;
pub mod settings;

pub use error::{IpcaError, Result};
