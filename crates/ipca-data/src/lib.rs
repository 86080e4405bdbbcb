//! Data layer of the IPCA pipeline.
//!
//! Discovers and parses the monthly wide tables, reshapes them into long
//! records, and reads/writes the tab-delimited output table.

pub mod output;
pub mod pipeline;
pub mod reader;
pub mod reshape;

pub use ipca_core as core;
