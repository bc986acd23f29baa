//! Command-line front end for the `safe-hash` crate.
//!
//! Fetches pending Safe transactions from the Safe Transaction Service (or takes them from flags
//! and files), recomputes the hashes a hardware wallet shows, and prints the risk report.

mod cmd;
pub use cmd::*;

/// Fetch a transaction from the Safe Transaction Service and inspect it
pub mod api;
/// Shared arguments, errors, logging and report rendering
pub mod common;
/// List the networks with a known transaction service
pub mod networks;
/// Inspect a transaction given on the command line or in a file
pub mod offline;
/// Safe Transaction Service HTTP client
pub mod service;
/// Verify decoded calldata annotations against raw calldata
pub mod verify_data;
