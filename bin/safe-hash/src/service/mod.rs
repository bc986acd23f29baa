//! A minimal client for the Safe Transaction Service REST API.
//!
//! Only the two read-only endpoints needed to inspect a pending transaction are covered: the
//! Safe's metadata (for its contract version) and the multisig transactions queued at a nonce.

mod client;
mod types;

pub use client::*;
pub use types::*;
