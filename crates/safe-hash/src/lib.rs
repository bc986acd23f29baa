//! Independent verification of Safe multisig transactions.
//!
//! The crate recomputes the EIP-712 hashes a Safe owner signs on a hardware wallet, unwinds
//! `MultiSend` batches, cross-checks decoded calldata annotations against the raw bytes and
//! classifies the transaction into a risk taxonomy. Everything in here is synchronous and free of
//! I/O; fetching transactions is left to the caller.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod error;
pub use error::*;

mod hash;
pub use hash::*;

mod inspect;
pub use inspect::*;

pub mod interfaces;

mod multisend;
pub use multisend::*;

pub mod registry;
pub use registry::{CallDecoder, DecodedCall, DecodedParam, DecoderRegistry};

pub mod security;
pub use security::{analyze_security, RiskLevel, RiskVerdict};

pub mod serde_helpers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;

mod verify;
pub use verify::*;

mod version;
pub use version::*;
