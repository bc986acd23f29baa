//! Inspect a pending transaction fetched from the Safe Transaction Service.

mod cmd;

pub use cmd::*;
