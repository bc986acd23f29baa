//! List the networks with a known Safe Transaction Service.

mod cmd;

pub use cmd::*;
