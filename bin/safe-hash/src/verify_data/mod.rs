//! Check a decoded-data annotation against the raw calldata it claims to describe.

mod cmd;

pub use cmd::*;
