//! Offline inspection of a transaction given on the command line.
//!
//! Nothing is fetched: the transaction fields come from flags or from a JSON record shaped like
//! the transaction service's, and the hashes are computed locally.

mod cmd;

pub use cmd::*;
