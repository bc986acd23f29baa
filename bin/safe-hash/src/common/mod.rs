mod error;
mod hex;
mod io;
mod logging;
mod network;
mod report;

pub use error::*;
pub use hex::*;
pub use io::*;
pub use logging::*;
pub use network::*;
pub use report::*;
