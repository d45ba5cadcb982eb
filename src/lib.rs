// Library half of dirtidy.
// Exposes the tools for the binary and for integration tests.

pub mod cli;
pub mod error;
pub mod extensions;
pub mod folders;
pub mod logging;
pub mod output;
pub mod pool;
pub mod probe;
pub mod prompt;
pub mod retry;
pub mod utils;

pub use error::{FailureKind, TidyError};

/// Process exit codes. Usage errors exit with 2 from clap itself.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    pub const INTERNAL: u8 = 1;
    pub const INVALID_PATH: u8 = 3;
    pub const LEDGER_FAILED: u8 = 4;
    pub const PARTIAL_FAILURE: u8 = 5;
    pub const PROBE_FAILED: u8 = 6;
}
