// Public modules
pub mod clean;
pub mod config;
pub mod error;
pub mod executor;
pub mod git;
pub mod hosting;
pub mod manifest;
pub mod release;
pub mod shell;
pub mod testrun;
pub mod version;
pub mod workspace;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
