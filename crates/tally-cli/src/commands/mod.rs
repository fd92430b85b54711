//! CLI command implementations
//!
//! - `summarize` - Print the monthly summary of a sheet
//! - `serve` - Web server command

pub mod serve;
pub mod summarize;

// Re-export command functions for main.rs
pub use serve::*;
pub use summarize::*;
