//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (read_document, load_config) and the config command
//! - `evaluate` - Evaluation commands (evaluate, edit, submit)
//! - `reports` - Report list commands (list, new)

pub mod core;
pub mod evaluate;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use evaluate::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
