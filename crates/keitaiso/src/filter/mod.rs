//! filter module
pub mod token_filter;

/// Re-exports
pub use token_filter::{DEFAULT_PARTS_OF_SPEECH, TokenFilter, default_parts_of_speech};
