//! dictionary module
pub mod dictionary_manager;

/// Re-exports
pub use dictionary_manager::{DictionaryManager, default_cache_dir};
