//! Trailing-edge debounced values
//!
//! This crate provides:
//! - `Debouncer<T>`: an explicitly clocked debounce state machine
//! - `Debounced<T>`: a tokio-backed handle publishing settled values
//! - `DebounceConfig`: TOML-loadable delay configuration

pub mod config;
pub mod debounce;
pub mod task;

// Re-exports
pub use config::DebounceConfig;
pub use debounce::Debouncer;
pub use task::Debounced;
