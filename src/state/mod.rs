//! Application state management.
//!
//! Holds the configuration and the services every command works with.

mod manager;

pub use manager::AppStateManager;
