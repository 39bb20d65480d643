//! Command modules.
//!
//! Each submodule backs one or more CLI subcommands. Commands take the
//! shared `AppStateManager`, clean their path arguments once, and return
//! the response types from `api_contracts`.

pub mod compress;
pub mod debug;
pub mod folders;
pub mod settings;
pub mod version;
