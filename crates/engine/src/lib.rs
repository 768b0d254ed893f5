//! Cyoa Engine library.
//!
//! Turns free-text player input into illustrated story turns.
//!
//! ## Structure
//!
//! - `use_cases/` - Story orchestration (start, continue, transcript, parsing)
//! - `infrastructure/` - Port traits and their adapters (chat, render, storage)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod prompt_templates;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use app::App;
pub use config::EngineConfig;
