//! Document Insights Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod routing;
pub mod services;
/// Application state management
///
/// Holds the configuration, the upstream model and the ingestion pipeline.
pub mod state;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
