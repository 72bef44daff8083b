// State management module
// Handles the immutable state shared by request handlers

pub mod app_state;

pub use app_state::AppState;
