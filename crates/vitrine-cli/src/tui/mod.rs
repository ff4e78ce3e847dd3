//! Terminal User Interface for Vitrine

pub mod app;
pub mod catalog;
pub mod render;
pub mod utils;

// Re-exports
pub use app::App;
