// Page Builder - page tree, typed sections and media lifecycle

// Core types and primitives
pub mod core;

// Domain models and section content
pub mod content;
pub mod models;

// Storage, uploads and id generation
pub mod infrastructure;

// Page, section and asset operations
pub mod services;

// HTTP surface
pub mod api;
pub mod app_state;

// Common utilities
pub mod config;
pub mod error;
pub mod data_seeder;

// Re-exports for convenience
pub use error::{AppError, AppResult};
