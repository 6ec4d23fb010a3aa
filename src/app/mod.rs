//! Application layer.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (SourceDocument, CompiledResult, Settings, Messages)
//! - `services/` - HTML work (validator, normalizer, preview, compiler)
//! - `infrastructure/` - External integrations (platform, logging, error)
//! - `state.rs` - Main application coordinator

pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use domain::{
    AppSettings, CompiledResult, FontChoice, Message, Severity, SourceDocument, ThemeMode,
    ValidationIssue,
};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
pub use services::compiler::Compiler;
pub use services::normalizer::{NormalizeOptions, OutputStyle};
pub use services::validator::ValidatorOptions;
