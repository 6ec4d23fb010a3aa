//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - SourceDocument and CompiledResult
//! - ValidationIssue and Severity
//! - Application settings
//! - Message types for the event system

pub mod issue;
pub mod messages;
pub mod settings;
pub mod source;

pub use issue::{Severity, ValidationIssue};
pub use messages::Message;
pub use settings::{AppSettings, FontChoice, ThemeMode};
pub use source::{CompiledResult, SourceDocument};
