//! Domain layer for Nameguard
//!
//! CDD Principle: Domain Model - Pure business logic for naming-convention enforcement
//! - Contains the core entities and value objects: violations, reports, errors
//! - Independent of infrastructure concerns like file systems or output formats
//! - Expresses the ubiquitous language of naming policies and diagnostics

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
