//! Domain layer for Codestyle Guardian
//!
//! CDD Principle: Domain Model - Pure business logic for reactor structure enforcement
//! - Contains the project model handed over by the host build and the violation entities
//! - Independent of infrastructure concerns like file systems or build tool plugin APIs
//! - Expresses the ubiquitous language of projects, dependencies and rule violations

pub mod project;
pub mod violations;

// Re-export main domain types for convenience
pub use project::*;
pub use violations::*;
