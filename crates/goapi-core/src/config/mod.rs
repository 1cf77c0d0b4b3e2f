//! Project configuration types
//!
//! A `ProjectConfig` is the fully resolved set of user choices that the
//! generation engine consumes. It is assembled either by the interactive
//! wizard or from command-line flags.

pub mod project;

pub use project::{DatabaseConfig, DatabaseKind, Framework, ProjectConfig};
