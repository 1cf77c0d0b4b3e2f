//! goapi-core - Shared library for scaffolding Go API services
//!
//! This library turns a handful of answers (project name, module path,
//! database, framework, deployment) into a complete Go service tree by
//! selecting files from a template catalog, rendering them and writing the
//! result. A binary supplies product identity through [`ProductConfig`].
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - catalog access, the rule engine,
//!   rendering and placeholder substitution, file writing, region mapping,
//!   AWS profile lookup and the deploy tool invoker
//! - **Layer 2: Workflow** - the [`wizard`] state machine that collects a
//!   [`ProjectConfig`] step by step and requests effects as commands
//! - **Layer 3: Terminal Interface** - the ratatui wizard front-end and the
//!   cliclack non-interactive path (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the terminal front-ends
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use goapi_core::{DirCatalog, Generator, ProjectConfig};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(DirCatalog::new("templates/go-api"));
//! let report = Generator::new(config, catalog).generate().await?;
//! println!("wrote {} files", report.files.len());
//! ```

pub mod aws;
pub mod config;
pub mod error;
pub mod generator;
pub mod product;
pub mod runtime;
pub mod templates;
pub mod wizard;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use aws::{AwsCredentials, AwsProfiles, SharedConfigFiles};
pub use config::{DatabaseConfig, DatabaseKind, Framework, ProjectConfig};
pub use error::{CatalogError, DeployError, GenerateError, ValidationError};
pub use generator::{plan, GenerationReport, Generator};
pub use product::ProductConfig;
pub use runtime::{fly_tool, ToolManager};
pub use templates::{DirCatalog, EmbeddedCatalog, MemoryCatalog, TemplateCatalog, TemplateSource};
pub use wizard::{Wizard, WizardDefaults};

#[cfg(feature = "tui")]
pub use tui::{run_create, run_wizard, CreateArgs};
