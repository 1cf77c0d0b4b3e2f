//! Error types for scaffolding
//!
//! Validation errors keep the wizard on its current step. Catalog, render
//! and write errors abort a generation run. Deploy errors are reported as
//! an annotation on an otherwise successful run.

use std::path::PathBuf;
use thiserror::Error;

/// A required wizard field was left empty
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
}

/// Failure reading content from the template catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("template not found: {path}")]
    NotFound { path: String },

    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Catalog path the error refers to
    pub fn path(&self) -> &str {
        match self {
            CatalogError::NotFound { path } | CatalogError::Read { path, .. } => path,
        }
    }
}

/// Failure of a generation run; the run stops at the first one
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to render template {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("template {path} is not valid UTF-8")]
    InvalidUtf8 { path: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of the deployment unit of work
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("{candidates} not found. Please install from {docs_url}")]
    ToolNotFound {
        candidates: String,
        docs_url: String,
    },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// `output` holds stdout and stderr lines in arrival order
    #[error("deployment failed ({status})\nOutput: {output}")]
    Failed { status: String, output: String },
}

impl DeployError {
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, DeployError::ToolNotFound { .. })
    }
}
