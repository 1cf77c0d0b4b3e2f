//! Project generation engine
//!
//! This module provides:
//! - The declarative rule table and planner (`rules`)
//! - AWS to Fly.io region mapping (`region`)
//! - Template rendering and placeholder substitution (`render`)
//! - Output file writing (`writer`)
//!
//! A [`Generator`] runs plan, render and write for one configuration and
//! stops at the first error. It is not safe to run two generators against
//! the same output directory at once.

pub mod region;
pub mod render;
pub mod rules;
pub mod writer;

use crate::config::ProjectConfig;
use crate::error::GenerateError;
use crate::templates::TemplateCatalog;
use std::path::PathBuf;
use std::sync::Arc;

pub use region::{fly_region, DEFAULT_FLY_REGION};
pub use render::{Placeholders, RenderContext, Renderer};
pub use rules::{plan, ContentKind, FileMapping, GenerationRule, Selector, RULES};
pub use writer::FileWriter;

/// Result of a successful generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Output paths in the order they were written
    pub files: Vec<String>,
}

/// Generates one project from a catalog
pub struct Generator<K: TemplateCatalog> {
    config: ProjectConfig,
    catalog: Arc<K>,
    renderer: Renderer,
    writer: FileWriter,
}

impl<K: TemplateCatalog> Generator<K> {
    pub fn new(config: ProjectConfig, catalog: Arc<K>) -> Self {
        let writer = FileWriter::new(config.output_dir.clone());
        Self {
            config,
            catalog,
            renderer: Renderer::new(),
            writer,
        }
    }

    /// Generate the complete project structure
    pub async fn generate(&self) -> Result<GenerationReport, GenerateError> {
        tracing::info!(
            project = %self.config.project_name,
            output = %self.config.output_dir.display(),
            database = self.config.database.kind.as_str(),
            framework = self.config.framework.as_str(),
            deploy = self.config.deploy_enabled,
            "generating project"
        );

        self.writer.create_dir("").await?;
        for dir in rules::directories(&self.config) {
            self.writer.create_dir(dir).await?;
        }

        let context = RenderContext::from_config(&self.config);
        let placeholders = Placeholders::from_config(&self.config);
        let mut files = Vec::new();

        for mapping in rules::plan(&self.config) {
            let raw = self.catalog.read(mapping.source)?;
            let content = self
                .renderer
                .render(&mapping, raw, &context, &placeholders)?;
            self.writer.write(mapping.output, &content).await?;

            tracing::debug!(output = mapping.output, source = mapping.source, "wrote file");
            files.push(mapping.output.to_string());
        }

        tracing::info!(files = files.len(), "project generated");

        Ok(GenerationReport {
            output_dir: self.config.output_dir.clone(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, Framework};
    use crate::error::CatalogError;
    use crate::templates::MemoryCatalog;

    fn config(output_dir: PathBuf) -> ProjectConfig {
        ProjectConfig {
            project_name: "orders".to_string(),
            module_path: "example.com/team/orders".to_string(),
            output_dir,
            database: DatabaseConfig::postgres(),
            framework: Framework::Chi,
            deploy_enabled: false,
        }
    }

    fn full_catalog(config: &ProjectConfig) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        for mapping in plan(config) {
            catalog.insert(mapping.source, format!("// {}\n", mapping.output));
        }
        catalog
    }

    #[tokio::test]
    async fn test_generate_writes_every_planned_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path().join("orders"));
        let catalog = Arc::new(full_catalog(&cfg));

        let report = Generator::new(cfg.clone(), catalog).generate().await.unwrap();

        let expected: Vec<String> = plan(&cfg).iter().map(|f| f.output.to_string()).collect();
        assert_eq!(report.files, expected);
        for file in &report.files {
            assert!(cfg.output_dir.join(file).is_file(), "{file}");
        }
        assert!(cfg.output_dir.join("internal/metrics").is_dir());
        assert!(cfg.output_dir.join("migrations").is_dir());
    }

    #[tokio::test]
    async fn test_missing_template_aborts_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path().join("orders"));
        let catalog = Arc::new(MemoryCatalog::new());

        let err = Generator::new(cfg, catalog).generate().await.unwrap_err();
        match err {
            GenerateError::Catalog(CatalogError::NotFound { path }) => {
                assert_eq!(path, "templates/base/go.mod.tmpl")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
