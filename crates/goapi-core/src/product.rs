//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements to configure the
//! scaffolding behavior: identity, the bundled template catalog, the
//! values the wizard suggests, and which deploy tool to drive.

use crate::config::ProjectConfig;
use crate::runtime::ToolManager;
use rust_embed::RustEmbed;

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Catalog bundled into the binary, used unless a directory is given
    type Templates: RustEmbed + 'static;

    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Environment variable name for overriding the catalog root
    fn template_dir_env(&self) -> &'static str;

    /// Project name the wizard pre-fills
    fn default_project_name(&self) -> &'static str;

    /// Prefix joined with the project name to suggest a module path
    fn module_prefix(&self) -> &'static str;

    /// External tool used to deploy a generated project
    fn deploy_tool(&self) -> ToolManager;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, config: &ProjectConfig) -> Vec<String>;

    /// Suggested module path for a project name
    fn suggested_module_path(&self, project_name: &str) -> String {
        format!("{}/{}", self.module_prefix(), project_name)
    }
}
