//! Template rendering and placeholder substitution
//!
//! Renderable sources go through Handlebars first. Every emitted file,
//! rendered or verbatim, then goes through the same substitution pass.

use super::region::{fly_region, DEFAULT_FLY_REGION};
use super::rules::{ContentKind, FileMapping};
use crate::config::{Framework, ProjectConfig};
use crate::error::GenerateError;
use handlebars::Handlebars;
use regex::{Captures, Regex};
use serde::Serialize;

/// Module path used by templates for the generated project's imports
pub const PLACEHOLDER_MODULE_PATH: &str = "github.com/acme/postservice";

/// Module path the static Go sources are written against
pub const STATIC_MODULE_PATH: &str = "github.com/andrewho/create-go-api/internal/generator/static";

/// Project name used throughout the catalog
pub const PLACEHOLDER_PROJECT_NAME: &str = "postservice";

/// Sub-paths of [`STATIC_MODULE_PATH`] rewritten under the user's module
const STATIC_SUB_PATHS: &[&str] = &["/internal/protos/gen", "/internal", "/protos"];

/// Lines that keep catalog Go files out of the generator's own build
const EXCLUSION_MARKERS: &[&str] = &["//go:build ignore\n", "// +build ignore\n"];

/// Values exposed to templates; built once per generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub project_name: String,
    pub module_path: String,
    pub database: &'static str,
    pub aws_access_key_id: String,
    pub aws_secret_key: String,
    pub aws_region: String,
    pub framework: &'static str,
    pub has_postgres: bool,
    pub has_dynamodb: bool,
    pub has_chi: bool,
    pub has_connect_rpc: bool,
    pub has_grpc: bool,
    pub deploy: bool,
    pub fly_region: &'static str,
}

impl RenderContext {
    pub fn from_config(config: &ProjectConfig) -> Self {
        let fly_region = if config.is_dynamodb() && !config.database.aws_region.is_empty() {
            fly_region(&config.database.aws_region)
        } else {
            DEFAULT_FLY_REGION
        };
        let has_connect_rpc = config.framework == Framework::ConnectRpc;

        Self {
            project_name: config.project_name.clone(),
            module_path: config.module_path.clone(),
            database: config.database.kind.as_str(),
            aws_access_key_id: config.database.aws_access_key_id.clone(),
            aws_secret_key: config.database.aws_secret_key.clone(),
            aws_region: config.database.aws_region.clone(),
            framework: config.framework.as_str(),
            has_postgres: config.is_postgres(),
            has_dynamodb: config.is_dynamodb(),
            has_chi: config.framework == Framework::Chi,
            has_connect_rpc,
            has_grpc: has_connect_rpc,
            deploy: config.deploy_enabled,
            fly_region,
        }
    }
}

/// Literal placeholder replacement performed in a single pass
///
/// Patterns are tried longest first at each position, and replacement text
/// is never rescanned, so a user value that happens to contain a
/// placeholder is left alone.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pattern: Regex,
    replacements: Vec<(String, String)>,
}

impl Placeholders {
    pub fn new(module_path: &str, project_name: &str) -> Self {
        let mut replacements: Vec<(String, String)> = STATIC_SUB_PATHS
            .iter()
            .map(|sub| (format!("{STATIC_MODULE_PATH}{sub}"), format!("{module_path}{sub}")))
            .collect();
        replacements.push((STATIC_MODULE_PATH.to_string(), module_path.to_string()));
        replacements.push((PLACEHOLDER_MODULE_PATH.to_string(), module_path.to_string()));
        replacements.push((PLACEHOLDER_PROJECT_NAME.to_string(), project_name.to_string()));

        // Most specific first: regex alternation prefers earlier branches.
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let alternation = replacements
            .iter()
            .map(|(from, _)| regex::escape(from))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).expect("escaped literals form a valid regex");

        Self {
            pattern,
            replacements,
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(&config.module_path, &config.project_name)
    }

    /// Substitute placeholders; Go sources also lose their exclusion markers
    pub fn apply(&self, source_path: &str, content: &str) -> String {
        let mut out = self
            .pattern
            .replace_all(content, |caps: &Captures| {
                let matched = &caps[0];
                self.replacements
                    .iter()
                    .find(|(from, _)| from == matched)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned();

        if is_go_source(source_path) {
            out = strip_exclusion_markers(&out);
        }

        out
    }
}

fn is_go_source(source_path: &str) -> bool {
    source_path.contains(".go")
}

fn strip_exclusion_markers(content: &str) -> String {
    let mut out = content.to_string();
    for marker in EXCLUSION_MARKERS {
        out = out.replace(marker, "");
    }
    match out.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Turns raw catalog content into output file content
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Generated files are code, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        Self { handlebars }
    }

    /// Produce the final bytes for `mapping`
    ///
    /// Verbatim content that is not UTF-8 is passed through untouched.
    pub fn render(
        &self,
        mapping: &FileMapping,
        raw: Vec<u8>,
        context: &RenderContext,
        placeholders: &Placeholders,
    ) -> Result<Vec<u8>, GenerateError> {
        let text = match (mapping.kind(), String::from_utf8(raw)) {
            (ContentKind::Render, Ok(template)) => self
                .handlebars
                .render_template(&template, context)
                .map_err(|source| GenerateError::Render {
                    path: mapping.source.to_string(),
                    source: Box::new(source),
                })?,
            (ContentKind::Render, Err(_)) => {
                return Err(GenerateError::InvalidUtf8 {
                    path: mapping.source.to_string(),
                })
            }
            (ContentKind::Verbatim, Ok(text)) => text,
            (ContentKind::Verbatim, Err(err)) => return Ok(err.into_bytes()),
        };

        Ok(placeholders.apply(mapping.source, &text).into_bytes())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
