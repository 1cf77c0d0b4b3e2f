//! Template catalog compiled into the binary, backed by a local directory,
//! or held in memory

use crate::error::CatalogError;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};

/// Read-only source of template and static file content
pub trait TemplateCatalog: Send + Sync {
    /// Read the raw content stored at `path`
    fn read(&self, path: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Reject anything that could escape the catalog root
fn is_catalog_path(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Catalog rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open an existing catalog directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            anyhow::bail!("Template directory not found: {}", root.display());
        }

        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", root.display()))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateCatalog for DirCatalog {
    fn read(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        if !is_catalog_path(path) {
            return Err(CatalogError::NotFound {
                path: path.to_string(),
            });
        }

        let full_path = path
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment));

        std::fs::read(&full_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound {
                    path: path.to_string(),
                }
            } else {
                CatalogError::Read {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// Catalog compiled into the binary from a `RustEmbed` folder
pub struct EmbeddedCatalog<E> {
    assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedCatalog<E> {
    pub fn new() -> Self {
        Self { assets: PhantomData }
    }
}

impl<E: RustEmbed> Default for EmbeddedCatalog<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> TemplateCatalog for EmbeddedCatalog<E> {
    fn read(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        is_catalog_path(path)
            .then(|| E::get(path))
            .flatten()
            .map(|file| file.data.into_owned())
            .ok_or_else(|| CatalogError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Where a run reads its templates from
pub enum TemplateSource<E> {
    /// A directory given on the command line or through the environment
    Local(DirCatalog),
    /// The catalog bundled with the binary
    Embedded(EmbeddedCatalog<E>),
}

impl<E: RustEmbed> TemplateSource<E> {
    /// Use `template_dir`, then the product's environment override, then
    /// the bundled catalog
    pub fn from_config<C>(config: &C, template_dir: Option<PathBuf>) -> Result<Self>
    where
        C: ProductConfig<Templates = E>,
    {
        let local = template_dir
            .or_else(|| std::env::var_os(config.template_dir_env()).map(PathBuf::from));

        match local {
            Some(root) => {
                let catalog = DirCatalog::open(root)?;
                tracing::debug!(root = %catalog.root().display(), "using local template catalog");
                Ok(Self::Local(catalog))
            }
            None => {
                tracing::debug!("using bundled template catalog");
                Ok(Self::Embedded(EmbeddedCatalog::new()))
            }
        }
    }

    /// Root directory when reading from disk
    pub fn local_root(&self) -> Option<&Path> {
        match self {
            Self::Local(catalog) => Some(catalog.root()),
            Self::Embedded(_) => None,
        }
    }
}

impl<E: RustEmbed> TemplateCatalog for TemplateSource<E> {
    fn read(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        match self {
            Self::Local(catalog) => catalog.read(path),
            Self::Embedded(catalog) => catalog.read(path),
        }
    }
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style variant of [`MemoryCatalog::insert`]
    pub fn with(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl TemplateCatalog for MemoryCatalog {
    fn read(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::runtime::{fly_tool, ToolManager};

    #[derive(RustEmbed)]
    #[folder = "$CARGO_MANIFEST_DIR/../../templates/go-api/"]
    struct Bundled;

    #[derive(Clone)]
    struct BundledProduct;

    impl ProductConfig for BundledProduct {
        type Templates = Bundled;

        fn name(&self) -> &'static str {
            "bundled"
        }
        fn display_name(&self) -> &'static str {
            "Bundled"
        }
        fn cli_description(&self) -> &'static str {
            "bundled catalog"
        }
        fn template_dir_env(&self) -> &'static str {
            "GOAPI_CATALOG_TEST_UNSET_DIR"
        }
        fn default_project_name(&self) -> &'static str {
            "my-api"
        }
        fn module_prefix(&self) -> &'static str {
            "github.com/user"
        }
        fn deploy_tool(&self) -> ToolManager {
            fly_tool()
        }
        fn next_steps(&self, _config: &ProjectConfig) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_dir_catalog_reads_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static/internal")).unwrap();
        std::fs::write(dir.path().join("static/internal/a.go"), "package a\n").unwrap();

        let catalog = DirCatalog::new(dir.path());
        let content = catalog.read("static/internal/a.go").unwrap();
        assert_eq!(content, b"package a\n");
    }

    #[test]
    fn test_dir_catalog_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirCatalog::new(dir.path());

        let err = catalog.read("templates/missing.tmpl").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert_eq!(err.path(), "templates/missing.tmpl");
    }

    #[test]
    fn test_dir_catalog_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirCatalog::new(dir.path().join("root"));

        for path in ["../secret", "/etc/passwd", "static/../../x", ""] {
            let err = catalog.read(path).unwrap_err();
            assert!(matches!(err, CatalogError::NotFound { .. }), "{path}");
        }
    }

    #[test]
    fn test_dir_catalog_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static/dir")).unwrap();
        let catalog = DirCatalog::new(dir.path());

        let err = catalog.read("static/dir").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_memory_catalog() {
        let catalog = MemoryCatalog::new().with("static/.gitignore", "bin/\n");
        assert_eq!(catalog.read("static/.gitignore").unwrap(), b"bin/\n");
        assert!(catalog.read("static/.dockerignore").is_err());
    }

    #[test]
    fn test_embedded_catalog_reads_bundled_files() {
        let catalog = EmbeddedCatalog::<Bundled>::new();

        let go_mod = String::from_utf8(catalog.read("templates/base/go.mod.tmpl").unwrap()).unwrap();
        assert!(go_mod.contains("module"));
        assert!(!catalog.read("static/.gitignore").unwrap().is_empty());

        for path in ["templates/missing.tmpl", "../Cargo.toml", ""] {
            let err = catalog.read(path).unwrap_err();
            assert!(matches!(err, CatalogError::NotFound { .. }), "{path}");
        }
    }

    #[test]
    fn test_template_source_defaults_to_bundled() {
        let source = TemplateSource::from_config(&BundledProduct, None).unwrap();
        assert!(matches!(source, TemplateSource::Embedded(_)));
        assert_eq!(source.local_root(), None);
        assert!(source.read("templates/base/go.mod.tmpl").is_ok());
    }

    #[test]
    fn test_template_source_prefers_explicit_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/.gitignore"), "local/\n").unwrap();

        let source = TemplateSource::from_config(&BundledProduct, Some(dir.path().to_path_buf())).unwrap();
        assert!(source.local_root().is_some());
        assert_eq!(source.read("static/.gitignore").unwrap(), b"local/\n");
        assert!(source.read("templates/base/go.mod.tmpl").is_err());
    }

    #[test]
    fn test_template_source_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = TemplateSource::from_config(&BundledProduct, Some(missing));
        let err = result.err().unwrap().to_string();
        assert!(err.contains("Template directory not found"), "{err}");
    }
}
