//! Template catalog access
//!
//! The catalog is a read-only, path-addressed store. Paths are relative and
//! slash-delimited, partitioned under `templates/` (rendered) and `static/`
//! (copied verbatim).

pub mod catalog;

pub use catalog::{DirCatalog, EmbeddedCatalog, MemoryCatalog, TemplateCatalog, TemplateSource};
