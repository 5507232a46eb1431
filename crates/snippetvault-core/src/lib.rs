//! SnippetVault core: multi-file snippets with `{{VARIABLE}}` templating.
//!
//! Files and variables are substituted by [`substitution`], rendered to a
//! single text blob or per-file entries by [`export`], packed into a zip by
//! [`archive`], and delivered by [`sink`]. [`storage`] keeps snippets in a
//! JSON file under the configuration directory.

pub mod archive;
pub mod config;
pub mod error;
pub mod export;
pub mod language;
pub mod models;
pub mod sink;
pub mod storage;
pub mod substitution;

// Re-export common items for convenience
pub use archive::build_archive;
pub use config::{get_config_dir, load_settings, Settings};
pub use error::{Result, VaultError};
pub use export::{
    export_snippet, format_as_text, format_files, ExportArtifact, ExportFormat, RenderedFile,
};
pub use language::{language_for_filename, Language};
pub use models::{Snippet, SnippetDraft, SnippetFile, ValueOverrides, Variable};
pub use sink::{copy_text, download_blob};
pub use storage::SnippetStore;
pub use substitution::{find_placeholders, substitute, undeclared_placeholders};
