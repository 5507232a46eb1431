//! Turns a snippet's files into export output: one concatenated text blob, or
//! one rendered entry per file for archiving.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::archive::build_archive;
use crate::error::{Result, VaultError};
use crate::models::{Snippet, SnippetFile, ValueOverrides, Variable};
use crate::substitution::substitute_all;

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A file after substitution, ready for archiving or display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub filename: String,
    pub content: String,
}

impl RenderedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

impl<N: Into<String>, C: Into<String>> From<(N, C)> for RenderedFile {
    fn from((filename, content): (N, C)) -> Self {
        Self::new(filename, content)
    }
}

/// Banner placed above each file in concatenated output.
pub fn file_banner(filename: &str) -> String {
    format!("// ============ {} ============", filename)
}

/// Substitute each file independently, keeping the caller's order and every
/// filename as given (duplicates included).
pub fn format_files(
    files: &[SnippetFile],
    variables: &[Variable],
    values: &ValueOverrides,
) -> Vec<RenderedFile> {
    let contents = substitute_all(files.iter().map(|f| f.content.as_str()), variables, values);
    files
        .iter()
        .zip(contents)
        .map(|(file, content)| RenderedFile::new(file.filename.clone(), content))
        .collect()
}

/// Substitute every file and join them into one blob, each under its banner.
pub fn format_as_text(
    files: &[SnippetFile],
    variables: &[Variable],
    values: &ValueOverrides,
) -> String {
    format_files(files, variables, values)
        .iter()
        .map(|file| format!("{}\n\n{}", file_banner(&file.filename), file.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Zip,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Zip => "zip",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text => TEXT_CONTENT_TYPE,
            Self::Zip => ZIP_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "zip" => Ok(Self::Zip),
            other => Err(VaultError::Other(format!(
                "Unknown export format '{}' (supported: text, zip)",
                other
            ))),
        }
    }
}

/// Output of one export, ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Lowercase, dash-separated file stem derived from a snippet title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "snippet".to_string()
    } else {
        slug.to_string()
    }
}

/// Render a stored snippet in the requested format.
///
/// Files are taken in their display order. Only zip output can fail, and only
/// when the archive library does.
pub fn export_snippet(
    snippet: &Snippet,
    values: &ValueOverrides,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let files = snippet.ordered_files();
    let bytes = match format {
        ExportFormat::Text => format_as_text(&files, &snippet.variables, values).into_bytes(),
        ExportFormat::Zip => build_archive(&format_files(&files, &snippet.variables, values))?,
    };

    tracing::debug!(
        snippet = snippet.id,
        %format,
        files = files.len(),
        bytes = bytes.len(),
        "exported snippet"
    );

    Ok(ExportArtifact {
        filename: format!("{}.{}", slugify(&snippet.title), format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}
