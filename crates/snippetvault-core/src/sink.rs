//! Delivery of export output: the system clipboard, or a file on disk.

use crate::error::{Result, VaultError};
use arboard::Clipboard;
use std::fs;
use std::path::{Path, PathBuf};

/// Set the clipboard content as text
pub fn set_clipboard_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(|e| VaultError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| VaultError::Clipboard(e.to_string()))
}

/// Copy text to the clipboard, reporting failure as `false`.
pub fn copy_text(text: &str) -> bool {
    copy_with(text, set_clipboard_text)
}

fn copy_with(text: &str, set: impl FnOnce(&str) -> Result<()>) -> bool {
    match set(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

/// Write `blob` into `dir` under `filename`, creating `dir` if needed.
pub fn download_blob(blob: &[u8], dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
        return Err(VaultError::Other(format!(
            "Invalid download filename '{}'",
            filename
        )));
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(filename);
    fs::write(&path, blob)?;
    tracing::info!(path = %path.display(), bytes = blob.len(), "wrote download");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_reports_clipboard_failure_as_false() {
        let copied = copy_with("hello", |_| {
            Err(VaultError::Clipboard("no display".to_string()))
        });
        assert!(!copied);
    }

    #[test]
    fn copy_hands_the_text_to_the_clipboard() {
        let mut seen = String::new();
        assert!(copy_with("hello", |text| {
            seen.push_str(text);
            Ok(())
        }));
        assert_eq!(seen, "hello");
    }

    #[test]
    fn download_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out");

        let path = download_blob(b"bytes", &target, "demo.zip").unwrap();
        assert_eq!(path, target.join("demo.zip"));
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn download_rejects_path_like_filenames() {
        let dir = tempfile::tempdir().unwrap();
        assert!(download_blob(b"x", dir.path(), "../escape.txt").is_err());
        assert!(download_blob(b"x", dir.path(), "").is_err());
    }
}
