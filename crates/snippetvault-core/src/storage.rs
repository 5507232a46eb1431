use crate::config::{ensure_config_dir, DB_FILENAME};
use crate::error::{Result, VaultError};
use crate::models::{Snippet, SnippetDraft};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// JSON-file backed snippet store.
///
/// Every mutation is a full read-modify-write of the file, serialised by an
/// internal lock so a shared store can back concurrent request handlers.
#[derive(Debug)]
pub struct SnippetStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnippetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open the store in the configuration directory.
    pub fn open_default() -> Result<Self> {
        let dir = ensure_config_dir()?;
        Ok(Self::new(dir.join(DB_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Result<Vec<Snippet>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let content = fs::read_to_string(&self.path)?;

        // Handle empty database file
        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_str(&content).map_err(|e| e.into())
    }

    fn save(&self, snippets: &[Snippet]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let serialized = serde_json::to_string_pretty(snippets)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }

    /// Load all snippets
    pub fn list(&self) -> Result<Vec<Snippet>> {
        let _guard = self.guard();
        self.load()
    }

    /// Snippets that have been shared publicly
    pub fn list_public(&self) -> Result<Vec<Snippet>> {
        Ok(self.list()?.into_iter().filter(|s| s.is_public).collect())
    }

    pub fn get(&self, id: u64) -> Result<Snippet> {
        self.list()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(VaultError::SnippetNotFound(id))
    }

    /// Add a new snippet, assigning the next free id
    pub fn create(&self, draft: SnippetDraft) -> Result<Snippet> {
        draft.validate()?;

        let _guard = self.guard();
        let mut snippets = self.load()?;
        let id = snippets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let snippet = Snippet::from_draft(id, draft);
        snippets.push(snippet.clone());
        self.save(&snippets)?;

        tracing::info!(id, title = %snippet.title, "created snippet");
        Ok(snippet)
    }

    /// Replace a snippet's contents with `draft`
    pub fn update(&self, id: u64, draft: SnippetDraft) -> Result<Snippet> {
        draft.validate()?;
        self.edit(id, |snippet| {
            snippet.apply_draft(draft);
            Ok(())
        })
    }

    /// Apply `change` to one snippet and persist it. Nothing is written if
    /// `change` fails.
    pub fn edit<F>(&self, id: u64, change: F) -> Result<Snippet>
    where
        F: FnOnce(&mut Snippet) -> Result<()>,
    {
        let _guard = self.guard();
        let mut snippets = self.load()?;
        let snippet = snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(VaultError::SnippetNotFound(id))?;

        change(snippet)?;
        let updated = snippet.clone();
        self.save(&snippets)?;

        tracing::info!(id, "updated snippet");
        Ok(updated)
    }

    /// Delete a snippet by id
    pub fn delete(&self, id: u64) -> Result<()> {
        let _guard = self.guard();
        let mut snippets = self.load()?;
        let before = snippets.len();
        snippets.retain(|s| s.id != id);

        if snippets.len() == before {
            return Err(VaultError::SnippetNotFound(id));
        }

        self.save(&snippets)?;
        tracing::info!(id, "deleted snippet");
        Ok(())
    }
}
