use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, VaultError};
use crate::language::language_for_filename;

/// Per-request values that override variable defaults for one export.
pub type ValueOverrides = HashMap<String, String>;

/// One file of a snippet. `filename` is a relative path where `/` separates folders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnippetFile {
    pub filename: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl SnippetFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let mut file = Self {
            filename: filename.into(),
            content: content.into(),
            language: None,
            order: 0,
        };
        file.detect_language();
        file
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Fill in the language from the extension when none was given.
    fn detect_language(&mut self) {
        if self.language.is_none() {
            self.language = language_for_filename(&self.filename).map(|l| l.tag().to_string());
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
            description: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Whether `name` can appear inside a `{{ name }}` placeholder.
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Payload used to create or replace a snippet.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SnippetDraft {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub files: Vec<SnippetFile>,
    pub variables: Vec<Variable>,
}

impl SnippetDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Reject variable names that could never match a placeholder.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(VaultError::Other("Snippet title cannot be empty".to_string()));
        }
        match self
            .variables
            .iter()
            .find(|v| !is_valid_variable_name(&v.name))
        {
            Some(bad) => Err(VaultError::InvalidVariableName(bad.name.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub files: Vec<SnippetFile>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    pub created_at: String,
    pub updated_at: String,
}

impl Snippet {
    pub fn from_draft(id: u64, mut draft: SnippetDraft) -> Self {
        let now = Local::now().to_rfc3339();
        draft.files.iter_mut().for_each(SnippetFile::detect_language);
        Self {
            id,
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            is_public: draft.is_public,
            files: draft.files,
            variables: draft.variables,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replace everything but the id and creation time.
    pub fn apply_draft(&mut self, mut draft: SnippetDraft) {
        draft.files.iter_mut().for_each(SnippetFile::detect_language);
        self.title = draft.title;
        self.description = draft.description;
        self.tags = draft.tags;
        self.is_public = draft.is_public;
        self.files = draft.files;
        self.variables = draft.variables;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Local::now().to_rfc3339();
    }

    /// Files in display order. Ties keep their stored order.
    pub fn ordered_files(&self) -> Vec<SnippetFile> {
        let mut files = self.files.clone();
        files.sort_by_key(|f| f.order);
        files
    }

    /// Append a file after the current last one. Duplicate filenames are allowed.
    pub fn add_file(&mut self, mut file: SnippetFile) {
        file.order = self.files.iter().map(|f| f.order).max().map_or(0, |max| max + 1);
        file.detect_language();
        self.files.push(file);
        self.touch();
    }

    /// Remove every file with this filename.
    pub fn remove_file(&mut self, filename: &str) -> Result<()> {
        let before = self.files.len();
        self.files.retain(|f| f.filename != filename);
        if self.files.len() == before {
            return Err(VaultError::FileNotFound(filename.to_string()));
        }
        self.touch();
        Ok(())
    }

    /// Insert a variable, or replace the one with the same name in place.
    pub fn set_variable(&mut self, variable: Variable) -> Result<()> {
        if !is_valid_variable_name(&variable.name) {
            return Err(VaultError::InvalidVariableName(variable.name));
        }
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
        self.touch();
        Ok(())
    }

    pub fn remove_variable(&mut self, name: &str) -> Result<()> {
        let before = self.variables.len();
        self.variables.retain(|v| v.name != name);
        if self.variables.len() == before {
            return Err(VaultError::VariableNotFound(name.to_string()));
        }
        self.touch();
        Ok(())
    }

    pub fn formatted_time(&self) -> String {
        let entry_time = DateTime::parse_from_rfc3339(&self.updated_at)
            .map(|dt| dt.with_timezone(&Local))
            .unwrap_or_else(|_| Local::now());

        let now = Local::now();
        let duration = now.signed_duration_since(entry_time);

        if duration.num_seconds() < 60 {
            format!("{}s ago", duration.num_seconds())
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            format!("{}d ago", duration.num_days())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet() -> Snippet {
        Snippet::from_draft(1, SnippetDraft::new("demo"))
    }

    #[test]
    fn add_file_appends_with_increasing_order_and_detects_language() {
        let mut s = snippet();
        s.add_file(SnippetFile::new("src/main.rs", "fn main() {}"));
        s.add_file(SnippetFile::new("README.md", "# hi"));

        assert_eq!(s.files[0].order, 0);
        assert_eq!(s.files[1].order, 1);
        assert_eq!(s.files[0].language.as_deref(), Some("rust"));
        assert_eq!(s.files[1].language.as_deref(), Some("markdown"));
    }

    #[test]
    fn ordered_files_sorts_by_order_and_keeps_ties_stable() {
        let mut s = snippet();
        s.files = vec![
            SnippetFile::new("c.txt", "").with_order(2),
            SnippetFile::new("a.txt", "").with_order(0),
            SnippetFile::new("b1.txt", "").with_order(1),
            SnippetFile::new("b2.txt", "").with_order(1),
        ];
        let names: Vec<_> = s.ordered_files().into_iter().map(|f| f.filename).collect();
        assert_eq!(names, ["a.txt", "b1.txt", "b2.txt", "c.txt"]);
    }

    #[test]
    fn set_variable_replaces_by_name() {
        let mut s = snippet();
        s.set_variable(Variable::new("NAME").with_default("a")).unwrap();
        s.set_variable(Variable::new("NAME").with_default("b")).unwrap();
        assert_eq!(s.variables.len(), 1);
        assert_eq!(s.variables[0].default_value.as_deref(), Some("b"));
    }

    #[test]
    fn set_variable_rejects_names_placeholders_cannot_match() {
        let mut s = snippet();
        let err = s.set_variable(Variable::new("my-var")).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVariableName(name) if name == "my-var"));
        assert!(s.variables.is_empty());
    }

    #[test]
    fn removing_missing_entries_reports_not_found() {
        let mut s = snippet();
        assert!(matches!(
            s.remove_file("nope.txt"),
            Err(VaultError::FileNotFound(_))
        ));
        assert!(matches!(
            s.remove_variable("NOPE"),
            Err(VaultError::VariableNotFound(_))
        ));
    }

    #[test]
    fn remove_file_drops_every_duplicate() {
        let mut s = snippet();
        s.add_file(SnippetFile::new("a.txt", "1"));
        s.add_file(SnippetFile::new("a.txt", "2"));
        s.add_file(SnippetFile::new("b.txt", "3"));
        s.remove_file("a.txt").unwrap();
        assert_eq!(s.files.len(), 1);
        assert_eq!(s.files[0].filename, "b.txt");
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let mut s = snippet();
        s.set_variable(Variable::new("X").with_default("d")).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["variables"][0]["defaultValue"], "d");
        assert_eq!(json["isPublic"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn draft_validation() {
        assert!(SnippetDraft::new("  ").validate().is_err());

        let mut draft = SnippetDraft::new("ok");
        draft.variables.push(Variable::new("fine_1"));
        assert!(draft.validate().is_ok());

        draft.variables.push(Variable::new("not ok"));
        assert!(matches!(
            draft.validate(),
            Err(VaultError::InvalidVariableName(_))
        ));
    }
}
