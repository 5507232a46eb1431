//! Extension to language tag lookup used when files are added without an
//! explicit language.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    TypeScript,
    JavaScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Shell,
    Html,
    Css,
    Json,
    Yaml,
    Toml,
    Markdown,
    Sql,
    Dockerfile,
    Plaintext,
}

const EXTENSIONS: &[(&str, Language)] = &[
    ("rs", Language::Rust),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("js", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("py", Language::Python),
    ("go", Language::Go),
    ("java", Language::Java),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("hpp", Language::Cpp),
    ("cs", Language::CSharp),
    ("rb", Language::Ruby),
    ("php", Language::Php),
    ("sh", Language::Shell),
    ("bash", Language::Shell),
    ("zsh", Language::Shell),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("css", Language::Css),
    ("json", Language::Json),
    ("yml", Language::Yaml),
    ("yaml", Language::Yaml),
    ("toml", Language::Toml),
    ("md", Language::Markdown),
    ("sql", Language::Sql),
    ("txt", Language::Plaintext),
];

impl Language {
    /// Stable lowercase tag stored on files.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Go => "go",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Shell => "shell",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Markdown => "markdown",
            Self::Sql => "sql",
            Self::Dockerfile => "dockerfile",
            Self::Plaintext => "plaintext",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, lang)| *lang)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Guess the language of a (possibly nested) filename.
pub fn language_for_filename(filename: &str) -> Option<Language> {
    let base = filename.rsplit('/').next().unwrap_or(filename);

    if base.eq_ignore_ascii_case("dockerfile") {
        return Some(Language::Dockerfile);
    }

    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Language::from_extension(ext),
        _ => None,
    }
}
