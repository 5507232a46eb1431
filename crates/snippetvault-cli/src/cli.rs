use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use snippetvault_core::ExportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "snippetvault",
    author = "bahdotsh",
    version = env!("CARGO_PKG_VERSION"),
    about = "snippetvault - store, template and export multi-file code snippets",
    long_about = "snippetvault keeps multi-file code snippets with {{VARIABLE}} placeholders \
                  and exports them as text or zip archives with your values filled in."
)]
pub struct SnippetVault {
    /// Verbosity level (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub commands: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatChoice {
    Text,
    Zip,
}

impl From<FormatChoice> for ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Text => ExportFormat::Text,
            FormatChoice::Zip => ExportFormat::Zip,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty snippet
    Add {
        #[clap(long, short = 't', help = "Title of the snippet")]
        title: String,

        #[clap(long, short = 'd', help = "Short description")]
        description: Option<String>,

        #[clap(long = "tag", help = "Tag to attach (repeatable)")]
        tags: Vec<String>,

        #[clap(long, help = "Share the snippet publicly")]
        public: bool,
    },
    /// List stored snippets
    List {
        #[clap(long, help = "Only show public snippets")]
        public: bool,
    },
    /// Show a snippet with its files and variables
    Show { id: u64 },
    /// Change a snippet's title, description or visibility
    Update {
        id: u64,

        #[clap(long, short = 't', help = "New title")]
        title: Option<String>,

        #[clap(long, short = 'd', help = "New description")]
        description: Option<String>,

        #[clap(long, conflicts_with = "private", help = "Share the snippet publicly")]
        public: bool,

        #[clap(long, help = "Stop sharing the snippet")]
        private: bool,
    },
    /// Delete a snippet
    Delete { id: u64 },
    /// Add a file from disk to a snippet
    AddFile {
        id: u64,

        #[clap(help = "File to read the template content from")]
        path: PathBuf,

        #[clap(long, short, help = "Filename inside the snippet, may contain '/' folders")]
        name: Option<String>,

        #[clap(long, short, help = "Language tag (detected from the extension if omitted)")]
        language: Option<String>,
    },
    /// Remove every file with the given filename from a snippet
    RemoveFile { id: u64, filename: String },
    /// Declare or replace a template variable
    SetVar {
        id: u64,
        name: String,

        #[clap(long, short = 'd', help = "Default value")]
        default: Option<String>,

        #[clap(long, help = "What the variable is for")]
        description: Option<String>,
    },
    /// Remove a template variable
    RemoveVar { id: u64, name: String },
    /// List declared variables and any undeclared placeholders
    Vars { id: u64 },
    /// Render a snippet with variables filled in
    Export {
        id: u64,

        #[clap(
            long = "set",
            short = 's',
            value_name = "NAME=VALUE",
            help = "Override a variable (repeatable)"
        )]
        values: Vec<String>,

        #[clap(long, short, value_enum, default_value = "text", help = "Output format")]
        format: FormatChoice,

        #[clap(long, short, help = "Directory to write the export to")]
        output: Option<PathBuf>,

        #[clap(long, short, help = "Copy text output to the clipboard")]
        copy: bool,
    },
    /// Start the HTTP API server
    Serve {
        #[clap(long, short, help = "Port to listen on (default from settings, else 3000)")]
        port: Option<u16>,
    },
    /// Check if the API server is responsive
    ApiStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_collects_repeated_overrides() {
        let cli = SnippetVault::try_parse_from([
            "snippetvault",
            "export",
            "3",
            "--set",
            "NAME=app",
            "-s",
            "PORT=80",
            "--format",
            "zip",
        ])
        .unwrap();

        match cli.commands {
            Commands::Export {
                id, values, format, ..
            } => {
                assert_eq!(id, 3);
                assert_eq!(values, ["NAME=app", "PORT=80"]);
                assert_eq!(ExportFormat::from(format), ExportFormat::Zip);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn verbosity_is_global_and_counted() {
        let cli = SnippetVault::try_parse_from(["snippetvault", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn public_and_private_conflict() {
        let result =
            SnippetVault::try_parse_from(["snippetvault", "update", "1", "--public", "--private"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result =
            SnippetVault::try_parse_from(["snippetvault", "export", "1", "--format", "tar"]);
        assert!(result.is_err());
    }
}
