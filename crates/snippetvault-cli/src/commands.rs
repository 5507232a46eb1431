use crate::cli::Commands;
use crate::utils::{parse_values, print_snippet_details, print_snippet_line};
use snippetvault_core::{
    copy_text, download_blob, export_snippet, undeclared_placeholders, ExportFormat, Result,
    Settings, SnippetDraft, SnippetFile, SnippetStore, VaultError, Variable,
};
use snippetvault_server::server::http_server::check_api_server_health;
use snippetvault_server::server::start_api_server;
use snippetvault_server::server::utils::port_is_available;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn handle_command(
    store: Arc<SnippetStore>,
    settings: &Settings,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            tags,
            public,
        } => {
            let mut draft = SnippetDraft::new(title);
            draft.description = description;
            draft.tags = tags;
            draft.is_public = public;
            let snippet = store.create(draft)?;
            println!("Snippet #{} created", snippet.id);
            Ok(())
        }
        Commands::List { public } => handle_list(&store, public),
        Commands::Show { id } => {
            print_snippet_details(&store.get(id)?);
            Ok(())
        }
        Commands::Update {
            id,
            title,
            description,
            public,
            private,
        } => {
            store.edit(id, |snippet| {
                if let Some(title) = title {
                    if title.trim().is_empty() {
                        return Err(VaultError::Other("Snippet title cannot be empty".to_string()));
                    }
                    snippet.title = title;
                }
                if description.is_some() {
                    snippet.description = description;
                }
                if public || private {
                    snippet.is_public = public;
                }
                snippet.touch();
                Ok(())
            })?;
            println!("Snippet #{} updated", id);
            Ok(())
        }
        Commands::Delete { id } => {
            store.delete(id).map(|_| println!("Snippet #{} deleted", id))
        }
        Commands::AddFile {
            id,
            path,
            name,
            language,
        } => handle_add_file(&store, id, &path, name, language),
        Commands::RemoveFile { id, filename } => store
            .edit(id, |snippet| snippet.remove_file(&filename))
            .map(|_| println!("Removed '{}' from snippet #{}", filename, id)),
        Commands::SetVar {
            id,
            name,
            default,
            description,
        } => {
            let variable = Variable {
                name: name.clone(),
                default_value: default,
                description,
            };
            store
                .edit(id, |snippet| snippet.set_variable(variable))
                .map(|_| println!("Variable '{}' set on snippet #{}", name, id))
        }
        Commands::RemoveVar { id, name } => store
            .edit(id, |snippet| snippet.remove_variable(&name))
            .map(|_| println!("Variable '{}' removed from snippet #{}", name, id)),
        Commands::Vars { id } => handle_vars(&store, id),
        Commands::Export {
            id,
            values,
            format,
            output,
            copy,
        } => {
            let destination = output.or_else(|| settings.export_dir.clone());
            handle_export(&store, id, &values, format.into(), destination, copy)
        }
        Commands::Serve { port } => handle_serve_command(store, port.unwrap_or(settings.api_port)),
        Commands::ApiStatus => {
            let port = check_api_server_health()?;
            println!("API server is running on http://localhost:{}", port);
            Ok(())
        }
    }
}

fn handle_list(store: &SnippetStore, public_only: bool) -> Result<()> {
    let snippets = if public_only {
        store.list_public()?
    } else {
        store.list()?
    };

    if snippets.is_empty() {
        println!("No snippets yet. Create one with: snippetvault add --title <TITLE>");
        return Ok(());
    }

    for snippet in &snippets {
        print_snippet_line(snippet);
    }
    Ok(())
}

pub fn handle_add_file(
    store: &SnippetStore,
    id: u64,
    path: &Path,
    name: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let filename = match name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                VaultError::Other(format!("Cannot derive a filename from {}", path.display()))
            })?,
    };

    let mut file = SnippetFile::new(filename.clone(), content);
    if language.is_some() {
        file.language = language;
    }

    store.edit(id, |snippet| {
        snippet.add_file(file);
        Ok(())
    })?;
    println!("Added '{}' to snippet #{}", filename, id);
    Ok(())
}

fn handle_vars(store: &SnippetStore, id: u64) -> Result<()> {
    let snippet = store.get(id)?;

    if snippet.variables.is_empty() {
        println!("No variables declared.");
    }
    for variable in &snippet.variables {
        println!(
            "{:<20} default: {:<20} {}",
            variable.name,
            variable.default_value.as_deref().unwrap_or("(none)"),
            variable.description.as_deref().unwrap_or("")
        );
    }

    let undeclared = undeclared_placeholders(&snippet.files, &snippet.variables);
    if !undeclared.is_empty() {
        println!(
            "\nUndeclared placeholders (left as-is on export): {}",
            undeclared.join(", ")
        );
    }
    Ok(())
}

/// Export a snippet to the clipboard, a file, or stdout.
pub fn handle_export(
    store: &SnippetStore,
    id: u64,
    raw_values: &[String],
    format: ExportFormat,
    output: Option<PathBuf>,
    copy: bool,
) -> Result<()> {
    let values = parse_values(raw_values)?;
    let snippet = store.get(id)?;
    let artifact = export_snippet(&snippet, &values, format)?;

    match format {
        ExportFormat::Text => {
            let text = String::from_utf8_lossy(&artifact.bytes);
            let mut delivered = false;

            if copy {
                if copy_text(&text) {
                    println!("Copied snippet #{} to the clipboard", id);
                    delivered = true;
                } else {
                    eprintln!("Could not copy to the clipboard");
                }
            }
            if let Some(dir) = output {
                let path = download_blob(&artifact.bytes, &dir, &artifact.filename)?;
                println!("Exported to {}", path.display());
                delivered = true;
            }
            if !delivered {
                println!("{}", text);
            }
        }
        ExportFormat::Zip => {
            if copy {
                eprintln!("--copy only applies to text exports");
            }
            let dir = output.unwrap_or_else(|| PathBuf::from("."));
            let path = download_blob(&artifact.bytes, &dir, &artifact.filename)?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

fn handle_serve_command(store: Arc<SnippetStore>, port: u16) -> Result<()> {
    if !port_is_available(port) {
        return Err(VaultError::Other(format!("Port {} is already in use", port)));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        println!("Starting SnippetVault API server on port {}...", port);
        start_api_server(store, port).await
    })
}
