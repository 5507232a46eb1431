use snippetvault_core::{Result, Snippet, ValueOverrides, VaultError};

/// Parse one `NAME=value` override. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(VaultError::InvalidAssignment(raw.to_string())),
    }
}

/// Collect `--set` arguments into overrides. Later assignments win.
pub fn parse_values(raw: &[String]) -> Result<ValueOverrides> {
    raw.iter().map(|item| parse_assignment(item)).collect()
}

pub fn print_snippet_line(snippet: &Snippet) {
    let visibility = if snippet.is_public { "public" } else { "private" };
    println!(
        "{:>4}  {:>7}  {:<7}  {} ({} files)",
        snippet.id,
        snippet.formatted_time(),
        visibility,
        snippet.title,
        snippet.files.len()
    );
}

pub fn print_snippet_details(snippet: &Snippet) {
    println!("#{} {}", snippet.id, snippet.title);
    if let Some(description) = &snippet.description {
        println!("{}", description);
    }
    if !snippet.tags.is_empty() {
        println!("tags: {}", snippet.tags.join(", "));
    }
    println!(
        "visibility: {}  updated: {}",
        if snippet.is_public { "public" } else { "private" },
        snippet.formatted_time()
    );

    println!("\nfiles:");
    for file in snippet.ordered_files() {
        println!(
            "  {:<40} {}",
            file.filename,
            file.language.as_deref().unwrap_or("-")
        );
    }

    println!("\nvariables:");
    for variable in &snippet.variables {
        println!(
            "  {:<20} default: {:<20} {}",
            variable.name,
            variable.default_value.as_deref().unwrap_or("(none)"),
            variable.description.as_deref().unwrap_or("")
        );
    }
}
