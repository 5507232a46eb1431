//! `{{ NAME }}` placeholder substitution.
//!
//! Substitution is a single left-to-right scan over the template: each
//! placeholder is resolved once against the declared variables, and the
//! inserted text is never scanned again. A value that itself contains
//! `{{OTHER}}` therefore comes out literally, whatever order the variables
//! were declared in.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{is_valid_variable_name, SnippetFile, ValueOverrides, Variable};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("valid placeholder regex")
});

/// The value a variable takes for one export: a non-empty override, else the
/// default, else the empty string.
pub fn effective_value<'a>(variable: &'a Variable, values: &'a ValueOverrides) -> &'a str {
    match values.get(&variable.name) {
        Some(value) if !value.is_empty() => value.as_str(),
        _ => variable.default_value.as_deref().unwrap_or(""),
    }
}

/// Resolve every declared variable once. The first declaration of a name wins.
fn resolve<'a>(variables: &'a [Variable], values: &'a ValueOverrides) -> HashMap<&'a str, &'a str> {
    let mut resolved = HashMap::with_capacity(variables.len());
    for variable in variables {
        resolved
            .entry(variable.name.as_str())
            .or_insert_with(|| effective_value(variable, values));
    }
    resolved
}

fn substitute_resolved(content: &str, resolved: &HashMap<&str, &str>) -> String {
    if resolved.is_empty() {
        return content.to_string();
    }

    PLACEHOLDER_RE
        .replace_all(content, |caps: &Captures| {
            match resolved.get(caps[1].trim()) {
                Some(value) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Replace every placeholder for a declared variable with its effective value.
///
/// Placeholders for undeclared names, stray braces and empty content all pass
/// through untouched.
pub fn substitute(content: &str, variables: &[Variable], values: &ValueOverrides) -> String {
    substitute_resolved(content, &resolve(variables, values))
}

/// Substitute many templates against the same variables, resolving values once.
pub fn substitute_all<'c, I>(
    contents: I,
    variables: &[Variable],
    values: &ValueOverrides,
) -> Vec<String>
where
    I: IntoIterator<Item = &'c str>,
{
    let resolved = resolve(variables, values);
    contents
        .into_iter()
        .map(|content| substitute_resolved(content, &resolved))
        .collect()
}

/// Distinct placeholder names in `content`, in the order they first appear.
pub fn find_placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(content) {
        let name = caps[1].trim();
        if is_valid_variable_name(name) && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholder names used across `files` that no variable declares.
pub fn undeclared_placeholders(files: &[SnippetFile], variables: &[Variable]) -> Vec<String> {
    let mut undeclared: Vec<String> = Vec::new();
    for file in files {
        for name in find_placeholders(&file.content) {
            let declared = variables.iter().any(|v| v.name == name);
            if !declared && !undeclared.contains(&name) {
                undeclared.push(name);
            }
        }
    }
    undeclared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> ValueOverrides {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_replaces_every_occurrence_and_nothing_else() {
        let vars = [Variable::new("NAME").with_default("world")];
        let out = substitute("hi {{NAME}}, bye {{NAME}}!", &vars, &ValueOverrides::new());
        assert_eq!(out, "hi world, bye world!");
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let vars = [Variable::new("NAME").with_default("v")];
        assert_eq!(substitute("{{ NAME }}", &vars, &ValueOverrides::new()), "v");
        assert_eq!(substitute("{{\tNAME\n}}", &vars, &ValueOverrides::new()), "v");
    }

    #[test]
    fn undeclared_placeholders_are_left_as_is() {
        let vars = [Variable::new("A").with_default("1")];
        let out = substitute("{{A}} {{X}} {{ Y }}", &vars, &ValueOverrides::new());
        assert_eq!(out, "1 {{X}} {{ Y }}");
    }

    #[test]
    fn names_are_case_sensitive_and_exact() {
        let vars = [Variable::new("Name").with_default("v")];
        let out = substitute("{{name}} {{Name}} {{Names}}", &vars, &ValueOverrides::new());
        assert_eq!(out, "{{name}} v {{Names}}");
    }

    #[test]
    fn override_beats_default() {
        let vars = [Variable::new("X").with_default("def")];
        let out = substitute("{{X}}", &vars, &overrides(&[("X", "override")]));
        assert_eq!(out, "override");
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let vars = [Variable::new("X").with_default("def")];
        assert_eq!(substitute("{{X}}", &vars, &overrides(&[("X", "")])), "def");
    }

    #[test]
    fn missing_default_and_override_yield_empty_string() {
        let vars = [Variable::new("X")];
        assert_eq!(substitute("[{{X}}]", &vars, &ValueOverrides::new()), "[]");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let vars = [
            Variable::new("A").with_default("{{B}}"),
            Variable::new("B").with_default("b"),
        ];
        let out = substitute("{{A}}-{{B}}", &vars, &ValueOverrides::new());
        assert_eq!(out, "{{B}}-b");

        // declaration order must not matter
        let reversed = [vars[1].clone(), vars[0].clone()];
        assert_eq!(substitute("{{A}}-{{B}}", &reversed, &ValueOverrides::new()), out);
    }

    #[test]
    fn self_referencing_value_terminates() {
        let vars = [Variable::new("A").with_default("{{A}}{{A}}")];
        let out = substitute("{{A}}", &vars, &ValueOverrides::new());
        assert_eq!(out, "{{A}}{{A}}");
    }

    #[test]
    fn malformed_braces_pass_through() {
        let vars = [Variable::new("A").with_default("1")];
        let input = "{{A} {A}} {{ A {{A";
        assert_eq!(substitute(input, &vars, &ValueOverrides::new()), input);
        assert_eq!(substitute("{{{A}}}", &vars, &ValueOverrides::new()), "{1}");
    }

    #[test]
    fn content_without_placeholders_is_unchanged() {
        let vars: Vec<Variable> = (0..20)
            .map(|i| Variable::new(format!("V{i}")).with_default("x"))
            .collect();
        let input = "fn main() { println!(\"{}\", 1); }\n";
        assert_eq!(substitute(input, &vars, &ValueOverrides::new()), input);
        assert_eq!(substitute("", &vars, &ValueOverrides::new()), "");
    }

    #[test]
    fn dollar_signs_in_values_are_inserted_verbatim() {
        let vars = [Variable::new("PRICE").with_default("$1 ${2}")];
        assert_eq!(substitute("{{PRICE}}", &vars, &ValueOverrides::new()), "$1 ${2}");
    }

    #[test]
    fn first_declaration_of_a_duplicate_name_wins() {
        let vars = [
            Variable::new("X").with_default("first"),
            Variable::new("X").with_default("second"),
        ];
        assert_eq!(substitute("{{X}}", &vars, &ValueOverrides::new()), "first");
    }

    #[test]
    fn substitution_is_repeatable() {
        let vars = [Variable::new("X").with_default("v")];
        let values = overrides(&[("X", "o")]);
        let once = substitute("a {{X}} b", &vars, &values);
        assert_eq!(substitute("a {{X}} b", &vars, &values), once);
    }

    #[test]
    fn substitute_all_keeps_input_order() {
        let vars = [Variable::new("X").with_default("v")];
        let out = substitute_all(["1{{X}}", "2{{X}}"], &vars, &ValueOverrides::new());
        assert_eq!(out, ["1v", "2v"]);
    }

    #[test]
    fn find_placeholders_dedupes_in_first_seen_order() {
        let names = find_placeholders("{{B}} {{ A }} {{B}} {{not valid}} {{C_1}}");
        assert_eq!(names, ["B", "A", "C_1"]);
    }

    #[test]
    fn undeclared_placeholders_across_files() {
        let files = [
            SnippetFile::new("a.ts", "{{NAME}} {{PORT}}"),
            SnippetFile::new("b.ts", "{{HOST}} {{PORT}}"),
        ];
        let vars = [Variable::new("NAME")];
        assert_eq!(undeclared_placeholders(&files, &vars), ["PORT", "HOST"]);
    }
}
