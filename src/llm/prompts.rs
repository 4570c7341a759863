//! Prompt templates and rendering.
//!
//! Templates are plain strings with `{name}` placeholders. Literal braces are
//! written as `{{` and `}}`.

use std::collections::BTreeMap;

use crate::{RecapError, Result};

pub const SINGLE_PASS_SUMMARY: &str = "single_pass_summary";
pub const CHUNK_SUMMARY: &str = "chunk_summary";
pub const CHUNK_SUMMARY_WITH_CONTEXT: &str = "chunk_summary_with_context";
pub const FINAL_SUMMARY: &str = "final_summary";
pub const EXTRACT_MAIN_POINTS_TEXT: &str = "extract_main_points_text";
pub const FORMAT_AS_JSON_ARRAY: &str = "format_as_json_array";

/// Every template the knowledge pipeline renders, with the placeholders it fills.
pub const REQUIRED_TEMPLATES: &[(&str, &[&str])] = &[
    (SINGLE_PASS_SUMMARY, &["transcript"]),
    (CHUNK_SUMMARY, &["chunk"]),
    (CHUNK_SUMMARY_WITH_CONTEXT, &["previous_summary", "chunk"]),
    (FINAL_SUMMARY, &["combined_summaries"]),
    (EXTRACT_MAIN_POINTS_TEXT, &["source_text"]),
    (FORMAT_AS_JSON_ARRAY, &["bullet_points"]),
];

pub const DEFAULT_SINGLE_PASS_SUMMARY: &str = "\
Write a concise, factual summary of the following transcript.\n\
Cover the main topics in the order they are discussed and use only information present in the transcript.\n\
\n\
Transcript:\n\
{transcript}";

pub const DEFAULT_CHUNK_SUMMARY: &str = "\
The following is one section of a longer transcript.\n\
Summarize this section in a short paragraph, keeping names, numbers and decisions.\n\
\n\
Section:\n\
{chunk}";

pub const DEFAULT_CHUNK_SUMMARY_WITH_CONTEXT: &str = "\
The following is one section of a longer transcript.\n\
Summary of the previous section, for context only:\n\
{previous_summary}\n\
\n\
Summarize the new section in a short paragraph, keeping names, numbers and decisions.\n\
Do not repeat the previous summary.\n\
\n\
Section:\n\
{chunk}";

pub const DEFAULT_FINAL_SUMMARY: &str = "\
Below are summaries of consecutive sections of one transcript, in order.\n\
Combine them into a single coherent summary that preserves the order of events.\n\
\n\
{combined_summaries}";

pub const DEFAULT_EXTRACT_MAIN_POINTS_TEXT: &str = "\
List the main points of the following text as a bulleted list.\n\
Use one line per point, starting each line with \"- \".\n\
\n\
Text:\n\
{source_text}";

pub const DEFAULT_FORMAT_AS_JSON_ARRAY: &str = "\
Rewrite the following bulleted list as a JSON array of strings, one string per bullet.\n\
Respond with the JSON array only, for example [\"first point\", \"second point\"].\n\
\n\
{bullet_points}";

/// Named prompt templates.
#[derive(Debug, Clone, Default)]
pub struct PromptCatalog {
    templates: BTreeMap<String, String>,
}

impl PromptCatalog {
    pub fn new(templates: BTreeMap<String, String>) -> Self {
        Self { templates }
    }

    /// Catalog holding the built-in default templates.
    pub fn builtin() -> Self {
        let templates = [
            (SINGLE_PASS_SUMMARY, DEFAULT_SINGLE_PASS_SUMMARY),
            (CHUNK_SUMMARY, DEFAULT_CHUNK_SUMMARY),
            (CHUNK_SUMMARY_WITH_CONTEXT, DEFAULT_CHUNK_SUMMARY_WITH_CONTEXT),
            (FINAL_SUMMARY, DEFAULT_FINAL_SUMMARY),
            (EXTRACT_MAIN_POINTS_TEXT, DEFAULT_EXTRACT_MAIN_POINTS_TEXT),
            (FORMAT_AS_JSON_ARRAY, DEFAULT_FORMAT_AS_JSON_ARRAY),
        ]
        .into_iter()
        .map(|(name, template)| (name.to_string(), template.to_string()))
        .collect();

        Self { templates }
    }

    /// Insert or replace a template.
    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RecapError::config(format!("Prompt template '{name}' is missing")))
    }

    /// Check that every required template exists and uses exactly its placeholders.
    pub fn validate(&self) -> Result<()> {
        for (name, expected) in REQUIRED_TEMPLATES {
            let template = self.get(name)?;
            let found = placeholders(name, template)?;

            for placeholder in *expected {
                if !found.contains(placeholder) {
                    return Err(RecapError::config(format!(
                        "Prompt template '{name}' must contain the {{{placeholder}}} placeholder"
                    )));
                }
            }

            if let Some(unknown) = found.iter().find(|p| !expected.contains(p)) {
                return Err(RecapError::config(format!(
                    "Prompt template '{name}' uses unknown placeholder {{{unknown}}}"
                )));
            }
        }

        Ok(())
    }

    /// Render the named template, substituting `vars`.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        let template = self.get(name)?;
        let mut output = String::with_capacity(template.len());

        for piece in parse(name, template)? {
            match piece {
                Piece::Text(text) => output.push_str(text),
                Piece::Placeholder(key) => {
                    let value = vars
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| {
                            RecapError::config(format!(
                                "Prompt template '{name}' references {{{key}}} but no value was supplied"
                            ))
                        })?;
                    output.push_str(value);
                }
            }
        }

        Ok(output)
    }
}

enum Piece<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn placeholders<'a>(name: &str, template: &'a str) -> Result<Vec<&'a str>> {
    Ok(parse(name, template)?
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Placeholder(key) => Some(key),
            Piece::Text(_) => None,
        })
        .collect())
}

fn parse<'a>(name: &str, template: &'a str) -> Result<Vec<Piece<'a>>> {
    let mut pieces = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            pieces.push(Piece::Text(&rest[..pos]));
        }

        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            pieces.push(Piece::Text("{"));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            pieces.push(Piece::Text("}"));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(RecapError::config(format!(
                "Prompt template '{name}' has an unmatched '}}'"
            )));
        } else {
            let end = tail[1..].find('}').ok_or_else(|| {
                RecapError::config(format!("Prompt template '{name}' has an unclosed '{{'"))
            })?;
            let key = tail[1..=end].trim();
            if key.is_empty() || key.contains('{') {
                return Err(RecapError::config(format!(
                    "Prompt template '{name}' has an invalid placeholder"
                )));
            }
            pieces.push(Piece::Placeholder(key));
            rest = &tail[end + 2..];
        }
    }

    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }

    Ok(pieces)
}
