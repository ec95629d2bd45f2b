//! Entity definitions: field shorthand and definition files
//!
//! Shorthand is `name:command(arg,...):option:option=value`. A lone segment
//! declares a nameless entry such as `timestamps` or `unique(title,slug)`, as
//! does a leading command followed only by options (`softDeletes:nullable`).

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    models::{Entry, OptionValue},
    signatures::Command,
};

/// Supported definition file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl DefinitionFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(DefinitionFormat::Yaml),
            Some("toml") => Ok(DefinitionFormat::Toml),
            Some("json") => Ok(DefinitionFormat::Json),
            _ => Err(GenerationError::Definition(format!(
                "unsupported definition file: {}",
                path.display()
            ))),
        }
    }
}

/// One field of a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefinition {
    /// `title:string(150):nullable`
    Shorthand(String),
    /// Structured form
    Detailed {
        /// Command tag
        command: String,
        /// Field or index name
        #[serde(default)]
        name: Option<String>,
        /// Positional arguments
        #[serde(default)]
        arguments: Vec<OptionValue>,
        /// Named options
        #[serde(default)]
        options: BTreeMap<String, OptionValue>,
    },
}

impl FieldDefinition {
    /// Validate into an entry
    pub fn to_entry(&self) -> Result<Entry> {
        match self {
            FieldDefinition::Shorthand(text) => parse_field(text),
            FieldDefinition::Detailed {
                command,
                name,
                arguments,
                options,
            } => Entry::new(
                command,
                name.clone().unwrap_or_default(),
                arguments.iter().map(|a| a.to_string()).collect(),
                options.clone(),
            ),
        }
    }
}

/// Contents of a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Canonical entity name
    pub name: String,
    /// Theme to generate with
    #[serde(default)]
    pub theme: Option<String>,
    /// Fields in display order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl EntityDefinition {
    /// Load a definition file, picking the format from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = DefinitionFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| GenerationError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading {:?} definition from {}", format, path.display());
        Self::parse(&content, format)
    }

    /// Parse definition text
    pub fn parse(content: &str, format: DefinitionFormat) -> Result<Self> {
        let definition = match format {
            DefinitionFormat::Yaml => serde_yaml::from_str(content)?,
            DefinitionFormat::Toml => toml::from_str(content)?,
            DefinitionFormat::Json => serde_json::from_str(content)?,
        };
        Ok(definition)
    }

    /// Validate every field into entries, in order
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.fields.iter().map(FieldDefinition::to_entry).collect()
    }
}

/// Split on `:` outside parentheses
fn segments(text: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| unbalanced(text))?;
            }
            ':' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced(text));
    }
    parts.push(text[start..].trim());
    Ok(parts)
}

fn unbalanced(text: &str) -> GenerationError {
    GenerationError::Definition(format!("unbalanced parentheses in '{}'", text))
}

/// `decimal(8,2)` becomes `("decimal", ["8", "2"])`
fn command_call(segment: &str) -> Result<(&str, Vec<String>)> {
    match segment.split_once('(') {
        None => Ok((segment, Vec::new())),
        Some((command, rest)) => {
            let inner = rest.strip_suffix(')').ok_or_else(|| {
                GenerationError::Definition(format!("expected ')' at the end of '{}'", segment))
            })?;
            let arguments = inner
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(|a| a.trim_matches(|c| c == '\'' || c == '"').to_string())
                .collect();
            Ok((command.trim(), arguments))
        }
    }
}

fn is_command(segment: &str) -> bool {
    command_call(segment)
        .map(|(command, _)| Command::parse(command).is_ok())
        .unwrap_or(false)
}

fn options(segments: &[&str]) -> BTreeMap<String, OptionValue> {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), OptionValue::parse(value)),
            None => (segment.to_string(), OptionValue::Bool(true)),
        })
        .collect()
}

/// Parse one field shorthand into a validated entry
pub fn parse_field(text: &str) -> Result<Entry> {
    let parts = segments(text.trim())?;
    let (name, call, rest) = match parts.as_slice() {
        [] | [""] => {
            return Err(GenerationError::Definition("empty field definition".into()));
        }
        [call] => ("", *call, &[][..]),
        [first, second, rest @ ..] if is_command(second) || !is_command(first) => {
            (*first, *second, rest)
        }
        [call, rest @ ..] => ("", *call, rest),
    };

    let (command, arguments) = command_call(call)?;
    Entry::new(command, name, arguments, options(rest))
}

/// Parse several shorthands, keeping their order
pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Result<Vec<Entry>> {
    fields.iter().map(|f| parse_field(f.as_ref())).collect()
}
