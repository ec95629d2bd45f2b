//! Core data models for scaffold generation

use std::{collections::BTreeMap, fmt};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GenerationError, Result},
    naming::Names,
    signatures::{ArgumentShape, Command, NameRule},
    templates::Substitutions,
};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

/// Column names synthesized by timestamp pairs
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Default soft-delete column name
pub const SOFT_DELETE_COLUMN: &str = "deleted_at";

/// Column name synthesized by remember tokens
pub const REMEMBER_TOKEN_COLUMN: &str = "remember_token";

/// Value of a named entry option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// `true` / `false`
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Fractional number
    Float(f64),
    /// Anything else
    Text(String),
}

impl OptionValue {
    /// Interpret a raw shorthand value: bool, then integer, then float, else text
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return OptionValue::Bool(true),
            "false" => return OptionValue::Bool(false),
            _ => {}
        }
        if let Ok(value) = raw.parse::<i64>() {
            return OptionValue::Integer(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return OptionValue::Float(value);
        }
        OptionValue::Text(raw.trim_matches(|c| c == '\'' || c == '"').to_string())
    }

    /// Whether the option counts as switched on
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(value) => *value,
            OptionValue::Integer(value) => *value != 0,
            OptionValue::Float(value) => *value != 0.0,
            OptionValue::Text(value) => !value.is_empty() && value != "false" && value != "0",
        }
    }

    /// Render as a PHP literal
    pub fn to_php(&self) -> String {
        match self {
            OptionValue::Bool(value) => value.to_string(),
            OptionValue::Integer(value) => value.to_string(),
            OptionValue::Float(value) => value.to_string(),
            OptionValue::Text(value) => php_string(value),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{}", value),
            OptionValue::Integer(value) => write!(f, "{}", value),
            OptionValue::Float(value) => write!(f, "{}", value),
            OptionValue::Text(value) => f.write_str(value),
        }
    }
}

/// Quote a value as a single-quoted PHP string
pub fn php_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// One declared field or index of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    command: Command,
    name: String,
    arguments: Vec<String>,
    options: BTreeMap<String, OptionValue>,
}

impl Entry {
    /// Create an entry from a command tag, validating it against the signature set
    pub fn new(
        command: &str,
        name: impl Into<String>,
        arguments: Vec<String>,
        options: BTreeMap<String, OptionValue>,
    ) -> Result<Self> {
        let command = Command::parse(command)?;
        Self::from_command(command, name, arguments, options)
    }

    /// Create an entry from an already-resolved command
    pub fn from_command(
        command: Command,
        name: impl Into<String>,
        arguments: Vec<String>,
        options: BTreeMap<String, OptionValue>,
    ) -> Result<Self> {
        let entry = Self {
            command,
            name: name.into().trim().to_string(),
            arguments: arguments
                .into_iter()
                .map(|a| a.trim().to_string())
                .collect(),
            options,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Shortcut for a named entry without arguments or options
    pub fn column(command: &str, name: &str) -> Result<Self> {
        Self::new(command, name, Vec::new(), BTreeMap::new())
    }

    /// Builder-style option setter
    pub fn with_option(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    fn invalid(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::InvalidEntry {
            command: self.command.tag().to_string(),
            message: message.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        let signature = self.command.signature();

        match signature.name {
            NameRule::Required if self.name.is_empty() => {
                return Err(self.invalid("a name is required"));
            }
            NameRule::Empty if !self.name.is_empty() => {
                return Err(self.invalid(format!("does not take a name, got '{}'", self.name)));
            }
            _ => {}
        }

        if !self.name.is_empty() && !IDENTIFIER.is_match(&self.name) {
            return Err(self.invalid(format!("'{}' is not a valid identifier", self.name)));
        }

        match signature.arguments {
            ArgumentShape::None if !self.arguments.is_empty() => {
                Err(self.invalid("takes no arguments"))
            }
            ArgumentShape::Scalars(max) => {
                if self.arguments.len() > max {
                    return Err(self.invalid(format!(
                        "takes at most {} argument(s), got {}",
                        max,
                        self.arguments.len()
                    )));
                }
                match self.arguments.iter().find(|a| a.parse::<u32>().is_err()) {
                    Some(bad) => Err(self.invalid(format!(
                        "'{}' is not a non-negative whole number",
                        bad
                    ))),
                    None => Ok(()),
                }
            }
            ArgumentShape::Values => {
                if self.arguments.is_empty() || self.arguments.iter().any(|a| a.is_empty()) {
                    return Err(self.invalid("needs at least one non-empty value"));
                }
                if self.command.is_index() {
                    if let Some(bad) = self.arguments.iter().find(|a| !IDENTIFIER.is_match(a)) {
                        return Err(self.invalid(format!("'{}' is not a column name", bad)));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// The declared command
    pub fn command(&self) -> Command {
        self.command
    }

    /// The declared name; empty for commands that synthesize their own
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments in declaration order
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Named options
    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    /// Look up one option
    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Whether a boolean-ish option is switched on
    pub fn flag(&self, key: &str) -> bool {
        self.option(key).is_some_and(OptionValue::is_truthy)
    }

    /// Whether the column accepts absence of a value
    pub fn is_nullable(&self) -> bool {
        self.flag("nullable")
            || matches!(
                self.command,
                Command::NullableMorphs | Command::NullableUuidMorphs | Command::NullableTimestamps
            )
    }

    /// The column name this entry stores its value under
    pub fn column_name(&self) -> &str {
        if self.command.is_soft_delete() && self.name.is_empty() {
            SOFT_DELETE_COLUMN
        } else if self.command == Command::RememberToken {
            REMEMBER_TOKEN_COLUMN
        } else {
            &self.name
        }
    }

    /// Every column this entry materializes, in order
    pub fn columns(&self) -> Vec<String> {
        if self.command.is_index() {
            Vec::new()
        } else if self.command.is_timestamps() {
            TIMESTAMP_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else if self.command.is_morph() {
            vec![format!("{}_id", self.name), format!("{}_type", self.name)]
        } else {
            vec![self.column_name().to_string()]
        }
    }
}

/// Output of one rendering rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A single piece of text
    Line(String),
    /// Several lines, each kept on its own line
    Lines(Vec<String>),
    /// The entry intentionally contributes nothing
    Nothing,
}

impl Fragment {
    /// Flatten into lines, dropping empty ones
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Fragment::Line(line) => vec![line],
            Fragment::Lines(lines) => lines,
            Fragment::Nothing => Vec::new(),
        }
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
    }
}

impl From<String> for Fragment {
    fn from(line: String) -> Self {
        Fragment::Line(line)
    }
}

impl From<&str> for Fragment {
    fn from(line: &str) -> Self {
        Fragment::Line(line.to_string())
    }
}

impl From<Vec<String>> for Fragment {
    fn from(lines: Vec<String>) -> Self {
        Fragment::Lines(lines)
    }
}

/// Options of the command that started a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Overwrite existing destinations
    pub force: bool,
    /// Treat inline tokens that survive substitution as errors
    pub strict: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            force: false,
            strict: true,
        }
    }
}

/// The full description of one scaffolded entity
#[derive(Debug, Clone)]
pub struct Crud {
    names: Names,
    entries: Vec<Entry>,
    options: GenerationOptions,
}

impl Crud {
    /// Create an entity description
    pub fn new(names: Names, entries: Vec<Entry>, options: GenerationOptions) -> Self {
        Self {
            names,
            entries,
            options,
        }
    }

    /// Derived naming forms
    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Run options
    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Inline token values derived from the names
    pub fn substitutions(&self) -> Substitutions {
        self.names.substitutions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_new_valid() {
        let entry = Entry::new(
            "enum",
            "status",
            vec!["draft".into(), "published".into()],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(entry.command(), Command::Enum);
        assert_eq!(entry.name(), "status");
        assert_eq!(entry.arguments(), ["draft", "published"]);
    }

    #[test]
    fn test_entry_unknown_command() {
        let err = Entry::column("varchar", "title").unwrap_err();
        assert!(matches!(err, GenerationError::UnknownCommand { .. }));
    }

    #[test]
    fn test_entry_requires_name() {
        let err = Entry::column("string", "").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidEntry { .. }));
    }

    #[test]
    fn test_entry_rejects_name_for_timestamps() {
        let err = Entry::column("timestamps", "stamps").unwrap_err();
        assert!(err.to_string().contains("does not take a name"));
    }

    #[test]
    fn test_entry_rejects_bad_identifier() {
        let err = Entry::column("string", "first name").unwrap_err();
        assert!(err.to_string().contains("not a valid identifier"));
    }

    #[test]
    fn test_entry_argument_shapes() {
        assert!(Entry::new("string", "title", vec!["150".into()], BTreeMap::new()).is_ok());
        assert!(Entry::new("string", "title", vec!["long".into()], BTreeMap::new()).is_err());
    }

    #[test]
    fn test_entry_scalars_must_be_whole_numbers() {
        for bad in ["inf", "NaN", "-3", "1e3", "2.5"] {
            assert!(
                Entry::new("string", "title", vec![bad.into()], BTreeMap::new()).is_err(),
                "{} accepted",
                bad
            );
        }
        let err = Entry::new(
            "decimal",
            "price",
            vec!["NaN".into(), "-3.5".into()],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'NaN' is not a non-negative whole number"));
        assert!(Entry::new("decimal", "price", vec!["8".into(), "0".into()], BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_entry_argument_arity() {
        assert!(
            Entry::new("decimal", "price", vec!["8".into(), "2".into(), "1".into()], BTreeMap::new())
                .is_err()
        );
        assert!(Entry::new("enum", "status", vec![], BTreeMap::new()).is_err());
        assert!(Entry::new("boolean", "active", vec!["1".into()], BTreeMap::new()).is_err());
        assert!(Entry::new("unique", "", vec!["slug".into()], BTreeMap::new()).is_ok());
        assert!(Entry::new("unique", "", vec!["not a column".into()], BTreeMap::new()).is_err());
    }

    #[test]
    fn test_entry_columns() {
        assert_eq!(
            Entry::column("timestamps", "").unwrap().columns(),
            vec!["created_at", "updated_at"]
        );
        assert_eq!(
            Entry::column("morphs", "commentable").unwrap().columns(),
            vec!["commentable_id", "commentable_type"]
        );
        assert_eq!(
            Entry::column("softDeletes", "").unwrap().columns(),
            vec!["deleted_at"]
        );
        assert_eq!(
            Entry::column("rememberToken", "").unwrap().columns(),
            vec!["remember_token"]
        );
        assert!(Entry::new("index", "", vec!["title".into()], BTreeMap::new())
            .unwrap()
            .columns()
            .is_empty());
    }

    #[test]
    fn test_entry_nullable() {
        let entry = Entry::column("string", "title")
            .unwrap()
            .with_option("nullable", OptionValue::Bool(true));
        assert!(entry.is_nullable());
        assert!(Entry::column("nullableMorphs", "owner").unwrap().is_nullable());
        assert!(!Entry::column("string", "title").unwrap().is_nullable());
    }

    #[test]
    fn test_option_value_parse() {
        assert_eq!(OptionValue::parse("true"), OptionValue::Bool(true));
        assert_eq!(OptionValue::parse("42"), OptionValue::Integer(42));
        assert_eq!(OptionValue::parse("1.5"), OptionValue::Float(1.5));
        assert_eq!(OptionValue::parse("'draft'"), OptionValue::Text("draft".into()));
    }

    #[test]
    fn test_option_value_to_php() {
        assert_eq!(OptionValue::Bool(false).to_php(), "false");
        assert_eq!(OptionValue::Text("it's".into()).to_php(), "'it\\'s'");
    }

    #[test]
    fn test_fragment_into_lines_drops_empty() {
        let fragment = Fragment::Lines(vec!["a".into(), String::new(), "b".into()]);
        assert_eq!(fragment.into_lines(), vec!["a", "b"]);
        assert!(Fragment::Nothing.into_lines().is_empty());
        assert!(Fragment::from("").into_lines().is_empty());
    }
}
