//! Type-dispatch compilers
//!
//! A [`Compiler`] renders an entity's entries into one body of text for one
//! artifact section. Each entry is dispatched on its command to a specific
//! [`Rule`], falling back to the compiler's default rule. Artifact kinds only
//! override the handful of commands that need special treatment.

pub mod blade;
pub mod model;
pub mod rules;
pub mod schema;
pub mod vue;

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    models::{Entry, Fragment},
    naming::Names,
    signatures::Command,
};

/// A rendering rule for one entry
pub type Rule = fn(&RenderContext<'_>, &Entry) -> Fragment;

/// The section kinds a theme can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilerKind {
    /// Persistence schema columns and indexes
    Schema,
    /// Mass-assignable attribute list
    Fillable,
    /// Attribute casts
    Casts,
    /// Model traits implied by declared columns
    Traits,
    /// Request validation rules
    Rules,
    /// Edit form fields
    Form,
    /// Initial client-side form state
    FormState,
    /// Listing table header cells
    TableHead,
    /// Listing table row cells
    TableRow,
    /// Detail view rows
    Detail,
}

impl CompilerKind {
    /// Every kind, in declaration order
    pub const ALL: &'static [CompilerKind] = &[
        CompilerKind::Schema,
        CompilerKind::Fillable,
        CompilerKind::Casts,
        CompilerKind::Traits,
        CompilerKind::Rules,
        CompilerKind::Form,
        CompilerKind::FormState,
        CompilerKind::TableHead,
        CompilerKind::TableRow,
        CompilerKind::Detail,
    ];

    /// Snake-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerKind::Schema => "schema",
            CompilerKind::Fillable => "fillable",
            CompilerKind::Casts => "casts",
            CompilerKind::Traits => "traits",
            CompilerKind::Rules => "rules",
            CompilerKind::Form => "form",
            CompilerKind::FormState => "form_state",
            CompilerKind::TableHead => "table_head",
            CompilerKind::TableRow => "table_row",
            CompilerKind::Detail => "detail",
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule may know about the entity besides the entry itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    names: &'a Names,
}

impl<'a> RenderContext<'a> {
    /// Create a context for one entity
    pub fn new(names: &'a Names) -> Self {
        Self { names }
    }

    /// Naming forms of the entity
    pub fn names(&self) -> &'a Names {
        self.names
    }

    /// Server-side record variable, e.g. `$blogPost`
    pub fn record_var(&self) -> String {
        format!("${}", self.names.camel_singular)
    }

    /// Server-side access to one attribute, e.g. `$blogPost->title`
    pub fn record_field(&self, column: &str) -> String {
        format!("{}->{}", self.record_var(), column)
    }
}

/// Dispatches entries to rendering rules for one artifact section
#[derive(Clone)]
pub struct Compiler {
    name: String,
    default: Rule,
    rules: HashMap<Command, Rule>,
    renders_indexes: bool,
}

impl Compiler {
    /// Create a compiler with only a default rule
    ///
    /// Index entries are skipped unless [`Compiler::rendering_indexes`] is set.
    pub fn new(name: impl Into<String>, default: Rule) -> Self {
        Self {
            name: name.into(),
            default,
            rules: HashMap::new(),
            renders_indexes: false,
        }
    }

    /// Copy this compiler under a new name, keeping every rule
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Register a specific rule for one command
    pub fn with_rule(mut self, command: Command, rule: Rule) -> Self {
        self.rules.insert(command, rule);
        self
    }

    /// Register the same rule for several commands
    pub fn with_rules(mut self, commands: &[Command], rule: Rule) -> Self {
        for command in commands {
            self.rules.insert(*command, rule);
        }
        self
    }

    /// Replace the default rule
    pub fn with_default(mut self, default: Rule) -> Self {
        self.default = default;
        self
    }

    /// Let index entries reach their rules
    pub fn rendering_indexes(mut self) -> Self {
        self.renders_indexes = true;
        self
    }

    /// Compiler name, used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default rule
    pub fn default_rule(&self) -> Rule {
        self.default
    }

    /// Whether `command` has a specific rule
    pub fn has_rule(&self, command: Command) -> bool {
        self.rules.contains_key(&command)
    }

    /// The rule `command` dispatches to
    pub fn rule_for(&self, command: Command) -> Rule {
        self.rules.get(&command).copied().unwrap_or(self.default)
    }

    /// Render a single entry
    pub fn render(&self, context: &RenderContext<'_>, entry: &Entry) -> Fragment {
        if entry.command().is_index() && !self.renders_indexes {
            return Fragment::Nothing;
        }
        (self.rule_for(entry.command()))(context, entry)
    }

    /// Render every entry and join the non-empty lines
    ///
    /// Returns `on_empty` verbatim when nothing was rendered.
    pub fn compile(&self, entries: &[Entry], context: &RenderContext<'_>, on_empty: &str) -> String {
        let lines: Vec<String> = entries
            .iter()
            .flat_map(|entry| self.render(context, entry).into_lines())
            .collect();

        debug!(
            "Compiler {} rendered {} line(s) from {} entr(ies)",
            self.name,
            lines.len(),
            entries.len()
        );

        if lines.is_empty() {
            on_empty.to_string()
        } else {
            lines.join("\n")
        }
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<_> = self.rules.keys().map(|c| c.tag()).collect();
        overridden.sort_unstable();
        f.debug_struct("Compiler")
            .field("name", &self.name)
            .field("rules", &overridden)
            .field("renders_indexes", &self.renders_indexes)
            .finish()
    }
}

/// Shared rule: the entry contributes nothing
pub fn nothing(_: &RenderContext<'_>, _: &Entry) -> Fragment {
    Fragment::Nothing
}

/// Commands that never appear in user-facing content
pub const STRUCTURAL: &[Command] = &[
    Command::Morphs,
    Command::NullableMorphs,
    Command::UuidMorphs,
    Command::NullableUuidMorphs,
    Command::RememberToken,
];

/// Commands expanding into a created-at / updated-at pair
pub const TIMESTAMPS: &[Command] = &[
    Command::Timestamps,
    Command::TimestampsTz,
    Command::NullableTimestamps,
];

/// Soft-delete commands
pub const SOFT_DELETES: &[Command] = &[Command::SoftDeletes, Command::SoftDeletesTz];

/// Auto-incrementing key commands
pub const INCREMENTS: &[Command] = &[
    Command::Increments,
    Command::BigIncrements,
    Command::MediumIncrements,
    Command::SmallIncrements,
    Command::TinyIncrements,
];
