//! Property-based tests for type-dispatch compilers
//!
//! Every built-in compiler of every built-in theme is checked against the
//! dispatch contract: empty input, default fallback, index exclusion and the
//! boolean / timestamp expansions.

use std::collections::BTreeMap;

use crudkit_generation::{
    signatures::{ArgumentShape, NameRule},
    Command, Compiler, CompilerKind, EnglishNameDeriver, Entry, Fragment, NameDeriver,
    RenderContext, Theme, ThemeRegistry,
};
use proptest::prelude::*;

fn themes() -> Vec<Theme> {
    let registry = ThemeRegistry::new();
    registry
        .names()
        .iter()
        .map(|name| registry.get(name).unwrap().clone())
        .collect()
}

fn compilers(theme: &Theme) -> Vec<(CompilerKind, Compiler)> {
    CompilerKind::ALL
        .iter()
        .filter_map(|kind| theme.compiler(*kind).ok().map(|c| (*kind, c.clone())))
        .collect()
}

/// A valid entry for any command
fn sample_entry(command: Command, name: &str) -> Entry {
    let signature = command.signature();
    let name = match signature.name {
        NameRule::Empty => "",
        _ => name,
    };
    let arguments = match signature.arguments {
        ArgumentShape::Values => vec!["alpha".to_string(), "beta".to_string()],
        _ => Vec::new(),
    };
    Entry::from_command(command, name, arguments, BTreeMap::new()).unwrap()
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop::sample::select(Command::ALL.to_vec())
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

proptest! {
    /// Property: compiling no entries yields the on-empty text verbatim
    #[test]
    fn prop_compile_empty_returns_on_empty(on_empty in "[ -~]{0,30}") {
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        for theme in themes() {
            for (_, compiler) in compilers(&theme) {
                prop_assert_eq!(compiler.compile(&[], &ctx, &on_empty), on_empty.clone());
            }
        }
    }

    /// Property: commands without a specific rule render exactly like the default rule
    #[test]
    fn prop_unmatched_commands_use_default_rule(
        command in command_strategy(),
        name in name_strategy(),
    ) {
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        let entry = sample_entry(command, &name);

        for theme in themes() {
            for (_, compiler) in compilers(&theme) {
                if compiler.has_rule(command) || command.is_index() {
                    continue;
                }
                prop_assert_eq!(
                    compiler.render(&ctx, &entry),
                    (compiler.default_rule())(&ctx, &entry)
                );
            }
        }
    }

    /// Property: index entries never reach content compilers
    #[test]
    fn prop_index_never_in_content(
        command in prop::sample::select(vec![
            Command::Primary,
            Command::Unique,
            Command::Index,
            Command::SpatialIndex,
        ]),
        name in name_strategy(),
    ) {
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        let entry = sample_entry(command, &name);

        for theme in themes() {
            for (kind, compiler) in compilers(&theme) {
                if kind == CompilerKind::Schema {
                    prop_assert!(!compiler.render(&ctx, &entry).into_lines().is_empty());
                } else {
                    prop_assert_eq!(compiler.render(&ctx, &entry), Fragment::Nothing);
                    prop_assert_eq!(compiler.compile(&[entry.clone()], &ctx, "none"), "none");
                }
            }
        }
    }

    /// Property: a boolean renders two radios, yes bound to the value and no to its negation
    #[test]
    fn prop_boolean_renders_two_radios(name in name_strategy()) {
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        let entry = Entry::column("boolean", &name).unwrap();
        let marker = format!("type=\"radio\" name=\"{}\"", name);

        for theme in themes() {
            let lines = theme
                .compiler(CompilerKind::Form)
                .unwrap()
                .render(&ctx, &entry)
                .into_lines();
            prop_assert_eq!(lines.len(), 2);
            for line in &lines {
                prop_assert_eq!(line.matches(&marker).count(), 1);
            }
        }

        let registry = ThemeRegistry::new();
        let form = |theme: &str| {
            registry
                .get(theme)
                .unwrap()
                .compiler(CompilerKind::Form)
                .unwrap()
                .render(&ctx, &entry)
                .into_lines()
        };

        let blade = form("default");
        let value = format!("old('{}', $post->{})", name, name);
        let yes = format!("@checked({})", value);
        let no = format!("@checked(! {})", value);
        prop_assert!(blade[0].contains(&yes));
        prop_assert!(blade[1].contains(&no));

        let vue = form("vue");
        let yes = format!(":checked=\"form.{}\"", name);
        let no = format!(":checked=\"!form.{}\"", name);
        prop_assert!(vue[0].contains(&yes));
        prop_assert!(vue[1].contains(&no));
    }

    /// Property: one timestamps entry expands into created-at and updated-at
    #[test]
    fn prop_timestamps_expand_to_two_lines(
        command in prop::sample::select(vec![
            Command::Timestamps,
            Command::TimestampsTz,
            Command::NullableTimestamps,
        ]),
    ) {
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        let entry = sample_entry(command, "");

        for theme in themes() {
            for kind in [
                CompilerKind::Form,
                CompilerKind::TableHead,
                CompilerKind::TableRow,
                CompilerKind::Detail,
            ] {
                let body = theme.compiler(kind).unwrap().compile(&[entry.clone()], &ctx, "");
                let lines: Vec<&str> = body.lines().collect();
                prop_assert_eq!(lines.len(), 2);
                prop_assert!(lines[0].contains("created_at") || lines[0].contains("Created At"));
                prop_assert!(lines[1].contains("updated_at") || lines[1].contains("Updated At"));
            }
        }
    }

    /// Property: entries keep their declaration order in the compiled body
    #[test]
    fn prop_compile_preserves_order(
        first in name_strategy(),
        second in name_strategy(),
    ) {
        prop_assume!(first != second);
        let names = EnglishNameDeriver.derive("post");
        let ctx = RenderContext::new(&names);
        let entries = vec![
            Entry::column("string", &first).unwrap(),
            Entry::column("rememberToken", "").unwrap(),
            Entry::column("integer", &second).unwrap(),
        ];

        for theme in themes() {
            let body = theme.compiler(CompilerKind::TableHead).unwrap().compile(&entries, &ctx, "");
            let lines: Vec<&str> = body.lines().collect();
            prop_assert_eq!(lines.len(), 2);
        }

        let schema = ThemeRegistry::new()
            .get("default")
            .unwrap()
            .compiler(CompilerKind::Schema)
            .unwrap()
            .compile(&entries, &ctx, "");
        let lines: Vec<&str> = schema.lines().collect();
        prop_assert_eq!(lines[0], format!("$table->string('{}');", first));
        prop_assert_eq!(lines[1], "$table->rememberToken();");
        prop_assert_eq!(lines[2], format!("$table->integer('{}');", second));
    }
}

#[test]
fn test_structural_commands_render_nothing_in_content() {
    let names = EnglishNameDeriver.derive("post");
    let ctx = RenderContext::new(&names);
    let entries = vec![
        Entry::column("morphs", "owner").unwrap(),
        Entry::column("nullableUuidMorphs", "owner").unwrap(),
        Entry::column("rememberToken", "").unwrap(),
    ];

    for theme in themes() {
        for kind in [
            CompilerKind::Form,
            CompilerKind::FormState,
            CompilerKind::TableHead,
            CompilerKind::TableRow,
            CompilerKind::Detail,
            CompilerKind::Rules,
        ] {
            if let Ok(compiler) = theme.compiler(kind) {
                assert_eq!(compiler.compile(&entries, &ctx, "none"), "none", "{}", kind);
            }
        }
    }
}

#[test]
fn test_soft_deletes_hidden_from_forms_and_listings() {
    let names = EnglishNameDeriver.derive("post");
    let ctx = RenderContext::new(&names);
    let entries = vec![Entry::column("softDeletesTz", "").unwrap()];

    for theme in themes() {
        for kind in [CompilerKind::Form, CompilerKind::TableHead, CompilerKind::TableRow] {
            let compiler = theme.compiler(kind).unwrap();
            assert_eq!(compiler.compile(&entries, &ctx, "none"), "none");
        }
        let detail = theme.compiler(CompilerKind::Detail).unwrap();
        assert!(detail.compile(&entries, &ctx, "none").contains("Deleted At"));
    }
}

#[test]
fn test_post_scenario_form_body() {
    let names = EnglishNameDeriver.derive("Post");
    let ctx = RenderContext::new(&names);
    let entries = vec![
        Entry::column("string", "title").unwrap(),
        Entry::column("boolean", "published").unwrap(),
    ];
    let theme = ThemeRegistry::new().get("default").unwrap().clone();
    let body = theme
        .compiler(CompilerKind::Form)
        .unwrap()
        .compile(&entries, &ctx, "");
    let lines: Vec<&str> = body.split('\n').collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("type=\"text\" name=\"title\""));
    assert!(lines[1].contains("type=\"radio\" name=\"published\""));
    assert!(lines[2].contains("type=\"radio\" name=\"published\""));
}
