//! Migration schema columns

use crate::{
    compilers::{Compiler, RenderContext},
    models::{php_string, Entry, Fragment},
    signatures::{ArgumentShape, Command},
};

/// Options rendered as column modifiers, in output order
const MODIFIERS: &[&str] = &["unsigned", "nullable", "unique", "index"];

/// Schema compiler: one `$table->...;` statement per entry, indexes included
pub fn compiler() -> Compiler {
    Compiler::new("schema", column)
        .with_rules(
            &[
                Command::Primary,
                Command::Unique,
                Command::Index,
                Command::SpatialIndex,
            ],
            index,
        )
        .rendering_indexes()
}

fn quoted_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| php_string(v)).collect();
    format!("[{}]", items.join(", "))
}

fn modifiers(entry: &Entry) -> String {
    let mut out = String::new();
    for flag in MODIFIERS {
        if entry.flag(flag) {
            out.push_str(&format!("->{}()", flag));
        }
    }
    if let Some(default) = entry.option("default") {
        out.push_str(&format!("->default({})", default.to_php()));
    }
    if let Some(comment) = entry.option("comment") {
        out.push_str(&format!("->comment({})", php_string(&comment.to_string())));
    }
    out
}

/// `$table->string('title', 150)->nullable();`
fn column(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let mut params = Vec::new();
    if !entry.name().is_empty() {
        params.push(php_string(entry.name()));
    }
    match entry.command().signature().arguments {
        ArgumentShape::Scalars(_) => params.extend(entry.arguments().iter().cloned()),
        ArgumentShape::Values => params.push(quoted_list(entry.arguments())),
        ArgumentShape::None => {}
    }

    format!(
        "$table->{}({}){};",
        entry.command().tag(),
        params.join(", "),
        modifiers(entry)
    )
    .into()
}

/// `$table->unique(['title', 'slug'], 'posts_title_slug_unique');`
fn index(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let columns = match entry.arguments() {
        [single] => php_string(single),
        many => quoted_list(many),
    };
    let name = if entry.name().is_empty() {
        String::new()
    } else {
        format!(", {}", php_string(entry.name()))
    };
    format!("$table->{}({}{});", entry.command().tag(), columns, name).into()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        models::OptionValue,
        naming::{EnglishNameDeriver, NameDeriver},
    };

    fn render(entry: Entry) -> Vec<String> {
        let names = EnglishNameDeriver.derive("post");
        compiler()
            .render(&RenderContext::new(&names), &entry)
            .into_lines()
    }

    #[test]
    fn test_plain_column() {
        assert_eq!(
            render(Entry::column("string", "title").unwrap()),
            vec!["$table->string('title');"]
        );
    }

    #[test]
    fn test_column_with_length_and_modifiers() {
        let entry = Entry::new("string", "slug", vec!["120".into()], BTreeMap::new())
            .unwrap()
            .with_option("nullable", OptionValue::Bool(true))
            .with_option("unique", OptionValue::Bool(true))
            .with_option("default", OptionValue::Text("draft".into()));
        assert_eq!(
            render(entry),
            vec!["$table->string('slug', 120)->nullable()->unique()->default('draft');"]
        );
    }

    #[test]
    fn test_enum_column_lists_values() {
        let entry = Entry::new(
            "enum",
            "status",
            vec!["draft".into(), "published".into()],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(
            render(entry),
            vec!["$table->enum('status', ['draft', 'published']);"]
        );
    }

    #[test]
    fn test_group_commands() {
        assert_eq!(
            render(Entry::column("timestamps", "").unwrap()),
            vec!["$table->timestamps();"]
        );
        assert_eq!(
            render(Entry::column("softDeletes", "archived_at").unwrap()),
            vec!["$table->softDeletes('archived_at');"]
        );
        assert_eq!(
            render(Entry::column("nullableMorphs", "owner").unwrap()),
            vec!["$table->nullableMorphs('owner');"]
        );
    }

    #[test]
    fn test_index_entries_are_rendered() {
        let single = Entry::new("unique", "", vec!["slug".into()], BTreeMap::new()).unwrap();
        assert_eq!(render(single), vec!["$table->unique('slug');"]);

        let named = Entry::new(
            "index",
            "posts_lookup",
            vec!["title".into(), "slug".into()],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(
            render(named),
            vec!["$table->index(['title', 'slug'], 'posts_lookup');"]
        );
    }
}
