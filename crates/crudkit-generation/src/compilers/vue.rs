//! Single-file component sections
//!
//! Components bind the edited record as `form`, listing rows as `item` and
//! the displayed record as `record`.

use crate::{
    compilers::{
        blade, nothing, Compiler, RenderContext, INCREMENTS, SOFT_DELETES, STRUCTURAL, TIMESTAMPS,
    },
    models::{Entry, Fragment, TIMESTAMP_COLUMNS},
    naming::label,
    signatures::Command,
};

/// Form fields bound with `v-model`
pub fn form() -> Compiler {
    Compiler::new("vue.form", input)
        .with_rule(Command::Boolean, radios)
        .with_rule(Command::Enum, select)
        .with_rule(Command::Set, multi_select)
        .with_rules(
            &[Command::Text, Command::MediumText, Command::LongText],
            textarea,
        )
        .with_rules(TIMESTAMPS, timestamp_notes)
        .with_rules(INCREMENTS, nothing)
        .with_rules(SOFT_DELETES, nothing)
        .with_rules(STRUCTURAL, nothing)
}

/// Initial values of the `form` object
pub fn form_state() -> Compiler {
    Compiler::new("vue.form_state", |_, entry| {
        let initial = match entry.option("default") {
            Some(value) => serde_json::to_string(value).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        };
        format!("{}: {},", entry.column_name(), initial).into()
    })
    .with_rule(Command::Set, |_, entry| {
        format!("{}: [],", entry.column_name()).into()
    })
    .with_rules(INCREMENTS, nothing)
    .with_rules(TIMESTAMPS, nothing)
    .with_rules(SOFT_DELETES, nothing)
    .with_rules(STRUCTURAL, nothing)
}

/// Listing header cells are plain markup, identical to the server-rendered ones
pub fn table_head() -> Compiler {
    blade::table_head().extend("vue.table_head")
}

/// Listing row cells reading from `item`
pub fn table_row() -> Compiler {
    Compiler::new("vue.table_row", |_, entry| {
        format!("<td>{}</td>", display("item", entry, entry.column_name())).into()
    })
    .with_rules(TIMESTAMPS, |_, entry| {
        TIMESTAMP_COLUMNS
            .iter()
            .map(|column| format!("<td>{}</td>", display("item", entry, column)))
            .collect::<Vec<_>>()
            .into()
    })
    .with_rules(SOFT_DELETES, nothing)
    .with_rules(STRUCTURAL, nothing)
}

/// Detail rows reading from `record`
pub fn detail() -> Compiler {
    Compiler::new("vue.detail", |_, entry| {
        detail_row(entry, entry.column_name()).into()
    })
    .with_rules(TIMESTAMPS, |_, entry| {
        TIMESTAMP_COLUMNS
            .iter()
            .map(|column| detail_row(entry, column))
            .collect::<Vec<_>>()
            .into()
    })
    .with_rules(STRUCTURAL, nothing)
}

fn display(object: &str, entry: &Entry, column: &str) -> String {
    let field = format!("{}.{}", object, column);
    match entry.command() {
        Command::Boolean => format!("{{{{ {} ? 'Yes' : 'No' }}}}", field),
        Command::Set => format!("{{{{ ({} || []).join(', ') }}}}", field),
        c if c.is_json() => format!("{{{{ JSON.stringify({}) }}}}", field),
        _ => format!("{{{{ {} }}}}", field),
    }
}

fn detail_row(entry: &Entry, column: &str) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>",
        label(column),
        display("record", entry, column)
    )
}

fn open_group(column: &str) -> String {
    format!(
        "<div class=\"mb-3\"><label for=\"{0}\" class=\"form-label\">{1}</label>",
        column,
        label(column)
    )
}

fn input(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let command = entry.command();
    let column = entry.column_name();
    let (kind, model) = match command {
        Command::Date => ("date", "v-model"),
        Command::DateTime | Command::DateTimeTz | Command::Timestamp | Command::TimestampTz => {
            ("datetime-local", "v-model")
        }
        Command::Time | Command::TimeTz => ("time", "v-model"),
        c if c.is_integer() || c.is_fractional() => ("number", "v-model.number"),
        _ => ("text", "v-model"),
    };
    format!(
        "{}<input type=\"{}\" id=\"{}\" {}=\"form.{}\" class=\"form-control\"></div>",
        open_group(column),
        kind,
        column,
        model,
        column
    )
    .into()
}

fn textarea(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    format!(
        "{0}<textarea id=\"{1}\" v-model=\"form.{1}\" class=\"form-control\" rows=\"5\"></textarea></div>",
        open_group(column),
        column
    )
    .into()
}

fn radios(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let title = label(column);
    vec![
        format!(
            "<div class=\"form-check\"><input type=\"radio\" name=\"{0}\" id=\"{0}_yes\" class=\"form-check-input\" :checked=\"form.{0}\" @change=\"form.{0} = true\"><label for=\"{0}_yes\" class=\"form-check-label\">{1}: Yes</label></div>",
            column, title
        ),
        format!(
            "<div class=\"form-check\"><input type=\"radio\" name=\"{0}\" id=\"{0}_no\" class=\"form-check-input\" :checked=\"!form.{0}\" @change=\"form.{0} = false\"><label for=\"{0}_no\" class=\"form-check-label\">{1}: No</label></div>",
            column, title
        ),
    ]
    .into()
}

fn select(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let mut lines = vec![format!(
        "{0}<select id=\"{1}\" v-model=\"form.{1}\" class=\"form-control\">",
        open_group(column),
        column
    )];
    if entry.is_nullable() {
        lines.push("<option :value=\"null\"></option>".to_string());
    }
    lines.extend(
        entry
            .arguments()
            .iter()
            .map(|option| format!("<option value=\"{0}\">{0}</option>", option)),
    );
    lines.push("</select></div>".to_string());
    lines.into()
}

fn multi_select(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let mut lines = vec![format!(
        "{0}<select id=\"{1}\" name=\"{1}[]\" v-model=\"form.{1}\" class=\"form-control\" multiple>",
        open_group(column),
        column
    )];
    lines.extend(
        entry
            .arguments()
            .iter()
            .map(|option| format!("<option value=\"{0}\">{0}</option>", option)),
    );
    lines.push("</select></div>".to_string());
    lines.into()
}

fn timestamp_notes(_: &RenderContext<'_>, _: &Entry) -> Fragment {
    TIMESTAMP_COLUMNS
        .iter()
        .map(|column| {
            format!(
                "<p class=\"form-text\">{}: {{{{ form.{} || '-' }}}}</p>",
                label(column),
                column
            )
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        models::OptionValue,
        naming::{EnglishNameDeriver, NameDeriver},
    };

    fn lines(compiler: Compiler, entry: Entry) -> Vec<String> {
        let names = EnglishNameDeriver.derive("post");
        compiler
            .render(&RenderContext::new(&names), &entry)
            .into_lines()
    }

    #[test]
    fn test_v_model_input() {
        let out = lines(form(), Entry::column("string", "title").unwrap());
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("v-model=\"form.title\""));
    }

    #[test]
    fn test_number_input_uses_number_modifier() {
        let out = lines(form(), Entry::column("bigInteger", "views").unwrap());
        assert!(out[0].contains("v-model.number=\"form.views\""));
    }

    #[test]
    fn test_boolean_radios_reference_value_and_negation() {
        let out = lines(form(), Entry::column("boolean", "active").unwrap());
        assert_eq!(out.len(), 2);
        for line in &out {
            assert_eq!(line.matches("type=\"radio\" name=\"active\"").count(), 1);
        }
        assert!(out[0].contains(":checked=\"form.active\""));
        assert!(out[1].contains(":checked=\"!form.active\""));
    }

    #[test]
    fn test_nullable_enum_prepends_empty_choice() {
        let entry = Entry::new("enum", "status", vec!["draft".into()], BTreeMap::new())
            .unwrap()
            .with_option("nullable", OptionValue::Bool(true));
        let out = lines(form(), entry);
        assert_eq!(out[1], "<option :value=\"null\"></option>");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_form_state_defaults() {
        let entry = Entry::column("string", "status")
            .unwrap()
            .with_option("default", OptionValue::Text("draft".into()));
        assert_eq!(lines(form_state(), entry), vec!["status: \"draft\","]);
        assert_eq!(
            lines(form_state(), Entry::column("boolean", "active").unwrap()),
            vec!["active: null,"]
        );
        let set = Entry::new("set", "tags", vec!["a".into()], BTreeMap::new()).unwrap();
        assert_eq!(lines(form_state(), set), vec!["tags: [],"]);
        assert!(lines(form_state(), Entry::column("timestamps", "").unwrap()).is_empty());
    }

    #[test]
    fn test_table_row_and_detail() {
        assert_eq!(
            lines(table_row(), Entry::column("string", "title").unwrap()),
            vec!["<td>{{ item.title }}</td>"]
        );
        assert_eq!(
            lines(detail(), Entry::column("string", "title").unwrap()),
            vec!["<tr><th>Title</th><td>{{ record.title }}</td></tr>"]
        );
        assert_eq!(
            lines(detail(), Entry::column("timestampsTz", "").unwrap()).len(),
            2
        );
    }

    #[test]
    fn test_table_head_shares_markup() {
        assert_eq!(
            lines(table_head(), Entry::column("string", "title").unwrap()),
            vec!["<th>Title</th>"]
        );
    }
}
