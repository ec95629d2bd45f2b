//! Server-rendered view sections: form fields, listing cells and detail rows
//!
//! Every fragment line is a complete element so that generated views stay
//! readable one field per line.

use crate::{
    compilers::{nothing, Compiler, RenderContext, INCREMENTS, SOFT_DELETES, STRUCTURAL, TIMESTAMPS},
    models::{php_string, Entry, Fragment, TIMESTAMP_COLUMNS},
    naming::label,
    signatures::Command,
};

/// Form fields for create and edit views
pub fn form() -> Compiler {
    Compiler::new("blade.form", input)
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

/// Listing table header cells
pub fn table_head() -> Compiler {
    Compiler::new("blade.table_head", |_, entry| {
        format!("<th>{}</th>", label(entry.column_name())).into()
    })
    .with_rules(TIMESTAMPS, |_, _| {
        TIMESTAMP_COLUMNS
            .iter()
            .map(|column| format!("<th>{}</th>", label(column)))
            .collect::<Vec<_>>()
            .into()
    })
    .with_rules(SOFT_DELETES, nothing)
    .with_rules(STRUCTURAL, nothing)
}

/// Listing table row cells
pub fn table_row() -> Compiler {
    Compiler::new("blade.table_row", |ctx, entry| {
        format!("<td>{}</td>", display(ctx, entry, entry.column_name())).into()
    })
    .with_rules(TIMESTAMPS, |ctx, entry| {
        TIMESTAMP_COLUMNS
            .iter()
            .map(|column| format!("<td>{}</td>", display(ctx, entry, column)))
            .collect::<Vec<_>>()
            .into()
    })
    .with_rules(SOFT_DELETES, nothing)
    .with_rules(STRUCTURAL, nothing)
}

/// Detail view rows
pub fn detail() -> Compiler {
    Compiler::new("blade.detail", |ctx, entry| {
        detail_row(ctx, entry, entry.column_name()).into()
    })
    .with_rules(TIMESTAMPS, |ctx, entry| {
        TIMESTAMP_COLUMNS
            .iter()
            .map(|column| detail_row(ctx, entry, column))
            .collect::<Vec<_>>()
            .into()
    })
    .with_rules(STRUCTURAL, nothing)
}

/// Blade echo of one attribute, formatted for display
fn display(ctx: &RenderContext<'_>, entry: &Entry, column: &str) -> String {
    let field = ctx.record_field(column);
    match entry.command() {
        Command::Boolean => format!("{{{{ {} ? 'Yes' : 'No' }}}}", field),
        Command::Set => format!("{{{{ implode(', ', (array) {}) }}}}", field),
        c if c.is_json() => format!("{{{{ json_encode({}) }}}}", field),
        _ => format!("{{{{ {} }}}}", field),
    }
}

fn detail_row(ctx: &RenderContext<'_>, entry: &Entry, column: &str) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>",
        label(column),
        display(ctx, entry, column)
    )
}

/// `old('title', $post->title)`
fn current_value(ctx: &RenderContext<'_>, column: &str) -> String {
    format!("old({}, {})", php_string(column), ctx.record_field(column))
}

fn required(entry: &Entry) -> &'static str {
    if entry.is_nullable() {
        ""
    } else {
        " required"
    }
}

fn input_type(command: Command) -> &'static str {
    match command {
        Command::Date => "date",
        Command::DateTime | Command::DateTimeTz | Command::Timestamp | Command::TimestampTz => {
            "datetime-local"
        }
        Command::Time | Command::TimeTz => "time",
        c if c.is_integer() || c.is_fractional() => "number",
        _ => "text",
    }
}

fn open_group(column: &str) -> String {
    format!(
        "<div class=\"mb-3\"><label for=\"{0}\" class=\"form-label\">{1}</label>",
        column,
        label(column)
    )
}

fn input(ctx: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let step = if entry.command().is_fractional() {
        " step=\"any\""
    } else {
        ""
    };
    format!(
        "{group}<input type=\"{kind}\" name=\"{column}\" id=\"{column}\" class=\"form-control\" value=\"{{{{ {value} }}}}\"{step}{required}></div>",
        group = open_group(column),
        kind = input_type(entry.command()),
        column = column,
        value = current_value(ctx, column),
        step = step,
        required = required(entry)
    )
    .into()
}

fn textarea(ctx: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    format!(
        "{}<textarea name=\"{}\" id=\"{}\" class=\"form-control\" rows=\"5\"{}>{{{{ {} }}}}</textarea></div>",
        open_group(column),
        column,
        column,
        required(entry),
        current_value(ctx, column)
    )
    .into()
}

/// A yes/no pair keeps "unset" distinguishable from "false"
fn radios(ctx: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let value = current_value(ctx, column);
    let title = label(column);
    vec![
        format!(
            "<div class=\"form-check\"><input type=\"radio\" name=\"{0}\" id=\"{0}_yes\" value=\"1\" class=\"form-check-input\" @checked({1})><label for=\"{0}_yes\" class=\"form-check-label\">{2}: Yes</label></div>",
            column, value, title
        ),
        format!(
            "<div class=\"form-check\"><input type=\"radio\" name=\"{0}\" id=\"{0}_no\" value=\"0\" class=\"form-check-input\" @checked(! {1})><label for=\"{0}_no\" class=\"form-check-label\">{2}: No</label></div>",
            column, value, title
        ),
    ]
    .into()
}

fn select(ctx: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let value = current_value(ctx, column);

    let mut lines = vec![format!(
        "{}<select name=\"{1}\" id=\"{1}\" class=\"form-control\"{2}>",
        open_group(column),
        column,
        required(entry)
    )];
    if entry.is_nullable() {
        lines.push("<option value=\"\"></option>".to_string());
    }
    lines.extend(entry.arguments().iter().map(|option| {
        format!(
            "<option value=\"{0}\" @selected({1} == {2})>{0}</option>",
            option,
            value,
            php_string(option)
        )
    }));
    lines.push("</select></div>".to_string());
    lines.into()
}

fn multi_select(ctx: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let column = entry.column_name();
    let value = format!(
        "(array) old({}, {} ?? [])",
        php_string(column),
        ctx.record_field(column)
    );

    let mut lines = vec![format!(
        "{}<select name=\"{1}[]\" id=\"{1}\" class=\"form-control\" multiple>",
        open_group(column),
        column
    )];
    lines.extend(entry.arguments().iter().map(|option| {
        format!(
            "<option value=\"{0}\" @selected(in_array({1}, {2}))>{0}</option>",
            option,
            php_string(option),
            value
        )
    }));
    lines.push("</select></div>".to_string());
    lines.into()
}

fn timestamp_notes(ctx: &RenderContext<'_>, _: &Entry) -> Fragment {
    TIMESTAMP_COLUMNS
        .iter()
        .map(|column| {
            format!(
                "<p class=\"form-text\">{}: {{{{ {} ?? '-' }}}}</p>",
                label(column),
                ctx.record_field(column)
            )
        })
        .collect::<Vec<_>>()
        .into()
}
