//! Request validation rules

use crate::{
    compilers::{nothing, Compiler, RenderContext, INCREMENTS, SOFT_DELETES, STRUCTURAL, TIMESTAMPS},
    models::{php_string, Entry, Fragment},
    signatures::Command,
};

/// Default maximum length of string columns
const DEFAULT_STRING_LENGTH: &str = "255";

/// Rules compiler: one `'field' => [...]` line per user-editable column
pub fn compiler() -> Compiler {
    Compiler::new("rules", field_rules)
        .with_rules(INCREMENTS, nothing)
        .with_rules(TIMESTAMPS, nothing)
        .with_rules(SOFT_DELETES, nothing)
        .with_rules(STRUCTURAL, nothing)
        .with_rule(Command::Set, set_rules)
}

fn presence(entry: &Entry) -> &'static str {
    if entry.is_nullable() {
        "nullable"
    } else {
        "required"
    }
}

fn type_rules(entry: &Entry) -> Vec<String> {
    let command = entry.command();
    let mut rules = Vec::new();

    match command {
        Command::String | Command::Char => {
            let max = entry
                .arguments()
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_STRING_LENGTH);
            rules.push("string".to_string());
            rules.push(format!("max:{}", max));
        }
        Command::Boolean => rules.push("boolean".to_string()),
        Command::Date | Command::DateTime | Command::DateTimeTz => rules.push("date".to_string()),
        Command::Timestamp | Command::TimestampTz => rules.push("date".to_string()),
        Command::Time | Command::TimeTz => rules.push("date_format:H:i".to_string()),
        Command::Uuid => rules.push("uuid".to_string()),
        Command::IpAddress => rules.push("ip".to_string()),
        Command::MacAddress => rules.push("mac_address".to_string()),
        Command::Enum => rules.push(format!("in:{}", entry.arguments().join(","))),
        c if c.is_long_text() => rules.push("string".to_string()),
        c if c.is_integer() => rules.push("integer".to_string()),
        c if c.is_fractional() => rules.push("numeric".to_string()),
        c if c.is_json() => rules.push("array".to_string()),
        _ => {}
    }

    rules
}

/// Unique against the entity table, ignoring the record being updated
fn unique_rule(context: &RenderContext<'_>, entry: &Entry) -> String {
    let names = context.names();
    format!(
        "Rule::unique({}, {})->ignore($this->route({}))",
        php_string(&names.snake_plural),
        php_string(entry.column_name()),
        php_string(&names.snake_singular)
    )
}

fn quoted(rules: &[String]) -> Vec<String> {
    rules.iter().map(|r| php_string(r)).collect()
}

fn rule_line(field: &str, items: &[String]) -> String {
    format!("{} => [{}],", php_string(field), items.join(", "))
}

fn field_rules(context: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let mut rules = vec![presence(entry).to_string()];
    rules.extend(type_rules(entry));
    let mut items = quoted(&rules);
    if entry.flag("unique") {
        items.push(unique_rule(context, entry));
    }
    rule_line(entry.column_name(), &items).into()
}

/// A set is an array whose every element must be one of the allowed values
fn set_rules(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let field = entry.column_name();
    vec![
        rule_line(
            field,
            &quoted(&[presence(entry).to_string(), "array".to_string()]),
        ),
        rule_line(
            &format!("{}.*", field),
            &quoted(&[format!("in:{}", entry.arguments().join(","))]),
        ),
    ]
    .into()
}
