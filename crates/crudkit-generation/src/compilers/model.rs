//! Data-access model sections: fillable attributes, casts and traits

use crate::{
    compilers::{nothing, Compiler, RenderContext, INCREMENTS, SOFT_DELETES, TIMESTAMPS},
    models::{php_string, Entry, Fragment},
    signatures::Command,
};

/// `'title',` for every user-assignable column
pub fn fillable() -> Compiler {
    Compiler::new("fillable", fillable_column)
        .with_rules(INCREMENTS, nothing)
        .with_rules(TIMESTAMPS, nothing)
        .with_rules(SOFT_DELETES, nothing)
        .with_rule(Command::RememberToken, nothing)
        .with_rules(
            &[
                Command::Morphs,
                Command::NullableMorphs,
                Command::UuidMorphs,
                Command::NullableUuidMorphs,
            ],
            fillable_columns,
        )
}

/// `'published' => 'boolean',` for columns whose type needs casting
pub fn casts() -> Compiler {
    Compiler::new("casts", nothing)
        .with_rule(Command::Boolean, |_, entry| cast(entry, "boolean"))
        .with_rules(&[Command::Json, Command::Jsonb, Command::Set], |_, entry| {
            cast(entry, "array")
        })
        .with_rule(Command::Date, |_, entry| cast(entry, "date"))
        .with_rules(
            &[
                Command::DateTime,
                Command::DateTimeTz,
                Command::Timestamp,
                Command::TimestampTz,
            ],
            |_, entry| cast(entry, "datetime"),
        )
        .with_rules(&[Command::Float, Command::Double], |_, entry| {
            cast(entry, "float")
        })
        .with_rules(&[Command::Decimal, Command::UnsignedDecimal], decimal_cast)
}

/// Trait imports implied by declared columns
pub fn traits() -> Compiler {
    Compiler::new("traits", nothing).with_rules(SOFT_DELETES, |_, _| {
        "use \\Illuminate\\Database\\Eloquent\\SoftDeletes;".into()
    })
}

fn fillable_column(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    format!("{},", php_string(entry.column_name())).into()
}

fn fillable_columns(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    entry
        .columns()
        .iter()
        .map(|column| format!("{},", php_string(column)))
        .collect::<Vec<_>>()
        .into()
}

fn cast(entry: &Entry, to: &str) -> Fragment {
    format!("{} => {},", php_string(entry.column_name()), php_string(to)).into()
}

fn decimal_cast(_: &RenderContext<'_>, entry: &Entry) -> Fragment {
    let scale = entry.arguments().get(1).map(String::as_str).unwrap_or("2");
    cast(entry, &format!("decimal:{}", scale))
}
