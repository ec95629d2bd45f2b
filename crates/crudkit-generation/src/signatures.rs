//! The known command signature set
//!
//! Every entry of an entity declares one of these commands. The set is closed:
//! parsing a tag outside of it is an [`GenerationError::UnknownCommand`].

use std::{fmt, str::FromStr};

use crate::error::GenerationError;

/// What kind of declaration a command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// A single named column
    Column,
    /// A composite that expands to one or more synthesized columns
    Group,
    /// An index over other columns
    Index,
}

/// Whether an entry of this command carries a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// A name must be given
    Required,
    /// A name may be given
    Optional,
    /// The command synthesizes its own names
    Empty,
}

/// Positional arguments a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    /// No arguments
    None,
    /// Up to this many scalar parameters (lengths, precision)
    Scalars(usize),
    /// One or more listed values (allowed values, indexed columns)
    Values,
}

/// Static description of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Declaration kind
    pub kind: CommandKind,
    /// Name requirement
    pub name: NameRule,
    /// Accepted arguments
    pub arguments: ArgumentShape,
}

macro_rules! commands {
    ($($variant:ident => $tag:literal, $kind:ident, $name:ident, $args:expr;)+) => {
        /// A command tag from the known signature set
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Command {
            $(
                #[doc = concat!("`", $tag, "`")]
                $variant,
            )+
        }

        impl Command {
            /// Every known command, in declaration order
            pub const ALL: &'static [Command] = &[$(Command::$variant,)+];

            /// The wire tag of this command
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Command::$variant => $tag,)+
                }
            }

            /// The signature of this command
            pub fn signature(&self) -> Signature {
                match self {
                    $(Command::$variant => Signature {
                        kind: CommandKind::$kind,
                        name: NameRule::$name,
                        arguments: $args,
                    },)+
                }
            }
        }
    };
}

commands! {
    BigIncrements => "bigIncrements", Column, Required, ArgumentShape::None;
    BigInteger => "bigInteger", Column, Required, ArgumentShape::None;
    Binary => "binary", Column, Required, ArgumentShape::None;
    Boolean => "boolean", Column, Required, ArgumentShape::None;
    Char => "char", Column, Required, ArgumentShape::Scalars(1);
    Date => "date", Column, Required, ArgumentShape::None;
    DateTime => "dateTime", Column, Required, ArgumentShape::None;
    DateTimeTz => "dateTimeTz", Column, Required, ArgumentShape::None;
    Decimal => "decimal", Column, Required, ArgumentShape::Scalars(2);
    Double => "double", Column, Required, ArgumentShape::Scalars(2);
    Enum => "enum", Column, Required, ArgumentShape::Values;
    Float => "float", Column, Required, ArgumentShape::Scalars(2);
    Geometry => "geometry", Column, Required, ArgumentShape::None;
    Increments => "increments", Column, Required, ArgumentShape::None;
    Integer => "integer", Column, Required, ArgumentShape::None;
    IpAddress => "ipAddress", Column, Required, ArgumentShape::None;
    Json => "json", Column, Required, ArgumentShape::None;
    Jsonb => "jsonb", Column, Required, ArgumentShape::None;
    LongText => "longText", Column, Required, ArgumentShape::None;
    MacAddress => "macAddress", Column, Required, ArgumentShape::None;
    MediumIncrements => "mediumIncrements", Column, Required, ArgumentShape::None;
    MediumInteger => "mediumInteger", Column, Required, ArgumentShape::None;
    MediumText => "mediumText", Column, Required, ArgumentShape::None;
    Point => "point", Column, Required, ArgumentShape::None;
    Polygon => "polygon", Column, Required, ArgumentShape::None;
    Set => "set", Column, Required, ArgumentShape::Values;
    SmallIncrements => "smallIncrements", Column, Required, ArgumentShape::None;
    SmallInteger => "smallInteger", Column, Required, ArgumentShape::None;
    String => "string", Column, Required, ArgumentShape::Scalars(1);
    Text => "text", Column, Required, ArgumentShape::None;
    Time => "time", Column, Required, ArgumentShape::None;
    TimeTz => "timeTz", Column, Required, ArgumentShape::None;
    Timestamp => "timestamp", Column, Required, ArgumentShape::None;
    TimestampTz => "timestampTz", Column, Required, ArgumentShape::None;
    TinyIncrements => "tinyIncrements", Column, Required, ArgumentShape::None;
    TinyInteger => "tinyInteger", Column, Required, ArgumentShape::None;
    UnsignedBigInteger => "unsignedBigInteger", Column, Required, ArgumentShape::None;
    UnsignedDecimal => "unsignedDecimal", Column, Required, ArgumentShape::Scalars(2);
    UnsignedInteger => "unsignedInteger", Column, Required, ArgumentShape::None;
    UnsignedMediumInteger => "unsignedMediumInteger", Column, Required, ArgumentShape::None;
    UnsignedSmallInteger => "unsignedSmallInteger", Column, Required, ArgumentShape::None;
    UnsignedTinyInteger => "unsignedTinyInteger", Column, Required, ArgumentShape::None;
    Uuid => "uuid", Column, Required, ArgumentShape::None;
    Year => "year", Column, Required, ArgumentShape::None;

    Timestamps => "timestamps", Group, Empty, ArgumentShape::None;
    TimestampsTz => "timestampsTz", Group, Empty, ArgumentShape::None;
    NullableTimestamps => "nullableTimestamps", Group, Empty, ArgumentShape::None;
    SoftDeletes => "softDeletes", Group, Optional, ArgumentShape::None;
    SoftDeletesTz => "softDeletesTz", Group, Optional, ArgumentShape::None;
    RememberToken => "rememberToken", Group, Empty, ArgumentShape::None;
    Morphs => "morphs", Group, Required, ArgumentShape::None;
    NullableMorphs => "nullableMorphs", Group, Required, ArgumentShape::None;
    UuidMorphs => "uuidMorphs", Group, Required, ArgumentShape::None;
    NullableUuidMorphs => "nullableUuidMorphs", Group, Required, ArgumentShape::None;

    Primary => "primary", Index, Optional, ArgumentShape::Values;
    Unique => "unique", Index, Optional, ArgumentShape::Values;
    Index => "index", Index, Optional, ArgumentShape::Values;
    SpatialIndex => "spatialIndex", Index, Optional, ArgumentShape::Values;
}

impl Command {
    /// Look up a command by tag
    ///
    /// An exact match wins; otherwise a case-insensitive match is accepted.
    pub fn parse(tag: &str) -> Result<Self, GenerationError> {
        let tag = tag.trim();
        Self::ALL
            .iter()
            .find(|c| c.tag() == tag)
            .or_else(|| Self::ALL.iter().find(|c| c.tag().eq_ignore_ascii_case(tag)))
            .copied()
            .ok_or_else(|| GenerationError::UnknownCommand {
                command: tag.to_string(),
            })
    }

    /// Declaration kind shortcut
    pub fn kind(&self) -> CommandKind {
        self.signature().kind
    }

    /// Whether this command declares an index rather than a column
    pub fn is_index(&self) -> bool {
        self.kind() == CommandKind::Index
    }

    /// Auto-incrementing primary key columns
    pub fn is_increments(&self) -> bool {
        matches!(
            self,
            Command::Increments
                | Command::BigIncrements
                | Command::MediumIncrements
                | Command::SmallIncrements
                | Command::TinyIncrements
        )
    }

    /// Created-at / updated-at pairs
    pub fn is_timestamps(&self) -> bool {
        matches!(
            self,
            Command::Timestamps | Command::TimestampsTz | Command::NullableTimestamps
        )
    }

    /// Soft-delete columns
    pub fn is_soft_delete(&self) -> bool {
        matches!(self, Command::SoftDeletes | Command::SoftDeletesTz)
    }

    /// Polymorphic relation column pairs
    pub fn is_morph(&self) -> bool {
        matches!(
            self,
            Command::Morphs
                | Command::NullableMorphs
                | Command::UuidMorphs
                | Command::NullableUuidMorphs
        )
    }

    /// Integer-valued columns
    pub fn is_integer(&self) -> bool {
        self.is_increments()
            || matches!(
                self,
                Command::BigInteger
                    | Command::Integer
                    | Command::MediumInteger
                    | Command::SmallInteger
                    | Command::TinyInteger
                    | Command::UnsignedBigInteger
                    | Command::UnsignedInteger
                    | Command::UnsignedMediumInteger
                    | Command::UnsignedSmallInteger
                    | Command::UnsignedTinyInteger
                    | Command::Year
            )
    }

    /// Fractional numeric columns
    pub fn is_fractional(&self) -> bool {
        matches!(
            self,
            Command::Decimal | Command::UnsignedDecimal | Command::Double | Command::Float
        )
    }

    /// Long text columns
    pub fn is_long_text(&self) -> bool {
        matches!(self, Command::Text | Command::MediumText | Command::LongText)
    }

    /// JSON document columns
    pub fn is_json(&self) -> bool {
        matches!(self, Command::Json | Command::Jsonb)
    }
}

impl FromStr for Command {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
