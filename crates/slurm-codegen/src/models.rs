use std::fmt;
use std::str::FromStr;

/// Target type expression, independent of how a language spells it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeExpr {
    Named(String),
    Sequence(Box<TypeExpr>),
    Map(Box<TypeExpr>),
    Timestamp,
    Any,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(name.into())
    }

    pub fn sequence(inner: TypeExpr) -> Self {
        TypeExpr::Sequence(Box::new(inner))
    }

    pub fn map(value: TypeExpr) -> Self {
        TypeExpr::Map(Box::new(value))
    }

    /// Reads the Go spelling used in configuration documents:
    /// `[]X`, `map[string]X`, `time.Time`, `interface{}`/`any`, else a name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(inner) = raw.strip_prefix("[]") {
            return TypeExpr::sequence(TypeExpr::parse(inner));
        }
        if let Some(inner) = raw.strip_prefix("map[string]") {
            return TypeExpr::map(TypeExpr::parse(inner));
        }
        match raw {
            "time.Time" => TypeExpr::Timestamp,
            "interface{}" | "any" => TypeExpr::Any,
            other => TypeExpr::named(other),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeExpr::Sequence(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeExpr::Map(_))
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, TypeExpr::Timestamp)
    }

    pub fn mentions_timestamp(&self) -> bool {
        match self {
            TypeExpr::Timestamp => true,
            TypeExpr::Sequence(inner) | TypeExpr::Map(inner) => inner.mentions_timestamp(),
            TypeExpr::Named(_) | TypeExpr::Any => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Sequence(inner) => write!(f, "[]{inner}"),
            TypeExpr::Map(inner) => write!(f, "map[string]{inner}"),
            TypeExpr::Timestamp => f.write_str("time.Time"),
            TypeExpr::Any => f.write_str("interface{}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    pub ident: String,
    pub type_expr: TypeExpr,
    pub wire_name: String,
    pub required: bool,
    pub description: String,
}

impl ResolvedField {
    /// Required fields, sequences, maps and timestamps already have a usable
    /// zero value and are never wrapped.
    pub fn is_nullable(&self) -> bool {
        !self.required
            && !self.type_expr.is_sequence()
            && !self.type_expr.is_map()
            && !self.type_expr.is_timestamp()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedType {
    pub type_name: String,
    pub schema_name: String,
    pub fields: Vec<ResolvedField>,
    pub nested: Vec<GeneratedType>,
    pub enums: Vec<EnumType>,
    pub field_count: usize,
    pub nested_unit: bool,
}

impl GeneratedType {
    /// True when this type or any nested type has a timestamp field.
    pub fn uses_timestamp(&self) -> bool {
        self.fields.iter().any(|f| f.type_expr.mentions_timestamp())
            || self.nested.iter().any(GeneratedType::uses_timestamp)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub type_name: String,
    pub schema_name: String,
    pub field_count: usize,
    pub contents: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Full,
    Compact,
    Minimal,
}

impl FromStr for OutputFormat {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(OutputFormat::Full),
            "compact" => Ok(OutputFormat::Compact),
            "minimal" => Ok(OutputFormat::Minimal),
            other => eyre::bail!("unknown output format: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn field(type_expr: TypeExpr, required: bool) -> ResolvedField {
        ResolvedField {
            ident: "Name".into(),
            type_expr,
            wire_name: "name".into(),
            required,
            description: String::new(),
        }
    }

    #[test]
    fn parses_go_spellings() {
        assert_eq!(TypeExpr::parse("uint32"), TypeExpr::named("uint32"));
        assert_eq!(
            TypeExpr::parse("[]AssocShort"),
            TypeExpr::sequence(TypeExpr::named("AssocShort"))
        );
        assert_eq!(TypeExpr::parse("map[string]interface{}"), TypeExpr::map(TypeExpr::Any));
        assert_eq!(TypeExpr::parse("time.Time"), TypeExpr::Timestamp);
    }

    #[test]
    fn displays_go_spellings() {
        let expr = TypeExpr::map(TypeExpr::sequence(TypeExpr::Timestamp));

        assert_eq!(expr.to_string(), "map[string][]time.Time");
        assert!(expr.mentions_timestamp());
    }

    #[test]
    fn optional_scalars_are_nullable() {
        assert!(field(TypeExpr::named("string"), false).is_nullable());
        assert!(!field(TypeExpr::named("string"), true).is_nullable());
    }

    #[test]
    fn zero_value_types_are_never_nullable() {
        assert!(!field(TypeExpr::sequence(TypeExpr::named("string")), false).is_nullable());
        assert!(!field(TypeExpr::map(TypeExpr::Any), false).is_nullable());
        assert!(!field(TypeExpr::Timestamp, false).is_nullable());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("compact".parse::<OutputFormat>().unwrap(), OutputFormat::Compact);
        assert!("verbose".parse::<OutputFormat>().is_err());
    }
}
