//! Transpiler traits and utilities.

use serde::{Deserialize, Serialize};

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
];

/// Escape an identifier if it's a reserved word or contains special chars.
pub fn escape_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false);

    if needs_escaping {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Trait for dialect-specific SQL generation.
pub trait Dialect {
    fn name(&self) -> &'static str;
    /// Placeholder for the parameter `name`, which is the `index`-th (1-based) bound.
    fn placeholder(&self, name: &str, index: usize) -> String;
    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String {
        escape_identifier(name)
    }
}

/// Named placeholders (`:ST_Buffer_1`), the default string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedDialect;

impl Dialect for NamedDialect {
    fn name(&self) -> &'static str {
        "named"
    }

    fn placeholder(&self, name: &str, _index: usize) -> String {
        format!(":{}", name)
    }
}

/// PostgreSQL positional placeholders (`$1`, `$2`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, _name: &str, index: usize) -> String {
        format!("${}", index)
    }
}

/// Dialect selector used by configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Named,
    Postgres,
}

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::Named => &NamedDialect,
            DialectKind::Postgres => &PostgresDialect,
        }
    }
}

impl std::str::FromStr for DialectKind {
    type Err = crate::error::GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "named" => Ok(DialectKind::Named),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            other => Err(crate::error::GeoError::argument(format!(
                "unknown dialect: '{}'. Expected: named or postgres",
                other
            ))),
        }
    }
}
