use crate::ast::Expr;
use crate::transpiler::{Dialect, NamedDialect};
use crate::types::SqlType;

/// A table column reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
    pub sql_type: SqlType,
    /// Column default (any operand, including spatial elements)
    pub default: Option<Box<Expr>>,
}

impl Column {
    pub fn new(table: Option<&str>, name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            table: table.map(str::to_string),
            name: name.into(),
            sql_type,
            default: None,
        }
    }

    /// A column without table qualification.
    pub fn named(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(None, name, sql_type)
    }

    pub fn with_default(mut self, default: impl Into<Expr>) -> Self {
        self.default = Some(Box::new(default.into()));
        self
    }

    pub fn default_expr(&self) -> Option<&Expr> {
        self.default.as_deref()
    }

    /// `table.name`, each part quoted by the dialect when needed.
    pub fn qualified(&self, dialect: &dyn Dialect) -> String {
        match &self.table {
            Some(table) => format!(
                "{}.{}",
                dialect.quote_identifier(table),
                dialect.quote_identifier(&self.name)
            ),
            None => dialect.quote_identifier(&self.name),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified(&NamedDialect))
    }
}
