//! SQL Transpiler for expression trees.
//!
//! Literals never appear inline: each one becomes a placeholder and an
//! entry in [`Params`]. Parameter names follow the enclosing function, so
//! `ST_Buffer(ST_GeomFromText('POINT(1 2)', -1), 2)` compiles to
//! `ST_Buffer(ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2), :ST_Buffer_1)`.

mod params;
mod traits;

pub use params::{ParamContext, Params};
pub use traits::{Dialect, DialectKind, NamedDialect, PostgresDialect, RESERVED_WORDS, escape_identifier};

use crate::ast::Expr;
use crate::functions;

/// Owner name for literals outside any function call.
const DEFAULT_PARAM_OWNER: &str = "param";

/// SQL text plus the parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Params,
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    fn compile_with(&self, dialect: &dyn Dialect) -> Compiled;

    /// Compile with named placeholders.
    fn compile(&self) -> Compiled {
        self.compile_with(&NamedDialect)
    }

    /// SQL text with named placeholders.
    fn to_sql(&self) -> String {
        self.compile().sql
    }
}

impl ToSql for Expr {
    fn compile_with(&self, dialect: &dyn Dialect) -> Compiled {
        compile(self, dialect)
    }
}

/// Build a function call expression, e.g. `func("ST_Equals", [a, b])`.
///
/// The return type comes from the spatial function registry when the name
/// is registered there.
pub fn func<I>(name: &str, args: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let return_type = functions::lookup(name)
        .map(|spec| spec.return_type())
        .unwrap_or_default();
    Expr::Function {
        name: name.to_string(),
        args: args.into_iter().map(Into::into).collect(),
        return_type,
    }
}

/// Compile an expression against a dialect.
pub fn compile(expr: &Expr, dialect: &dyn Dialect) -> Compiled {
    let mut ctx = ParamContext::new();
    let sql = expr_to_sql(expr, dialect, &mut ctx, DEFAULT_PARAM_OWNER);
    let params = ctx.into_params();
    tracing::trace!(dialect = dialect.name(), params = params.len(), "compiled {}", sql);
    Compiled { sql, params }
}

fn expr_to_sql(expr: &Expr, dialect: &dyn Dialect, ctx: &mut ParamContext, owner: &str) -> String {
    match expr {
        Expr::Column(col) => col.qualified(dialect),
        Expr::Literal(value) => ctx.add_param(owner, value.clone(), dialect),
        Expr::Function { name, args, .. } => {
            let args: Vec<String> = args
                .iter()
                .map(|arg| expr_to_sql(arg, dialect, ctx, name))
                .collect();
            format!("{}({})", name, args.join(", "))
        }
        Expr::FieldAccess { expr, field, .. } => {
            let base = expr_to_sql(expr, dialect, ctx, owner);
            format!("({}).{}", base, dialect.quote_identifier(field))
        }
        Expr::Binary { left, op, right } => {
            // Literals compared against a column are named after it
            let owner = match left.as_ref() {
                Expr::Column(col) => col.name.as_str(),
                _ => DEFAULT_PARAM_OWNER,
            };
            let left = expr_to_sql(left, dialect, ctx, owner);
            let right = expr_to_sql(right, dialect, ctx, owner);
            format!("{} {} {}", left, op, right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Column, Value};
    use crate::types::SqlType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_function_params() {
        let inner = func("ST_GeomFromText", [Expr::from("POINT(1 2)"), Expr::from(-1)]);
        let outer = func("ST_Buffer", [inner, Expr::from(2)]);
        let compiled = outer.compile();
        assert_eq!(
            compiled.sql,
            "ST_Buffer(ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2), :ST_Buffer_1)"
        );
        assert_eq!(compiled.params.get("ST_Buffer_1"), Some(&Value::Int(2)));
        assert_eq!(
            compiled.params.get("ST_GeomFromText_1"),
            Some(&Value::from("POINT(1 2)"))
        );
    }

    #[test]
    fn test_postgres_dialect() {
        let col = Column::new(Some("table"), "geom", SqlType::geometry());
        let expr = func(
            "ST_DWithin",
            [Expr::from(&col), func("ST_GeomFromEWKT", ["SRID=4326;POINT(1 2)"]), Expr::from(10.0)],
        );
        let compiled = expr.compile_with(&PostgresDialect);
        assert_eq!(
            compiled.sql,
            "ST_DWithin(\"table\".geom, ST_GeomFromEWKT($1), $2)"
        );
        let values: Vec<&Value> = compiled.params.values().collect();
        assert_eq!(values, [&Value::from("SRID=4326;POINT(1 2)"), &Value::Float(10.0)]);
    }

    #[test]
    fn test_func_return_type() {
        assert_eq!(func("ST_Area", [Expr::from(1)]).sql_type(), SqlType::Float);
        assert_eq!(func("lower", ["A"]).sql_type(), SqlType::Unknown);
    }

    #[test]
    fn test_literal_outside_function() {
        let compiled = Expr::from(5).compile();
        assert_eq!(compiled.sql, ":param_1");
        assert_eq!(compiled.params.get("param_1"), Some(&Value::Int(5)));
    }
}
