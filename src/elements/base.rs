use crate::ast::{Column, Expr};
use crate::error::{GeoError, GeoResult};
use crate::functions::{self, FunctionSpec};

/// A spatial function bound to the element it was looked up on.
///
/// Calling it builds `name(<element>, args...)`; the element always comes
/// first, wrapped the way [`SpatialElement::to_expr`] wraps it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFunction {
    spec: FunctionSpec,
    target: Expr,
}

impl SpatialFunction {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    pub fn call<I>(&self, args: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        let mut call_args = vec![self.target.clone()];
        call_args.extend(args.into_iter().map(Into::into));
        Expr::Function {
            name: self.spec.name.clone(),
            args: call_args,
            return_type: self.spec.return_type(),
        }
    }
}

/// Anything usable as a query operand that can also have spatial
/// functions called on it.
pub trait SpatialElement {
    /// This element as an expression operand.
    fn to_expr(&self) -> Expr;

    /// Look up a spatial function by name.
    ///
    /// Only names following the `ST_` convention resolve; every other name
    /// fails with [`GeoError::UnknownAttribute`].
    fn function(&self, name: &str) -> GeoResult<SpatialFunction> {
        let spec = functions::lookup(name).ok_or_else(|| GeoError::unknown_attribute(name))?;
        Ok(SpatialFunction {
            spec,
            target: self.to_expr(),
        })
    }

    fn has_function(&self, name: &str) -> bool {
        functions::lookup(name).is_some()
    }

    /// `name(self, args...)`
    fn call<I>(&self, name: &str, args: I) -> GeoResult<Expr>
    where
        Self: Sized,
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Ok(self.function(name)?.call(args))
    }

    /// `name(self)`
    fn apply(&self, name: &str) -> GeoResult<Expr> {
        Ok(self.function(name)?.call(std::iter::empty::<Expr>()))
    }
}

impl SpatialElement for Expr {
    fn to_expr(&self) -> Expr {
        self.clone()
    }
}

impl SpatialElement for Column {
    fn to_expr(&self) -> Expr {
        Expr::Column(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlType;

    #[test]
    fn test_column_function_call() {
        let col = Column::new(Some("lake"), "geom", SqlType::geometry());
        let expr = col.call("ST_Buffer", [10]).unwrap();
        assert_eq!(expr.to_string(), "ST_Buffer(lake.geom, :ST_Buffer_1)");
        assert_eq!(expr.sql_type(), SqlType::geometry());
    }

    #[test]
    fn test_chained_calls() {
        let col = Column::named("geom", SqlType::geometry());
        let area = col.call("ST_Buffer", [2]).unwrap().apply("ST_Area").unwrap();
        assert_eq!(area.to_string(), "ST_Area(ST_Buffer(geom, :ST_Buffer_1))");
        assert_eq!(area.sql_type(), SqlType::Float);
    }

    #[test]
    fn test_unknown_name() {
        let col = Column::named("geom", SqlType::geometry());
        assert!(matches!(
            col.function("foo"),
            Err(GeoError::UnknownAttribute { ref name }) if name == "foo"
        ));
        assert!(!col.has_function("foo"));
        assert!(col.has_function("ST_Area"));
    }

    #[test]
    fn test_bound_function() {
        let col = Column::named("geom", SqlType::geometry());
        let buffer = col.function("ST_Buffer").unwrap();
        assert_eq!(buffer.name(), "ST_Buffer");
        assert!(buffer.spec().is_registered());
        assert_eq!(buffer.call([1]), buffer.call([1]));
    }
}
