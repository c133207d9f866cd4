use super::SpatialElement;
use crate::ast::Expr;
use crate::error::{GeoError, GeoResult};
use crate::transpiler::ToSql;
use crate::types::SqlType;

/// One field of a composite (row-typed) value, e.g. `(ST_Dump(geom)).geom`.
///
/// It behaves as an expression of the field's own type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeElement {
    base: Box<Expr>,
    field: String,
    field_type: SqlType,
}

impl CompositeElement {
    pub fn new(base: impl Into<Expr>, field: impl Into<String>, field_type: SqlType) -> Self {
        Self {
            base: Box::new(base.into()),
            field: field.into(),
            field_type,
        }
    }

    /// Access `field` on `base`, typed from the base's composite type.
    pub fn from_composite(base: Expr, field: &str) -> GeoResult<Self> {
        let field_type = base
            .sql_type()
            .as_composite()
            .and_then(|composite| composite.field_type(field).cloned())
            .ok_or_else(|| GeoError::unknown_attribute(field))?;
        Ok(Self::new(base, field, field_type))
    }

    pub fn base(&self) -> &Expr {
        &self.base
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn field_type(&self) -> &SqlType {
        &self.field_type
    }
}

impl SpatialElement for CompositeElement {
    fn to_expr(&self) -> Expr {
        Expr::FieldAccess {
            expr: self.base.clone(),
            field: self.field.clone(),
            field_type: self.field_type.clone(),
        }
    }
}

impl std::fmt::Display for CompositeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_expr().to_sql())
    }
}

impl From<&CompositeElement> for Expr {
    fn from(element: &CompositeElement) -> Self {
        element.to_expr()
    }
}

impl From<CompositeElement> for Expr {
    fn from(element: CompositeElement) -> Self {
        element.to_expr()
    }
}
