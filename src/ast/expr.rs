use crate::ast::{Column, Value};
use crate::elements::CompositeElement;
use crate::error::GeoResult;
use crate::transpiler::ToSql;
use crate::types::SqlType;

/// Binary operators usable between operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Bounding boxes intersect (&&)
    BboxIntersects,
    /// 2D distance (<->), used for KNN ordering
    Distance,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Eq => write!(f, "="),
            BinaryOp::Ne => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Lte => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Gte => write!(f, ">="),
            BinaryOp::BboxIntersects => write!(f, "&&"),
            BinaryOp::Distance => write!(f, "<->"),
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Column),
    /// Literal value, bound as a parameter
    Literal(Value),
    /// Function call expression (ST_Buffer, ST_GeomFromText, etc.)
    Function {
        name: String,
        args: Vec<Expr>,
        return_type: SqlType,
    },
    /// Field selection from composite: (row).field
    FieldAccess {
        expr: Box<Expr>,
        field: String,
        field_type: SqlType,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    /// The type this expression evaluates to.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Expr::Column(col) => col.sql_type.clone(),
            Expr::Literal(value) => value.sql_type(),
            Expr::Function { return_type, .. } => return_type.clone(),
            Expr::FieldAccess { field_type, .. } => field_type.clone(),
            Expr::Binary { op, .. } => match op {
                BinaryOp::Distance => SqlType::Float,
                _ => SqlType::Boolean,
            },
        }
    }

    pub fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn equals(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn not_equals(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Ne, right)
    }

    pub fn bbox_intersects(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::BboxIntersects, right)
    }

    pub fn distance(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Distance, right)
    }

    /// Address one field of a composite-typed expression.
    ///
    /// Fails with [`GeoError::UnknownAttribute`](crate::error::GeoError::UnknownAttribute)
    /// when the expression is not a row type or has no such field.
    pub fn field(self, name: &str) -> GeoResult<CompositeElement> {
        CompositeElement::from_composite(self, name)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<Column> for Expr {
    fn from(col: Column) -> Self {
        Expr::Column(col)
    }
}

impl From<&Column> for Expr {
    fn from(col: &Column) -> Self {
        Expr::Column(col.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Literal(b.into())
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Literal(n.into())
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Literal(n.into())
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Literal(n.into())
    }
}

impl From<&str> for Expr {
    /// Strings are literals; use [`Column`] to reference a column.
    fn from(s: &str) -> Self {
        Expr::Literal(s.into())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(s.into())
    }
}

impl From<Vec<u8>> for Expr {
    fn from(bytes: Vec<u8>) -> Self {
        Expr::Literal(bytes.into())
    }
}
