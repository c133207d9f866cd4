//! Column and expression types.
//!
//! [`SqlType`] is what an expression reports through [`Expr::sql_type`](crate::ast::Expr::sql_type).
//! The spatial column types (`GisType`) also carry the hooks the column layer
//! needs: wrapping bind parameters and selected columns in conversion
//! functions, and turning database payloads back into elements.

mod composite;
mod gis;

pub use composite::CompositeType;
pub use gis::{GeometryKind, GisFamily, GisType};

/// The type of a column or expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlType {
    #[default]
    Unknown,
    Text,
    Integer,
    Float,
    Boolean,
    Bytea,
    Array(Box<SqlType>),
    Gis(GisType),
    /// Row type with named fields
    Composite(CompositeType),
}

impl SqlType {
    /// Shorthand for a plain `geometry` column type.
    pub fn geometry() -> Self {
        SqlType::Gis(GisType::geometry())
    }

    /// Shorthand for a plain `geography` column type.
    pub fn geography() -> Self {
        SqlType::Gis(GisType::geography())
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self, SqlType::Gis(_))
    }

    pub fn as_gis(&self) -> Option<&GisType> {
        match self {
            SqlType::Gis(gis) => Some(gis),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeType> {
        match self {
            SqlType::Composite(composite) => Some(composite),
            _ => None,
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlType::Unknown => write!(f, "unknown"),
            SqlType::Text => write!(f, "text"),
            SqlType::Integer => write!(f, "integer"),
            SqlType::Float => write!(f, "double precision"),
            SqlType::Boolean => write!(f, "boolean"),
            SqlType::Bytea => write!(f, "bytea"),
            SqlType::Array(inner) => write!(f, "{}[]", inner),
            SqlType::Gis(gis) => write!(f, "{}", gis),
            SqlType::Composite(composite) => write!(f, "{}", composite.name),
        }
    }
}

impl From<GisType> for SqlType {
    fn from(gis: GisType) -> Self {
        SqlType::Gis(gis)
    }
}

impl From<CompositeType> for SqlType {
    fn from(composite: CompositeType) -> Self {
        SqlType::Composite(composite)
    }
}
