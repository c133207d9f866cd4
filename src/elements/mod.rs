//! Spatial elements: geometry payloads usable as query operands.
//!
//! [`WktElement`] and [`WkbElement`] wrap raw geometries and lower into
//! their constructor call (`ST_GeomFromText(data, srid)`,
//! `ST_GeomFromEWKB(data)`, ...). [`CompositeElement`] addresses one field
//! of a row-typed value. All of them implement [`SpatialElement`], so
//! `ST_*` functions can be called on them by name.

mod base;
mod composite;
pub mod srid;
mod state;
mod wkb;
mod wkt;

pub use base::{SpatialElement, SpatialFunction};
pub use composite::CompositeElement;
pub use state::ElementState;
pub use wkb::{WkbData, WkbElement};
pub use wkt::WktElement;

use crate::ast::Expr;

/// SRID of a geometry whose reference system is unknown.
pub const DEFAULT_SRID: i32 = -1;

/// Either geometry element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryValue {
    Wkt(WktElement),
    Wkb(WkbElement),
}

impl GeometryValue {
    pub fn srid(&self) -> i32 {
        match self {
            GeometryValue::Wkt(e) => e.srid(),
            GeometryValue::Wkb(e) => e.srid(),
        }
    }

    pub fn extended(&self) -> bool {
        match self {
            GeometryValue::Wkt(e) => e.extended(),
            GeometryValue::Wkb(e) => e.extended(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeometryValue::Wkt(e) => e.name(),
            GeometryValue::Wkb(e) => e.name(),
        }
    }

    pub fn desc(&self) -> String {
        match self {
            GeometryValue::Wkt(e) => e.desc(),
            GeometryValue::Wkb(e) => e.desc(),
        }
    }
}

impl SpatialElement for GeometryValue {
    fn to_expr(&self) -> Expr {
        match self {
            GeometryValue::Wkt(e) => e.to_expr(),
            GeometryValue::Wkb(e) => e.to_expr(),
        }
    }
}

impl std::fmt::Display for GeometryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.desc())
    }
}

impl From<WktElement> for GeometryValue {
    fn from(element: WktElement) -> Self {
        GeometryValue::Wkt(element)
    }
}

impl From<WkbElement> for GeometryValue {
    fn from(element: WkbElement) -> Self {
        GeometryValue::Wkb(element)
    }
}

impl From<&GeometryValue> for Expr {
    fn from(value: &GeometryValue) -> Self {
        value.to_expr()
    }
}

impl From<GeometryValue> for Expr {
    fn from(value: GeometryValue) -> Self {
        value.to_expr()
    }
}
