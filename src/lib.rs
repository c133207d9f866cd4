//! # qail-geo — spatial elements for QAIL expressions
//!
//! Embed WKT/EWKT and WKB/EWKB geometries in SQL expressions and call
//! PostGIS `ST_*` functions on them.
//!
//! ## Quick Example
//!
//! ```
//! use qail_geo::prelude::*;
//!
//! let point = WktElement::new("POINT(1 2)");
//! let buffer = point.call("ST_Buffer", [2]).unwrap();
//!
//! assert_eq!(
//!     buffer.to_sql(),
//!     "ST_Buffer(ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2), :ST_Buffer_1)"
//! );
//! assert_eq!(buffer.compile().params.get("ST_GeomFromText_2"), Some(&Value::Int(-1)));
//! ```
//!
//! ## Elements
//!
//! | Element            | Constructor function          | SRID argument |
//! |--------------------|-------------------------------|---------------|
//! | `WktElement`       | `ST_GeomFromText`             | yes           |
//! | `WktElement` (ext) | `ST_GeomFromEWKT`             | no            |
//! | `WkbElement`       | `ST_GeomFromWKB`              | yes           |
//! | `WkbElement` (ext) | `ST_GeomFromEWKB`             | no            |
//! | `CompositeElement` | none, renders `(base).field`  | no            |

pub mod ast;
pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
pub mod functions;
pub mod transpiler;
pub mod types;

pub use transpiler::func;

pub mod prelude {
    pub use crate::ast::{BinaryOp, Column, Expr, Value};
    pub use crate::config::GeoConfig;
    pub use crate::elements::{
        CompositeElement, DEFAULT_SRID, GeometryValue, SpatialElement, SpatialFunction, WkbData,
        WkbElement, WktElement,
    };
    pub use crate::engine::{Fetched, GeoDB};
    pub use crate::error::*;
    pub use crate::transpiler::{Compiled, Dialect, NamedDialect, PostgresDialect, ToSql, func};
    pub use crate::types::{CompositeType, GeometryKind, GisType, SqlType};
}
