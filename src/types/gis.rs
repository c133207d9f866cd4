//! `geometry` / `geography` column types.

use std::fmt;
use std::str::FromStr;

use crate::ast::{Expr, Value};
use crate::elements::{DEFAULT_SRID, GeometryValue, WkbData, WkbElement, srid};
use crate::error::GeoError;
use crate::transpiler::func;

/// Which PostGIS type family a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GisFamily {
    Geometry,
    Geography,
}

/// Geometry subtype constraint of a column (`geometry(POINT, 4326)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Geometry => "GEOMETRY",
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GeometryKind {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GEOMETRY" => Ok(GeometryKind::Geometry),
            "POINT" => Ok(GeometryKind::Point),
            "LINESTRING" => Ok(GeometryKind::LineString),
            "POLYGON" => Ok(GeometryKind::Polygon),
            "MULTIPOINT" => Ok(GeometryKind::MultiPoint),
            "MULTILINESTRING" => Ok(GeometryKind::MultiLineString),
            "MULTIPOLYGON" => Ok(GeometryKind::MultiPolygon),
            "GEOMETRYCOLLECTION" => Ok(GeometryKind::GeometryCollection),
            other => Err(GeoError::argument(format!("invalid geometry type: '{}'", other))),
        }
    }
}

/// A spatial column type.
///
/// Values are sent as EWKT text wrapped in [`bind_function`](Self::bind_function)
/// (or as EWKB hex, see [`bind_element`](Self::bind_element)) and selected
/// through [`column_function`](Self::column_function), so results always
/// arrive as (E)WKB and come back as [`WkbElement`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GisType {
    pub family: GisFamily,
    pub geometry_type: GeometryKind,
    pub srid: i32,
    /// 2, 3 (Z) or 4 (ZM)
    pub dimension: u8,
}

impl GisType {
    pub const fn geometry() -> Self {
        Self {
            family: GisFamily::Geometry,
            geometry_type: GeometryKind::Geometry,
            srid: DEFAULT_SRID,
            dimension: 2,
        }
    }

    pub const fn geography() -> Self {
        Self {
            family: GisFamily::Geography,
            geometry_type: GeometryKind::Geometry,
            srid: DEFAULT_SRID,
            dimension: 2,
        }
    }

    pub fn with_kind(mut self, geometry_type: GeometryKind) -> Self {
        self.geometry_type = geometry_type;
        self
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    pub fn with_dimension(mut self, dimension: u8) -> Self {
        self.dimension = dimension;
        self
    }

    /// Function used to turn bound text into a column value.
    pub fn bind_function(&self) -> &'static str {
        match self.family {
            GisFamily::Geometry => "ST_GeomFromEWKT",
            GisFamily::Geography => "ST_GeogFromText",
        }
    }

    /// Function reading the EWKB bytes of a bound WKB element.
    pub fn wkb_bind_function(&self) -> &'static str {
        match self.family {
            GisFamily::Geometry => "ST_GeomFromEWKB",
            GisFamily::Geography => "ST_GeogFromWKB",
        }
    }

    /// Function wrapped around the column when it is selected.
    pub fn column_function(&self) -> &'static str {
        match self.family {
            GisFamily::Geometry => "ST_AsEWKB",
            GisFamily::Geography => "ST_AsBinary",
        }
    }

    /// Whether selected values self-describe their SRID.
    pub fn extended(&self) -> bool {
        self.family == GisFamily::Geometry
    }

    pub fn bind_expression(&self, bind: impl Into<Expr>) -> Expr {
        func(self.bind_function(), [bind.into()])
    }

    pub fn column_expression(&self, column: impl Into<Expr>) -> Expr {
        func(self.column_function(), [column.into()])
    }

    /// Bind an element: EWKT through [`bind_function`](Self::bind_function),
    /// EWKB hex through `decode(.., 'hex')` and [`wkb_bind_function`](Self::wkb_bind_function).
    pub fn bind_element(&self, value: &GeometryValue) -> Expr {
        let bound = Expr::Literal(self.bind_value(value));
        match value {
            GeometryValue::Wkt(_) => func(self.bind_function(), [bound]),
            GeometryValue::Wkb(_) => func(
                self.wkb_bind_function(),
                [func("decode", [bound, Expr::from("hex")])],
            ),
        }
    }

    /// Convert an element into the text value that is bound for it.
    ///
    /// Plain elements get the SRID known for them, taken from the element
    /// first and the column second: WKT as an `SRID=<n>;` prefix, WKB
    /// stamped into its header. WKB goes out as EWKB hex.
    pub fn bind_value(&self, value: &GeometryValue) -> Value {
        match value {
            GeometryValue::Wkt(element) if element.extended() => {
                Value::String(element.data().to_string())
            }
            GeometryValue::Wkt(element) => match self.bind_srid(element.srid()) {
                Some(srid) => Value::String(format!("SRID={};{}", srid, element.data())),
                None => Value::String(element.data().to_string()),
            },
            GeometryValue::Wkb(element) if element.extended() => Value::String(element.desc()),
            GeometryValue::Wkb(element) => {
                let stamped = self.bind_srid(element.srid()).and_then(|target| {
                    element
                        .as_bytes()
                        .and_then(|bytes| srid::ewkb_with_srid(&bytes, target))
                });
                match stamped {
                    Some(ewkb) => Value::String(hex::encode(ewkb)),
                    None => Value::String(element.desc()),
                }
            }
        }
    }

    fn bind_srid(&self, element_srid: i32) -> Option<i32> {
        [element_srid, self.srid]
            .into_iter()
            .find(|&srid| srid != DEFAULT_SRID)
    }

    /// Re-wrap a payload returned by the database.
    pub fn result_value<D: Into<WkbData>>(&self, payload: Option<D>) -> Option<WkbElement> {
        payload.map(|data| WkbElement::with_options(data, self.srid, self.extended()))
    }
}

impl Default for GisType {
    fn default() -> Self {
        Self::geometry()
    }
}

impl fmt::Display for GisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = match self.family {
            GisFamily::Geometry => "geometry",
            GisFamily::Geography => "geography",
        };
        let suffix = match self.dimension {
            3 => "Z",
            4 => "ZM",
            _ => "",
        };
        if self.geometry_type == GeometryKind::Geometry
            && self.srid == DEFAULT_SRID
            && suffix.is_empty()
        {
            return write!(f, "{}", family);
        }
        write!(f, "{}({}{}", family, self.geometry_type, suffix)?;
        if self.srid != DEFAULT_SRID {
            write!(f, ",{}", self.srid)?;
        }
        write!(f, ")")
    }
}
