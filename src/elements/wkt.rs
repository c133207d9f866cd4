use serde::{Deserialize, Serialize};

use super::srid;
use super::state::{self, ElementState};
use super::{DEFAULT_SRID, SpatialElement};
use crate::ast::{Expr, Value};
use crate::error::{GeoError, GeoResult};
use crate::types::{GisType, SqlType};

/// A geometry given as WKT or EWKT text.
///
/// ```
/// use qail_geo::prelude::*;
///
/// let point = WktElement::from_ewkt("SRID=4326;POINT(1 2)").unwrap();
/// assert_eq!(point.srid(), 4326);
/// assert_eq!(point.name(), "ST_GeomFromEWKT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ElementState<String>", try_from = "ElementState<String>")]
pub struct WktElement {
    data: String,
    srid: i32,
    extended: bool,
}

impl WktElement {
    pub const GEOM_FROM_TEXT: &'static str = "ST_GeomFromText";
    pub const GEOM_FROM_EWKT: &'static str = "ST_GeomFromEWKT";

    /// Plain WKT with an unknown SRID.
    pub fn new(data: impl Into<String>) -> Self {
        Self::with_srid(data, DEFAULT_SRID)
    }

    /// Plain WKT with an explicit SRID.
    pub fn with_srid(data: impl Into<String>, srid: i32) -> Self {
        Self {
            data: data.into(),
            srid,
            extended: false,
        }
    }

    /// EWKT, SRID read from its `SRID=<n>;` marker when there is one.
    pub fn from_ewkt(data: impl Into<String>) -> GeoResult<Self> {
        Self::with_options(data, DEFAULT_SRID, true)
    }

    /// General constructor.
    ///
    /// For extended data an explicit `srid` (anything but -1) wins over the
    /// marker, and the marker is not parsed at all. `data` is never rewritten.
    pub fn with_options(data: impl Into<String>, srid: i32, extended: bool) -> GeoResult<Self> {
        let data = data.into();
        let mut srid = srid;
        if extended && srid == DEFAULT_SRID {
            if let Some(parsed) = srid::ewkt_srid(&data)? {
                tracing::debug!(srid = parsed, "SRID read from EWKT marker");
                srid = parsed;
            }
        }
        Ok(Self {
            data,
            srid,
            extended,
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn extended(&self) -> bool {
        self.extended
    }

    /// Constructor function wrapped around this element in expressions.
    pub fn name(&self) -> &'static str {
        if self.extended {
            Self::GEOM_FROM_EWKT
        } else {
            Self::GEOM_FROM_TEXT
        }
    }

    pub fn extended_flag(&self) -> Option<u8> {
        self.extended.then_some(1)
    }

    pub fn desc(&self) -> String {
        self.data.clone()
    }

    pub fn dumps(&self) -> GeoResult<String> {
        state::dumps(self)
    }

    pub fn loads(serialized: &str) -> GeoResult<Self> {
        state::loads(serialized)
    }
}

impl SpatialElement for WktElement {
    fn to_expr(&self) -> Expr {
        let mut args = vec![Expr::Literal(Value::String(self.data.clone()))];
        if !self.extended {
            args.push(Expr::Literal(Value::Int(self.srid as i64)));
        }
        Expr::Function {
            name: self.name().to_string(),
            args,
            return_type: SqlType::Gis(GisType::geometry().with_srid(self.srid)),
        }
    }
}

impl std::fmt::Display for WktElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl From<&WktElement> for Expr {
    fn from(element: &WktElement) -> Self {
        element.to_expr()
    }
}

impl From<WktElement> for Expr {
    fn from(element: WktElement) -> Self {
        element.to_expr()
    }
}

impl From<WktElement> for ElementState<String> {
    fn from(element: WktElement) -> Self {
        let name = element.name().to_string();
        ElementState {
            data: element.data,
            srid: element.srid,
            extended: element.extended,
            name,
        }
    }
}

impl TryFrom<ElementState<String>> for WktElement {
    type Error = GeoError;

    fn try_from(state: ElementState<String>) -> Result<Self, Self::Error> {
        let element = WktElement {
            data: state.data,
            srid: state.srid,
            extended: state.extended,
        };
        state::check_name(&state.name, element.name())?;
        Ok(element)
    }
}
