use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::srid;
use super::state::{self, ElementState};
use super::{DEFAULT_SRID, SpatialElement};
use crate::ast::{Expr, Value};
use crate::error::{GeoError, GeoResult};
use crate::types::{GisType, SqlType};

/// Raw WKB payload, kept in the representation the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WkbData {
    Binary(Vec<u8>),
    /// Hex-encoded binary
    Hex(String),
}

impl WkbData {
    /// The binary form. `None` for text that is not valid hex.
    pub fn decode(&self) -> Option<Cow<'_, [u8]>> {
        match self {
            WkbData::Binary(bytes) => Some(Cow::Borrowed(bytes)),
            WkbData::Hex(text) => hex::decode(text).ok().map(Cow::Owned),
        }
    }
}

impl From<Vec<u8>> for WkbData {
    fn from(bytes: Vec<u8>) -> Self {
        WkbData::Binary(bytes)
    }
}

impl From<&[u8]> for WkbData {
    fn from(bytes: &[u8]) -> Self {
        WkbData::Binary(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for WkbData {
    fn from(bytes: &[u8; N]) -> Self {
        WkbData::Binary(bytes.to_vec())
    }
}

impl From<String> for WkbData {
    fn from(text: String) -> Self {
        WkbData::Hex(text)
    }
}

impl From<&str> for WkbData {
    fn from(text: &str) -> Self {
        WkbData::Hex(text.to_string())
    }
}

/// A geometry given as WKB or EWKB, binary or hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ElementState<WkbData>", try_from = "ElementState<WkbData>")]
pub struct WkbElement {
    data: WkbData,
    srid: i32,
    extended: bool,
}

impl WkbElement {
    pub const GEOM_FROM_WKB: &'static str = "ST_GeomFromWKB";
    pub const GEOM_FROM_EWKB: &'static str = "ST_GeomFromEWKB";

    /// Plain WKB with an unknown SRID.
    pub fn new(data: impl Into<WkbData>) -> Self {
        Self::with_srid(data, DEFAULT_SRID)
    }

    /// Plain WKB with an explicit SRID.
    pub fn with_srid(data: impl Into<WkbData>, srid: i32) -> Self {
        Self {
            data: data.into(),
            srid,
            extended: false,
        }
    }

    /// EWKB, SRID read from its header when flagged.
    pub fn from_ewkb(data: impl Into<WkbData>) -> Self {
        Self::with_options(data, DEFAULT_SRID, true)
    }

    /// General constructor. Never fails: a header that cannot be read
    /// leaves `srid` as given.
    pub fn with_options(data: impl Into<WkbData>, srid: i32, extended: bool) -> Self {
        let data = data.into();
        let mut srid = srid;
        if extended && srid == DEFAULT_SRID {
            if let Some(parsed) = data.decode().and_then(|bytes| srid::ewkb_srid(&bytes)) {
                tracing::debug!(srid = parsed, "SRID read from EWKB header");
                srid = parsed;
            }
        }
        Self {
            data,
            srid,
            extended,
        }
    }

    pub fn data(&self) -> &WkbData {
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
            Self::GEOM_FROM_EWKB
        } else {
            Self::GEOM_FROM_WKB
        }
    }

    pub fn extended_flag(&self) -> Option<u8> {
        self.extended.then_some(1)
    }

    pub fn as_bytes(&self) -> Option<Cow<'_, [u8]>> {
        self.data.decode()
    }

    /// Lowercase hex of the binary form.
    pub fn desc(&self) -> String {
        match self.as_bytes() {
            Some(bytes) => hex::encode(bytes),
            None => match &self.data {
                WkbData::Hex(text) => text.to_ascii_lowercase(),
                WkbData::Binary(bytes) => hex::encode(bytes),
            },
        }
    }

    /// Value bound for the payload argument of the constructor call.
    fn payload_value(&self) -> Value {
        match (&self.data, self.as_bytes()) {
            (_, Some(bytes)) => Value::Bytes(bytes.into_owned()),
            (WkbData::Hex(text), None) => Value::String(text.clone()),
            (WkbData::Binary(bytes), None) => Value::Bytes(bytes.clone()),
        }
    }

    pub fn dumps(&self) -> GeoResult<String> {
        state::dumps(self)
    }

    pub fn loads(serialized: &str) -> GeoResult<Self> {
        state::loads(serialized)
    }
}

impl SpatialElement for WkbElement {
    fn to_expr(&self) -> Expr {
        let mut args = vec![Expr::Literal(self.payload_value())];
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

impl std::fmt::Display for WkbElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.desc())
    }
}

impl From<&WkbElement> for Expr {
    fn from(element: &WkbElement) -> Self {
        element.to_expr()
    }
}

impl From<WkbElement> for Expr {
    fn from(element: WkbElement) -> Self {
        element.to_expr()
    }
}

impl From<WkbElement> for ElementState<WkbData> {
    fn from(element: WkbElement) -> Self {
        let name = element.name().to_string();
        ElementState {
            data: element.data,
            srid: element.srid,
            extended: element.extended,
            name,
        }
    }
}

impl TryFrom<ElementState<WkbData>> for WkbElement {
    type Error = GeoError;

    fn try_from(state: ElementState<WkbData>) -> Result<Self, Self::Error> {
        let element = WkbElement {
            data: state.data,
            srid: state.srid,
            extended: state.extended,
        };
        state::check_name(&state.name, element.name())?;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::ToSql;

    #[test]
    fn test_desc_from_binary() {
        let e = WkbElement::new(b"\x01\x02");
        assert_eq!(e.desc(), "0102");
        assert_eq!(e.to_string(), "0102");
    }

    #[test]
    fn test_desc_lowercases_hex() {
        let e = WkbElement::new("01AB");
        assert_eq!(e.desc(), "01ab");
        assert_eq!(e.data(), &WkbData::Hex("01AB".to_string()));
    }

    #[test]
    fn test_invalid_hex() {
        let e = WkbElement::with_options("XYZ", -1, true);
        assert_eq!(e.srid(), -1);
        assert_eq!(e.desc(), "xyz");
        assert_eq!(e.as_bytes(), None);
        let compiled = e.to_expr().compile();
        assert_eq!(
            compiled.params.get("ST_GeomFromEWKB_1"),
            Some(&Value::from("XYZ"))
        );
    }

    #[test]
    fn test_hex_bound_as_bytes() {
        let e = WkbElement::with_srid("0102", 4326);
        let compiled = e.to_expr().compile();
        assert_eq!(compiled.sql, "ST_GeomFromWKB(:ST_GeomFromWKB_1, :ST_GeomFromWKB_2)");
        assert_eq!(
            compiled.params.get("ST_GeomFromWKB_1"),
            Some(&Value::Bytes(vec![0x01, 0x02]))
        );
        assert_eq!(compiled.params.get("ST_GeomFromWKB_2"), Some(&Value::Int(4326)));
    }

    #[test]
    fn test_short_ewkb_keeps_srid() {
        let e = WkbElement::from_ewkb(b"\x01\x02");
        assert_eq!(e.srid(), -1);
        assert_eq!(e.extended_flag(), Some(1));
        assert_eq!(e.name(), "ST_GeomFromEWKB");
    }
}
