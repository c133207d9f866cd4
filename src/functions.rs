//! Spatial function registry.
//!
//! Any name following the `ST_` convention (case-sensitive) resolves to a
//! spatial function. Registered names additionally carry a return type so
//! that the call expression reports it; unregistered `ST_` names are still
//! callable with an unknown return type.

use crate::types::{CompositeType, SqlType};

pub const SPATIAL_FUNCTION_PREFIX: &str = "ST_";

/// Return type of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Geometry,
    Geography,
    Float,
    Integer,
    Boolean,
    Text,
    Bytea,
    GeometryDump,
    Unknown,
}

impl ReturnKind {
    pub fn sql_type(&self) -> SqlType {
        match self {
            ReturnKind::Geometry => SqlType::geometry(),
            ReturnKind::Geography => SqlType::geography(),
            ReturnKind::Float => SqlType::Float,
            ReturnKind::Integer => SqlType::Integer,
            ReturnKind::Boolean => SqlType::Boolean,
            ReturnKind::Text => SqlType::Text,
            ReturnKind::Bytea => SqlType::Bytea,
            ReturnKind::GeometryDump => SqlType::Composite(CompositeType::geometry_dump()),
            ReturnKind::Unknown => SqlType::Unknown,
        }
    }
}

/// (name, return type, description)
pub static FUNCTIONS: &[(&str, ReturnKind, &str)] = &[
    // Constructors
    ("ST_GeomFromText", ReturnKind::Geometry, "Geometry from WKT and an SRID"),
    ("ST_GeomFromEWKT", ReturnKind::Geometry, "Geometry from extended WKT"),
    ("ST_GeomFromWKB", ReturnKind::Geometry, "Geometry from WKB and an SRID"),
    ("ST_GeomFromEWKB", ReturnKind::Geometry, "Geometry from extended WKB"),
    ("ST_GeogFromText", ReturnKind::Geography, "Geography from (E)WKT"),
    ("ST_GeogFromWKB", ReturnKind::Geography, "Geography from (E)WKB"),
    ("ST_MakePoint", ReturnKind::Geometry, "Point from coordinates"),
    ("ST_MakeEnvelope", ReturnKind::Geometry, "Rectangle from min/max coordinates"),
    // Outputs
    ("ST_AsText", ReturnKind::Text, "WKT representation"),
    ("ST_AsEWKT", ReturnKind::Text, "EWKT representation"),
    ("ST_AsBinary", ReturnKind::Bytea, "WKB representation"),
    ("ST_AsEWKB", ReturnKind::Bytea, "EWKB representation"),
    ("ST_AsGeoJSON", ReturnKind::Text, "GeoJSON representation"),
    ("ST_AsGML", ReturnKind::Text, "GML representation"),
    ("ST_AsKML", ReturnKind::Text, "KML representation"),
    ("ST_AsSVG", ReturnKind::Text, "SVG path data"),
    // Accessors
    ("ST_SRID", ReturnKind::Integer, "Spatial reference identifier"),
    ("ST_GeometryType", ReturnKind::Text, "Geometry type name"),
    ("ST_NPoints", ReturnKind::Integer, "Number of points"),
    ("ST_X", ReturnKind::Float, "X coordinate of a point"),
    ("ST_Y", ReturnKind::Float, "Y coordinate of a point"),
    ("ST_IsValid", ReturnKind::Boolean, "Whether the geometry is well formed"),
    ("ST_Dump", ReturnKind::GeometryDump, "Set of geometry_dump rows"),
    ("ST_DumpPoints", ReturnKind::GeometryDump, "Set of geometry_dump rows for points"),
    // Editors
    ("ST_SetSRID", ReturnKind::Geometry, "Geometry with a new SRID"),
    ("ST_Transform", ReturnKind::Geometry, "Geometry reprojected to an SRID"),
    ("ST_Simplify", ReturnKind::Geometry, "Douglas-Peucker simplification"),
    ("ST_MakeValid", ReturnKind::Geometry, "Valid version of the geometry"),
    // Predicates
    ("ST_Equals", ReturnKind::Boolean, "Spatially equal"),
    ("ST_Intersects", ReturnKind::Boolean, "Share any point"),
    ("ST_Disjoint", ReturnKind::Boolean, "Share no point"),
    ("ST_Contains", ReturnKind::Boolean, "A contains B"),
    ("ST_Within", ReturnKind::Boolean, "A within B"),
    ("ST_Covers", ReturnKind::Boolean, "No point of B outside A"),
    ("ST_Touches", ReturnKind::Boolean, "Boundaries touch, interiors do not"),
    ("ST_Crosses", ReturnKind::Boolean, "Interiors cross"),
    ("ST_Overlaps", ReturnKind::Boolean, "Interiors overlap"),
    ("ST_DWithin", ReturnKind::Boolean, "Within a distance"),
    // Measurements
    ("ST_Area", ReturnKind::Float, "Area"),
    ("ST_Length", ReturnKind::Float, "Length"),
    ("ST_Perimeter", ReturnKind::Float, "Perimeter"),
    ("ST_Distance", ReturnKind::Float, "Minimum distance"),
    // Processing
    ("ST_Buffer", ReturnKind::Geometry, "Points within a distance"),
    ("ST_Centroid", ReturnKind::Geometry, "Geometric center"),
    ("ST_ConvexHull", ReturnKind::Geometry, "Convex hull"),
    ("ST_Envelope", ReturnKind::Geometry, "Bounding box"),
    ("ST_Intersection", ReturnKind::Geometry, "Shared portion"),
    ("ST_Difference", ReturnKind::Geometry, "Portion of A not in B"),
    ("ST_Union", ReturnKind::Geometry, "Point set union"),
];

/// A resolved spatial function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub returns: ReturnKind,
    pub description: Option<&'static str>,
}

impl FunctionSpec {
    pub fn return_type(&self) -> SqlType {
        self.returns.sql_type()
    }

    pub fn is_registered(&self) -> bool {
        self.description.is_some()
    }
}

/// Whether `name` follows the spatial function naming convention.
pub fn is_spatial_function_name(name: &str) -> bool {
    match name.strip_prefix(SPATIAL_FUNCTION_PREFIX) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Resolve `name` to a spatial function, or `None` if it is not one.
pub fn lookup(name: &str) -> Option<FunctionSpec> {
    if !is_spatial_function_name(name) {
        return None;
    }
    let spec = match FUNCTIONS.iter().find(|(registered, _, _)| *registered == name) {
        Some((registered, returns, description)) => FunctionSpec {
            name: registered.to_string(),
            returns: *returns,
            description: Some(*description),
        },
        None => FunctionSpec {
            name: name.to_string(),
            returns: ReturnKind::Unknown,
            description: None,
        },
    };
    Some(spec)
}
