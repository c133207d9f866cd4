use super::{GisType, SqlType};

/// A row type whose fields can be addressed individually, e.g. the
/// `geometry_dump` rows returned by `ST_Dump`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub name: String,
    pub fields: Vec<(String, SqlType)>,
}

impl CompositeType {
    pub fn new(name: impl Into<String>, fields: Vec<(String, SqlType)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// PostGIS `geometry_dump`: `(path integer[], geom geometry)`.
    pub fn geometry_dump() -> Self {
        Self::new(
            "geometry_dump",
            vec![
                ("path".to_string(), SqlType::Array(Box::new(SqlType::Integer))),
                ("geom".to_string(), SqlType::Gis(GisType::geometry())),
            ],
        )
    }

    /// Declared type of `field`, if the row has it.
    pub fn field_type(&self, field: &str) -> Option<&SqlType> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, ty)| ty)
    }
}
