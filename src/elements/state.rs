//! Serialized form of geometry elements.
//!
//! An element is stored as its payload, SRID, extended flag and
//! constructor name. Restoring it does not re-read the payload header, so
//! an SRID that was forced at construction survives the round trip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementState<D> {
    pub data: D,
    pub srid: i32,
    pub extended: bool,
    pub name: String,
}

pub(crate) fn check_name(stored: &str, expected: &str) -> GeoResult<()> {
    if stored == expected {
        Ok(())
    } else {
        Err(GeoError::Serialization(format!(
            "constructor '{}' does not match encoding (expected '{}')",
            stored, expected
        )))
    }
}

pub fn dumps<T: Serialize>(value: &T) -> GeoResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn loads<T: DeserializeOwned>(serialized: &str) -> GeoResult<T> {
    Ok(serde_json::from_str(serialized)?)
}
