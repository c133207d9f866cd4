//! SRID extraction from self-describing payloads.
//!
//! The two parsers share nothing. A malformed EWKT marker is an error;
//! an unreadable EWKB header is not, the caller just keeps its SRID.

use nom::{
    bytes::complete::tag,
    character::complete::{char, i32 as decimal_i32},
    error::{Error, ErrorKind},
    number::complete::{be_i32, be_u32, le_i32, le_u32, u8 as byte},
    sequence::delimited,
    IResult,
};

use crate::error::{GeoError, GeoResult};

/// Type-word bit set when an SRID follows it.
pub const EWKB_SRID_FLAG: u32 = 0x2000_0000;

const EWKT_SRID_MARKER: &str = "SRID=";

/// Read the `SRID=<n>;` prefix of an EWKT string.
///
/// `Ok(None)` when there is no marker; an error when the marker is there
/// but is not an integer followed by `;`.
pub fn ewkt_srid(data: &str) -> GeoResult<Option<i32>> {
    if !data.starts_with(EWKT_SRID_MARKER) {
        return Ok(None);
    }
    let parsed: IResult<&str, i32> = delimited(tag(EWKT_SRID_MARKER), decimal_i32, char(';'))(data);
    match parsed {
        Ok((_, srid)) => Ok(Some(srid)),
        Err(_) => Err(GeoError::argument(format!("invalid EWKT string {}", data))),
    }
}

/// Read the SRID embedded in an EWKB header, if any.
pub fn ewkb_srid(bytes: &[u8]) -> Option<i32> {
    match ewkb_header(bytes) {
        Ok((_, srid)) => srid,
        Err(err) => {
            tracing::debug!(len = bytes.len(), "unreadable EWKB header: {:?}", err);
            None
        }
    }
}

/// byteOrder, wkbType and, when flagged, the SRID.
fn ewkb_header(input: &[u8]) -> IResult<&[u8], Option<i32>> {
    let (input, little_endian) = byte_order(input)?;
    let (input, type_word) = read_u32(input, little_endian)?;
    if type_word & EWKB_SRID_FLAG == 0 {
        return Ok((input, None));
    }
    let (input, srid) = read_i32(input, little_endian)?;
    Ok((input, Some(srid)))
}

/// Turn a plain WKB payload into EWKB carrying `srid`.
///
/// Sets the SRID flag in the type word and writes the SRID after it, both
/// in the payload's own byte order. A payload that already carries an
/// SRID is returned as is. `None` when the header is unreadable.
pub fn ewkb_with_srid(bytes: &[u8], srid: i32) -> Option<Vec<u8>> {
    let (rest, little_endian) = byte_order(bytes).ok()?;
    let (body, type_word) = read_u32(rest, little_endian).ok()?;
    if type_word & EWKB_SRID_FLAG != 0 {
        return Some(bytes.to_vec());
    }

    let type_word = type_word | EWKB_SRID_FLAG;
    let mut out = Vec::with_capacity(bytes.len() + 4);
    if little_endian {
        out.push(1);
        out.extend_from_slice(&type_word.to_le_bytes());
        out.extend_from_slice(&srid.to_le_bytes());
    } else {
        out.push(0);
        out.extend_from_slice(&type_word.to_be_bytes());
        out.extend_from_slice(&srid.to_be_bytes());
    }
    out.extend_from_slice(body);
    Some(out)
}

/// 0 = XDR (big endian), 1 = NDR (little endian).
fn byte_order(input: &[u8]) -> IResult<&[u8], bool> {
    let parsed: IResult<&[u8], u8> = byte(input);
    let (rest, order) = parsed?;
    match order {
        0 => Ok((rest, false)),
        1 => Ok((rest, true)),
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    }
}

fn read_u32(input: &[u8], little_endian: bool) -> IResult<&[u8], u32> {
    if little_endian {
        le_u32(input)
    } else {
        be_u32(input)
    }
}

fn read_i32(input: &[u8], little_endian: bool) -> IResult<&[u8], i32> {
    if little_endian {
        le_i32(input)
    } else {
        be_i32(input)
    }
}
