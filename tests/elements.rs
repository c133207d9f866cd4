use std::collections::HashMap;

use pretty_assertions::assert_eq;
use qail_geo::prelude::*;

const EWKB_POINT: &[u8] = &[
    0x01, 0x01, 0x00, 0x00, 0x20, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0,
    0x3f, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40,
];
const EWKB_POINT_HEX: &str = "010100002003000000000000000000f03f0000000000000040";

fn geom_column(table: &str, name: &str) -> Column {
    Column::new(Some(table), name, SqlType::geometry())
}

/// A restored element compiles `ST_Buffer` exactly like the original.
fn assert_same_buffer_call<E: SpatialElement>(original: &E, restored: &E) {
    let before = original.call("ST_Buffer", [2]).unwrap().compile();
    let after = restored.call("ST_Buffer", [2]).unwrap().compile();
    assert_eq!(before.sql, after.sql);
    assert_eq!(
        before.params.iter().collect::<Vec<_>>(),
        after.params.iter().collect::<Vec<_>>()
    );
}

// WKT

#[test]
fn test_wkt_desc() {
    let e = WktElement::new("POINT(1 2)");
    assert_eq!(e.desc(), "POINT(1 2)");
}

#[test]
fn test_wkt_function_call() {
    let e = WktElement::new("POINT(1 2)");
    let f = e.call("ST_Buffer", [2]).unwrap();
    let compiled = f.compile();

    assert_eq!(
        compiled.sql,
        "ST_Buffer(ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2), :ST_Buffer_1)"
    );
    assert_eq!(
        compiled.params.to_map(),
        [
            ("ST_GeomFromText_1".to_string(), Value::from("POINT(1 2)")),
            ("ST_GeomFromText_2".to_string(), Value::Int(-1)),
            ("ST_Buffer_1".to_string(), Value::Int(2)),
        ]
        .into_iter()
        .collect::<HashMap<_, _>>()
    );
}

#[test]
fn test_wkt_attribute_error() {
    let e = WktElement::new("POINT(1 2)");
    assert!(!e.has_function("foo"));

    let err = e.function("foo").unwrap_err();
    assert!(matches!(err, GeoError::UnknownAttribute { ref name } if name == "foo"));
    assert_eq!(err.to_string(), "no attribute 'foo'");
}

#[test]
fn test_wkt_lowercase_prefix_is_not_spatial() {
    let e = WktElement::new("POINT(1 2)");
    assert!(e.call("st_buffer", [2]).is_err());
}

#[test]
fn test_wkt_pickle() {
    let e1 = WktElement::with_srid("POINT(1 2)", 4326);
    let e2 = WktElement::loads(&e1.dumps().unwrap()).unwrap();

    assert_eq!(e1, e2);
    assert_eq!(e2.srid(), 4326);
    assert!(!e2.extended());
    assert_eq!(e2.data(), "POINT(1 2)");
    assert_same_buffer_call(&e1, &e2);
}

// Extended WKT

#[test]
fn test_ewkt_desc() {
    let e = WktElement::from_ewkt("SRID=3;POINT(1 2)").unwrap();
    assert_eq!(e.desc(), "SRID=3;POINT(1 2)");
}

#[test]
fn test_ewkt_function_call() {
    let e = WktElement::from_ewkt("SRID=3;POINT(1 2)").unwrap();
    let compiled = e.call("ST_Buffer", [2]).unwrap().compile();

    assert_eq!(
        compiled.sql,
        "ST_Buffer(ST_GeomFromEWKT(:ST_GeomFromEWKT_1), :ST_Buffer_1)"
    );
    assert_eq!(
        compiled.params.get("ST_GeomFromEWKT_1"),
        Some(&Value::from("SRID=3;POINT(1 2)"))
    );
    assert_eq!(compiled.params.get("ST_Buffer_1"), Some(&Value::Int(2)));
}

#[test]
fn test_ewkt_pickle() {
    let e1 = WktElement::from_ewkt("SRID=3;POINT(1 2)").unwrap();
    let e2 = WktElement::loads(&e1.dumps().unwrap()).unwrap();

    assert_eq!(e2.srid(), 3);
    assert!(e2.extended());
    assert_eq!(e2.data(), "SRID=3;POINT(1 2)");
    assert_same_buffer_call(&e1, &e2);
}

#[test]
fn test_ewkt_unspecified_srid() {
    let e = WktElement::from_ewkt("POINT(1 2)").unwrap();
    assert_eq!(e.srid(), -1);
    assert!(e.extended());
}

#[test]
fn test_ewkt_specified_srid() {
    let e = WktElement::from_ewkt("SRID=1234;POINT(1 2)").unwrap();
    assert_eq!(e.srid(), 1234);
}

#[test]
fn test_ewkt_forced_srid() {
    let e = WktElement::with_options("SRID=1234;POINT(1 2)", 5678, true).unwrap();
    assert_eq!(e.srid(), 5678);
}

#[test]
fn test_ewkt_bad_srid() {
    let err = WktElement::from_ewkt("SRID=BAD SRID;POINT(1 2)").unwrap_err();
    assert!(matches!(err, GeoError::Argument(_)));

    // an explicit SRID skips the marker entirely
    let e = WktElement::with_options("SRID=BAD SRID;POINT(1 2)", 4326, true).unwrap();
    assert_eq!(e.srid(), 4326);
}

// Comparisons

#[test]
fn test_st_equals_two_elements() {
    let e1 = WktElement::new("POINT(1 2)");
    let e2 = WktElement::new("POINT(1 2)");
    let compiled = e1.call("ST_Equals", [e2]).unwrap().compile();

    assert_eq!(
        compiled.sql,
        "ST_Equals(ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2), \
         ST_GeomFromText(:ST_GeomFromText_3, :ST_GeomFromText_4))"
    );
    assert_eq!(
        compiled.params.values().cloned().collect::<Vec<_>>(),
        vec![
            Value::from("POINT(1 2)"),
            Value::Int(-1),
            Value::from("POINT(1 2)"),
            Value::Int(-1),
        ]
    );
}

#[test]
fn test_st_equals_column_and_element() {
    let geom = geom_column("table", "geom");
    let e = WktElement::new("POINT(1 2)");
    let expr = geom.call("ST_Equals", [e]).unwrap();

    assert_eq!(expr.sql_type(), SqlType::Boolean);
    let compiled = expr.compile();
    assert_eq!(
        compiled.sql,
        "ST_Equals(\"table\".geom, ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2))"
    );
    assert_eq!(compiled.params.len(), 2);
}

#[test]
fn test_eq_operator() {
    let geom = geom_column("lake", "geom");
    let e = WktElement::with_srid("POINT(1 2)", 4326);
    let compiled = Expr::from(&geom).equals(e).compile();

    assert_eq!(
        compiled.sql,
        "lake.geom = ST_GeomFromText(:ST_GeomFromText_1, :ST_GeomFromText_2)"
    );
    assert_eq!(compiled.params.get("ST_GeomFromText_2"), Some(&Value::Int(4326)));
}

// Extended WKB

#[test]
fn test_ewkb_desc() {
    let e = WkbElement::from_ewkb(EWKB_POINT);
    assert_eq!(e.desc(), EWKB_POINT_HEX);
}

#[test]
fn test_ewkb_desc_from_hex() {
    let e = WkbElement::from_ewkb(EWKB_POINT_HEX.to_uppercase());
    assert_eq!(e.desc(), EWKB_POINT_HEX);
}

#[test]
fn test_ewkb_function_call() {
    let e = WkbElement::from_ewkb(EWKB_POINT);
    let compiled = e.call("ST_Buffer", [2]).unwrap().compile();

    assert_eq!(
        compiled.sql,
        "ST_Buffer(ST_GeomFromEWKB(:ST_GeomFromEWKB_1), :ST_Buffer_1)"
    );
    assert_eq!(
        compiled.params.get("ST_GeomFromEWKB_1"),
        Some(&Value::Bytes(EWKB_POINT.to_vec()))
    );
    assert_eq!(compiled.params.get("ST_Buffer_1"), Some(&Value::Int(2)));
}

#[test]
fn test_ewkb_str() {
    let e = WkbElement::from_ewkb(EWKB_POINT);
    assert_eq!(e.to_string(), EWKB_POINT_HEX);
}

#[test]
fn test_ewkb_pickle() {
    let e1 = WkbElement::from_ewkb(EWKB_POINT);
    let e2 = WkbElement::loads(&e1.dumps().unwrap()).unwrap();

    assert_eq!(e2.srid(), 3);
    assert!(e2.extended());
    assert_eq!(e2.as_bytes().as_deref(), Some(EWKB_POINT));
    assert_same_buffer_call(&e1, &e2);
}

#[test]
fn test_ewkb_pickle_keeps_forced_srid() {
    let e1 = WkbElement::with_options(EWKB_POINT, 5678, true);
    let e2 = WkbElement::loads(&e1.dumps().unwrap()).unwrap();
    assert_eq!(e2.srid(), 5678);
}

#[test]
fn test_ewkb_unspecified_srid() {
    let e = WkbElement::from_ewkb(EWKB_POINT);
    assert_eq!(e.srid(), 3);
}

#[test]
fn test_ewkb_unspecified_srid_from_hex() {
    let e = WkbElement::from_ewkb(EWKB_POINT_HEX);
    assert_eq!(e.srid(), 3);
}

#[test]
fn test_ewkb_forced_srid() {
    let e = WkbElement::with_options(EWKB_POINT, 5678, true);
    assert_eq!(e.srid(), 5678);
}

#[test]
fn test_ewkb_short_payload_keeps_srid() {
    let e = WkbElement::from_ewkb(b"\x01\x02");
    assert_eq!(e.srid(), -1);
}

// Plain WKB

#[test]
fn test_wkb_desc() {
    let e = WkbElement::new(b"\x01\x02");
    assert_eq!(e.desc(), "0102");
}

#[test]
fn test_wkb_function_call() {
    let e = WkbElement::new(b"\x01\x02");
    let compiled = e.call("ST_Buffer", [2]).unwrap().compile();

    assert_eq!(
        compiled.sql,
        "ST_Buffer(ST_GeomFromWKB(:ST_GeomFromWKB_1, :ST_GeomFromWKB_2), :ST_Buffer_1)"
    );
    assert_eq!(
        compiled.params.get("ST_GeomFromWKB_1"),
        Some(&Value::Bytes(vec![0x01, 0x02]))
    );
    assert_eq!(compiled.params.get("ST_GeomFromWKB_2"), Some(&Value::Int(-1)));
}

#[test]
fn test_wkb_attribute_error() {
    let e = WkbElement::new(b"\x01\x02");
    assert!(matches!(
        e.function("foo"),
        Err(GeoError::UnknownAttribute { .. })
    ));
}

#[test]
fn test_wkb_pickle() {
    let e1 = WkbElement::with_srid(b"\x01\x02", 4326);
    let e2 = WkbElement::loads(&e1.dumps().unwrap()).unwrap();
    assert_eq!(e1, e2);
    assert_same_buffer_call(&e1, &e2);
}

#[test]
fn test_pickle_rejects_mismatched_constructor() {
    let state = r#"{"data":"POINT(1 2)","srid":-1,"extended":false,"name":"ST_GeomFromEWKT"}"#;
    assert!(matches!(
        WktElement::loads(state),
        Err(GeoError::Serialization(_))
    ));
}

// Composite

#[test]
fn test_composite_field() {
    let row = CompositeType::new(
        "pair",
        vec![("geom".to_string(), SqlType::geometry())],
    );
    let one = Column::new(Some("foo"), "one", SqlType::Composite(row));
    let e = Expr::from(one).field("geom").unwrap();

    assert_eq!(e.to_string(), "(foo.one).geom");
    assert_eq!(e.field_type(), &SqlType::geometry());
}

#[test]
fn test_composite_unknown_field() {
    let one = Column::new(
        Some("foo"),
        "one",
        SqlType::Composite(CompositeType::geometry_dump()),
    );
    assert!(matches!(
        Expr::from(one).field("area"),
        Err(GeoError::UnknownAttribute { .. })
    ));
}

#[test]
fn test_composite_function_call() {
    let geom = CompositeElement::new(
        Column::new(Some("foo"), "one", SqlType::Text),
        "geom",
        SqlType::geometry(),
    );
    let compiled = geom.call("ST_Buffer", [2]).unwrap().compile();
    assert_eq!(compiled.sql, "ST_Buffer((foo.one).geom, :ST_Buffer_1)");
}

// Positional dialect

#[test]
fn test_postgres_dialect_numbering() {
    let e = WktElement::with_srid("POINT(1 2)", 4326);
    let compiled = e
        .call("ST_DWithin", [Expr::from(geom_column("lake", "geom")), Expr::from(10.0)])
        .unwrap()
        .compile_with(&PostgresDialect);

    assert_eq!(
        compiled.sql,
        "ST_DWithin(ST_GeomFromText($1, $2), lake.geom, $3)"
    );
    assert_eq!(compiled.params.get("ST_DWithin_1"), Some(&Value::Float(10.0)));
}

// Column binding

#[test]
fn test_column_binding_carries_wkb_srid() {
    let wkb = WkbElement::with_srid("0101000000000000000000f03f0000000000000040", 4326);
    let wkt = WktElement::with_srid("POINT(1 2)", 4326);

    let column = GisType::geometry();
    assert_eq!(
        column.bind_value(&wkt.into()),
        Value::from("SRID=4326;POINT(1 2)")
    );
    let bound = column.bind_value(&wkb.into());
    assert_eq!(
        bound,
        Value::from("0101000020e6100000000000000000f03f0000000000000040")
    );

    let Value::String(hex) = &bound else {
        panic!("expected hex text, got {:?}", bound);
    };
    assert_eq!(WkbElement::from_ewkb(hex.as_str()).srid(), 4326);
}
