//! Database execution engine.
//!
//! Runs a single spatial expression as `SELECT <expr> AS result` against
//! PostgreSQL/PostGIS using sqlx. Geometry-typed results are selected
//! through `ST_AsEWKB` and come back as [`WkbElement`]s.

use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};

use crate::ast::{Expr, Value};
use crate::config::GeoConfig;
use crate::elements::WkbElement;
use crate::error::{GeoError, GeoResult};
use crate::transpiler::{Compiled, PostgresDialect, ToSql};
use crate::types::SqlType;

/// A connection pool for evaluating spatial expressions.
#[derive(Clone)]
pub struct GeoDB {
    pool: PgPool,
}

impl GeoDB {
    /// Connect to a database using a connection URL.
    ///
    /// ```rust,ignore
    /// let db = GeoDB::connect("postgres://localhost/gis").await?;
    /// ```
    pub async fn connect(url: &str) -> GeoResult<Self> {
        Self::connect_with(url, GeoConfig::default().max_connections).await
    }

    pub async fn connect_with(url: &str, max_connections: u32) -> GeoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| GeoError::Connection(e.to_string()))?;
        tracing::info!(max_connections, "connected");
        Ok(Self { pool })
    }

    pub async fn from_config(config: &GeoConfig) -> GeoResult<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| GeoError::Config("database_url is not set".to_string()))?;
        Self::connect_with(url, config.max_connections).await
    }

    /// Prepare an expression for evaluation.
    pub fn query(&self, expr: impl Into<Expr>) -> GeoQuery {
        GeoQuery {
            pool: self.pool.clone(),
            expr: expr.into(),
        }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Value(Value),
    Geometry(WkbElement),
}

pub struct GeoQuery {
    pool: PgPool,
    expr: Expr,
}

impl GeoQuery {
    /// The statement that will run.
    pub fn sql(&self) -> Compiled {
        select_statement(&self.expr)
    }

    pub async fn fetch_one(&self) -> GeoResult<Fetched> {
        let compiled = self.sql();
        tracing::info!(sql = %compiled.sql, params = compiled.params.len(), "executing");

        let mut query = sqlx::query(&compiled.sql);
        for value in compiled.params.values() {
            query = bind_value(query, value);
        }

        let row: PgRow = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GeoError::Execution(e.to_string()))?;

        // Calls outside the registry are not wrapped and may return a
        // spatial column directly
        if let Some(geometry) = row_to_geometry(&row)? {
            return Ok(geometry);
        }

        let value = row_to_value(&row)?;
        match (self.expr.sql_type(), value) {
            (SqlType::Gis(gis), Value::Bytes(bytes)) => Ok(gis
                .result_value(Some(bytes))
                .map_or(Fetched::Value(Value::Null), Fetched::Geometry)),
            (_, value) => Ok(Fetched::Value(value)),
        }
    }
}

/// `SELECT <expr> AS result` with positional placeholders.
///
/// Spatial results are wrapped in the type's binary output function.
pub fn select_statement(expr: &Expr) -> Compiled {
    let selected = match expr.sql_type() {
        SqlType::Gis(gis) => gis.column_expression(expr),
        _ => expr.clone(),
    };
    let compiled = selected.compile_with(&PostgresDialect);
    Compiled {
        sql: format!("SELECT {} AS result", compiled.sql),
        params: compiled.params,
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(*v),
        // int4 widens implicitly where int8 is expected, not the other way
        Value::Int(v) => match i32::try_from(*v) {
            Ok(small) => query.bind(small),
            Err(_) => query.bind(*v),
        },
        Value::Float(v) => query.bind(*v),
        Value::String(v) => query.bind(v.clone()),
        Value::Bytes(v) => query.bind(v.clone()),
    }
}

/// Whether a result column type is one of PostGIS' spatial types.
pub fn is_spatial_type_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("geometry") || name.eq_ignore_ascii_case("geography")
}

/// Decode a first column of spatial type. Both types send EWKB in binary
/// format, so the raw bytes are the payload.
fn row_to_geometry(row: &PgRow) -> GeoResult<Option<Fetched>> {
    let spatial = row
        .columns()
        .first()
        .is_some_and(|column| is_spatial_type_name(column.type_info().name()));
    if !spatial {
        return Ok(None);
    }

    let payload: Option<Vec<u8>> = row
        .try_get_unchecked(0)
        .map_err(|e| GeoError::Execution(e.to_string()))?;
    tracing::debug!(bytes = payload.as_ref().map_or(0, Vec::len), "decoded spatial column");
    Ok(Some(match payload {
        Some(bytes) => Fetched::Geometry(WkbElement::from_ewkb(bytes)),
        None => Fetched::Value(Value::Null),
    }))
}

/// Decode the first column of a row.
fn row_to_value(row: &PgRow) -> GeoResult<Value> {
    let column = row
        .columns()
        .first()
        .ok_or_else(|| GeoError::Execution("query returned no columns".to_string()))?;

    let value = match column.type_info().name() {
        "BOOL" => row.try_get::<Option<bool>, _>(0).map(Value::from),
        "INT2" => row
            .try_get::<Option<i16>, _>(0)
            .map(|v| Value::from(v.map(i64::from))),
        "INT4" => row.try_get::<Option<i32>, _>(0).map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(0).map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(0)
            .map(|v| Value::from(v.map(f64::from))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(0).map(Value::from),
        "BYTEA" => row.try_get::<Option<Vec<u8>>, _>(0).map(Value::from),
        _ => row.try_get::<Option<String>, _>(0).map(Value::from),
    };

    value.map_err(|e| GeoError::Execution(e.to_string()))
}
