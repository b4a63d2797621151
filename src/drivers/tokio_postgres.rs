use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tokio::runtime::Runtime;
use tokio_postgres::types::{FromSql, ToSql, Type};
use tokio_postgres::{Client, NoTls, Statement};

use crate::error::{Result, SqlExecError};
use crate::traits::{DatabaseDriver, PreparedStatement};
use crate::types::{RawQueryResult, SqlValue};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// The driver owns a current-thread runtime and blocks on it for every call,
/// so it must not be used from inside another tokio runtime.
pub struct TokioPostgresDriver {
    runtime: Runtime,
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SqlExecError::ConnectionFailed(e.to_string()))?;

        let (client, connection) = runtime
            .block_on(tokio_postgres::connect(connection_string, NoTls))
            .map_err(|e| SqlExecError::ConnectionFailed(e.to_string()))?;

        // The connection task makes progress whenever the runtime is blocked on.
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self { runtime, client })
    }
}

impl DatabaseDriver for TokioPostgresDriver {
    fn driver_name(&self) -> &str {
        "pgsql"
    }

    fn prepare<'a>(&'a mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'a>> {
        let native_sql = translate_placeholders(sql);
        let statement = self
            .runtime
            .block_on(self.client.prepare(&native_sql))
            .map_err(|e| SqlExecError::QueryFailed(e.to_string()))?;

        Ok(Box::new(PostgresStatement {
            driver: self,
            statement,
            sql: sql.to_string(),
            result: None,
            affected: 0,
        }))
    }
}

struct PostgresStatement<'a> {
    driver: &'a TokioPostgresDriver,
    statement: Statement,
    sql: String,
    result: Option<RawQueryResult>,
    affected: u64,
}

impl PreparedStatement for PostgresStatement<'_> {
    fn execute(&mut self, params: &[SqlValue]) -> Result<bool> {
        // Convert SqlValue params to tokio-postgres compatible types
        let converted_params: Vec<Box<dyn ToSql + Sync + Send>> =
            params.iter().map(sql_value_to_tosql).collect();

        let param_refs: Vec<&(dyn ToSql + Sync)> = converted_params
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let TokioPostgresDriver { runtime, client } = self.driver;

        if self.statement.columns().is_empty() {
            self.affected = runtime
                .block_on(client.execute(&self.statement, &param_refs))
                .map_err(|e| SqlExecError::QueryFailed(e.to_string()))?;
            self.result = None;
            return Ok(true);
        }

        // Refuse unreadable columns before the statement can change anything.
        let decoders = self
            .statement
            .columns()
            .iter()
            .map(|c| {
                ColumnDecoder::for_type(c.type_())
                    .ok_or_else(|| unsupported_type(c.name(), c.type_()))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = runtime
            .block_on(client.query(&self.statement, &param_refs))
            .map_err(|e| SqlExecError::QueryFailed(e.to_string()))?;

        let columns: Vec<String> = self
            .statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let result_rows = rows
            .iter()
            .map(|row| {
                decoders
                    .iter()
                    .enumerate()
                    .map(|(i, decoder)| {
                        decoder
                            .decode(row, i)
                            .map_err(|e| SqlExecError::QueryFailed(e.to_string()))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        // Every row of UPDATE/DELETE ... RETURNING is one changed row
        self.affected = rows.len() as u64;
        self.result = Some(RawQueryResult::new(columns, result_rows));
        Ok(true)
    }

    fn fetch_all(&mut self) -> Result<RawQueryResult> {
        Ok(self.result.take().unwrap_or_else(RawQueryResult::empty))
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }

    fn statement_text(&self) -> &str {
        &self.sql
    }
}

/// Rewrites `?` placeholders into PostgreSQL's numbered `$n` form.
///
/// Question marks inside quoted literals and identifiers, `--` and `/* */`
/// comments, and dollar-quoted bodies are left alone. Every other `?` is a
/// placeholder, including the jsonb `?`, `?|` and `?&` operators; write
/// `jsonb_exists`, `jsonb_exists_any` or `jsonb_exists_all` instead.
pub(crate) fn translate_placeholders(sql: &str) -> Cow<'_, str> {
    if !sql.contains('?') {
        return Cow::Borrowed(sql);
    }

    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut copied = 0;
    let mut n = 0;
    let mut i = 0;

    // All delimiters are ASCII, so every index below is a char boundary.
    while i < bytes.len() {
        i = match bytes[i] {
            q @ (b'\'' | b'"') => skip_past(sql, i + 1, if q == b'"' { "\"" } else { "'" }),
            b'-' if bytes.get(i + 1) == Some(&b'-') => skip_past(sql, i + 2, "\n"),
            b'/' if bytes.get(i + 1) == Some(&b'*') => skip_past(sql, i + 2, "*/"),
            b'$' => match dollar_tag(sql, i) {
                Some(tag) => skip_past(sql, i + tag.len(), tag),
                None => i + 1,
            },
            b'?' => {
                n += 1;
                out.push_str(&sql[copied..i]);
                out.push('$');
                out.push_str(&n.to_string());
                copied = i + 1;
                i + 1
            }
            _ => i + 1,
        };
    }

    out.push_str(&sql[copied..]);
    Cow::Owned(out)
}

/// Index just past the next `end` at or after `from`, or the end of `sql`.
fn skip_past(sql: &str, from: usize, end: &str) -> usize {
    match sql[from..].find(end) {
        Some(at) => from + at + end.len(),
        None => sql.len(),
    }
}

/// The `$tag$` opening a dollar-quoted string at `start`, if there is one.
/// `$1` style parameters are not tags.
fn dollar_tag(sql: &str, start: usize) -> Option<&str> {
    let rest = &sql[start + 1..];
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let starts_with_digit = rest.as_bytes().first().is_some_and(u8::is_ascii_digit);
    if starts_with_digit || !rest[len..].starts_with('$') {
        return None;
    }
    Some(&sql[start..start + len + 2])
}

/// Convert a SqlValue to a boxed ToSql trait object.
fn sql_value_to_tosql(value: &SqlValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::Null => Box::new(None::<String>),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Int32(i) => Box::new(*i),
        SqlValue::Int64(i) => Box::new(*i),
        SqlValue::Float(f) => Box::new(*f),
        SqlValue::Bool(b) => Box::new(*b),
        SqlValue::Blob(b) => Box::new(b.clone()),
    }
}

fn unsupported_type(column: &str, ty: &Type) -> SqlExecError {
    SqlExecError::QueryFailed(format!(
        "unsupported column type {ty} for column \"{column}\""
    ))
}

/// How a PostgreSQL column is read into a SqlValue.
/// Types without a native SqlValue variant are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnDecoder {
    Bool,
    Int2,
    Int4,
    Int8,
    Oid,
    Float4,
    Float8,
    Bytea,
    Text,
    Numeric,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    Uuid,
    Json,
}

impl ColumnDecoder {
    fn for_type(ty: &Type) -> Option<Self> {
        let decoder = if *ty == Type::BOOL {
            Self::Bool
        } else if *ty == Type::INT2 {
            Self::Int2
        } else if *ty == Type::INT4 {
            Self::Int4
        } else if *ty == Type::INT8 {
            Self::Int8
        } else if *ty == Type::OID {
            Self::Oid
        } else if *ty == Type::FLOAT4 {
            Self::Float4
        } else if *ty == Type::FLOAT8 {
            Self::Float8
        } else if *ty == Type::BYTEA {
            Self::Bytea
        } else if *ty == Type::NUMERIC {
            Self::Numeric
        } else if *ty == Type::TIMESTAMP {
            Self::Timestamp
        } else if *ty == Type::TIMESTAMPTZ {
            Self::TimestampTz
        } else if *ty == Type::DATE {
            Self::Date
        } else if *ty == Type::TIME {
            Self::Time
        } else if *ty == Type::UUID {
            Self::Uuid
        } else if *ty == Type::JSON || *ty == Type::JSONB {
            Self::Json
        } else if <String as FromSql>::accepts(ty) {
            Self::Text
        } else {
            return None;
        };
        Some(decoder)
    }

    fn decode(
        self,
        row: &tokio_postgres::Row,
        index: usize,
    ) -> std::result::Result<SqlValue, tokio_postgres::Error> {
        let value = match self {
            Self::Bool => SqlValue::from(row.try_get::<_, Option<bool>>(index)?),
            Self::Int2 => SqlValue::from(row.try_get::<_, Option<i16>>(index)?.map(i32::from)),
            Self::Int4 => SqlValue::from(row.try_get::<_, Option<i32>>(index)?),
            Self::Int8 => SqlValue::from(row.try_get::<_, Option<i64>>(index)?),
            Self::Oid => SqlValue::from(row.try_get::<_, Option<u32>>(index)?.map(i64::from)),
            Self::Float4 => SqlValue::from(row.try_get::<_, Option<f32>>(index)?.map(f64::from)),
            Self::Float8 => SqlValue::from(row.try_get::<_, Option<f64>>(index)?),
            Self::Bytea => SqlValue::from(row.try_get::<_, Option<Vec<u8>>>(index)?),
            Self::Text => SqlValue::from(row.try_get::<_, Option<String>>(index)?),
            Self::Numeric => {
                SqlValue::from(row.try_get::<_, Option<NumericText>>(index)?.map(|n| n.0))
            }
            Self::Timestamp => SqlValue::from(
                row.try_get::<_, Option<NaiveDateTime>>(index)?
                    .map(|t| t.to_string()),
            ),
            Self::TimestampTz => SqlValue::from(
                row.try_get::<_, Option<DateTime<Utc>>>(index)?
                    .map(|t| t.to_rfc3339()),
            ),
            Self::Date => SqlValue::from(
                row.try_get::<_, Option<NaiveDate>>(index)?
                    .map(|d| d.to_string()),
            ),
            Self::Time => SqlValue::from(
                row.try_get::<_, Option<NaiveTime>>(index)?
                    .map(|t| t.to_string()),
            ),
            Self::Uuid => SqlValue::from(
                row.try_get::<_, Option<uuid::Uuid>>(index)?
                    .map(|u| u.to_string()),
            ),
            Self::Json => SqlValue::from(
                row.try_get::<_, Option<serde_json::Value>>(index)?
                    .map(|j| j.to_string()),
            ),
        };
        Ok(value)
    }
}

/// NUMERIC rendered exactly, as PostgreSQL prints it.
struct NumericText(String);

impl<'a> FromSql<'a> for NumericText {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> std::result::Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        format_numeric(raw).map(NumericText)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Formats the binary NUMERIC wire value: a header of digit count, weight,
/// sign and display scale followed by base-10000 digits.
fn format_numeric(
    raw: &[u8],
) -> std::result::Result<String, Box<dyn std::error::Error + Sync + Send>> {
    let word = |at: usize| u16::from_be_bytes([raw[at], raw[at + 1]]);

    if raw.len() < 8 {
        return Err("invalid numeric header".into());
    }
    let ndigits = usize::from(word(0));
    let weight = i32::from(word(2) as i16);
    let sign = word(4);
    let dscale = usize::from(word(6));
    if raw.len() != 8 + ndigits * 2 {
        return Err("invalid numeric length".into());
    }

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }

    let digit = |pos: i32| -> u16 {
        usize::try_from(pos)
            .ok()
            .filter(|&p| p < ndigits)
            .map_or(0, |p| word(8 + p * 2))
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        out.push_str(&digit(0).to_string());
        for pos in 1..=weight {
            out.push_str(&format!("{:04}", digit(pos)));
        }
    }

    if dscale > 0 {
        let mut frac = String::with_capacity(dscale + 4);
        let mut pos = weight + 1;
        while frac.len() < dscale {
            frac.push_str(&format!("{:04}", digit(pos)));
            pos += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }

    Ok(out)
}
