//! Column conversion helpers shared by the query modules.

use jiff::{civil::Date, Timestamp};
use rusqlite::types::Type;

/// Parse an RFC 3339 text column into a [`Timestamp`].
pub(super) fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<Timestamp> {
    value
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse an optional RFC 3339 text column.
pub(super) fn parse_optional_timestamp(
    column: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<Timestamp>> {
    value.map(|v| parse_timestamp(column, &v)).transpose()
}

/// Parse a `YYYY-MM-DD` text column into a civil [`Date`].
pub(super) fn parse_date(column: usize, value: &str) -> rusqlite::Result<Date> {
    value
        .parse::<Date>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Convert a signed integer column into `u32`, rejecting negatives.
pub(super) fn to_u32(column: usize, value: i64) -> rusqlite::Result<u32> {
    u32::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(column, value))
}

/// Convert a signed integer column into `u64`, treating NULL sums as zero.
pub(super) fn to_u64(column: usize, value: Option<i64>) -> rusqlite::Result<u64> {
    let value = value.unwrap_or(0);
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(column, value))
}
