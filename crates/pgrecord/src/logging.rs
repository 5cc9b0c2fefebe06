//! SQL debug logging.
//!
//! With the `tracing` feature (on by default) every statement is logged on
//! the `pgrecord.sql` target before it runs, and rejected parameter sets are
//! logged on `pgrecord.bind`. Without the feature these compile to nothing.

/// Maximum SQL length (in bytes) included in log events.
#[cfg(feature = "tracing")]
const MAX_SQL_LENGTH: usize = 200;

/// Truncate a SQL string to at most `max_bytes`, respecting char boundaries.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub(crate) fn statement(tag: &str, sql: &str, param_count: usize) {
    let shown = truncate_sql_bytes(sql, MAX_SQL_LENGTH);
    let truncated = shown.len() < sql.len();
    tracing::debug!(
        target: "pgrecord.sql",
        tag,
        params = param_count,
        truncated,
        sql = %shown,
        "executing statement"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn statement(_tag: &str, _sql: &str, _param_count: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn rejected(sql: &str, err: &crate::error::OrmError) {
    tracing::warn!(
        target: "pgrecord.bind",
        sql = %truncate_sql_bytes(sql, MAX_SQL_LENGTH),
        error = %err,
        "rejected query parameters"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn rejected(_sql: &str, _err: &crate::error::OrmError) {}
