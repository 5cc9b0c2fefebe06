//! Raw SQL helpers.
//!
//! Hand-written SQL with `:name:` / `{name:array}` placeholders, executed
//! against an explicit client. Results come back as [`Record`]s unless a
//! typed `_as` variant is used.
//!
//! ```ignore
//! use pgrecord::{binds, raw};
//!
//! let rows = raw::sql_fetch_all(
//!     &client,
//!     "SELECT id, name FROM users WHERE id IN ({ids:array})",
//!     binds! { "ids" => vec![1, 2, 3] },
//! )
//! .await?;
//! ```

use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::map::BindMap;
use crate::named::CompiledQuery;
use crate::record::Record;
use crate::row::FromRow;
use crate::value::Value;

/// Execute a statement and return the number of affected rows.
pub async fn sql_execute(conn: &impl GenericClient, sql: &str, bind: BindMap) -> OrmResult<u64> {
    CompiledQuery::from_template(sql, bind)?
        .execute(conn, "sql_execute")
        .await
}

/// Fetch every row as a [`Record`].
pub async fn sql_fetch_all(
    conn: &impl GenericClient,
    sql: &str,
    bind: BindMap,
) -> OrmResult<Vec<Record>> {
    sql_fetch_all_as(conn, sql, bind).await
}

/// Fetch every row mapped to `T`.
pub async fn sql_fetch_all_as<T: FromRow>(
    conn: &impl GenericClient,
    sql: &str,
    bind: BindMap,
) -> OrmResult<Vec<T>> {
    CompiledQuery::from_template(sql, bind)?
        .fetch_all_as(conn, "sql_fetch_all")
        .await
}

/// Fetch the first row as a [`Record`], if any.
pub async fn sql_fetch_one(
    conn: &impl GenericClient,
    sql: &str,
    bind: BindMap,
) -> OrmResult<Option<Record>> {
    sql_fetch_one_as(conn, sql, bind).await
}

/// Fetch the first row mapped to `T`, if any.
pub async fn sql_fetch_one_as<T: FromRow>(
    conn: &impl GenericClient,
    sql: &str,
    bind: BindMap,
) -> OrmResult<Option<T>> {
    CompiledQuery::from_template(sql, bind)?
        .fetch_opt_as(conn, "sql_fetch_one")
        .await
}

/// Fetch the first column of the first row, if any.
pub async fn sql_fetch_column(
    conn: &impl GenericClient,
    sql: &str,
    bind: BindMap,
) -> OrmResult<Option<Value>> {
    CompiledQuery::from_template(sql, bind)?
        .fetch_scalar_opt::<Value>(conn, "sql_fetch_column")
        .await
}
