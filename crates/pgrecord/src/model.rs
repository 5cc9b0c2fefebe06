//! Table-backed models with simple finders.
//!
//! Implement [`Model`] for a row type to get `find_simple`, `find_first_simple`,
//! `count_simple` and `find_by_id`. Every finder takes the connection
//! explicitly, so a transaction works wherever a client does.
//!
//! ```ignore
//! use pgrecord::{BindMap, ConditionMap, Model};
//!
//! let active = User::find_simple(
//!     &client,
//!     ConditionMap::new().eq("status", 1).like("name", "%a%"),
//!     BindMap::new(),
//! )
//! .await?;
//!
//! let count = User::count_simple(&client, "status = :status:", binds! { "status" => 1 }).await?;
//! ```

use crate::client::GenericClient;
use crate::condition::{Conditions, QueryParams, build_params};
use crate::error::{OrmError, OrmResult};
use crate::map::BindMap;
use crate::named::CompiledQuery;
use crate::row::FromRow;
use crate::value::{BindValue, Value};
use std::future::Future;

/// A row type stored in one table.
pub trait Model: FromRow + Send {
    /// Table name, optionally schema-qualified (`"public.users"`).
    const TABLE: &'static str;

    /// Primary-key column.
    const PK: &'static str = "id";

    /// All rows matching `conditions`.
    fn find_simple(
        conn: &impl GenericClient,
        conditions: impl Into<Conditions>,
        bind: BindMap,
    ) -> impl Future<Output = OrmResult<Vec<Self>>> + Send {
        let query = build_params(conditions, bind)
            .and_then(|params| select_query(Self::TABLE, "*", params, None));
        async move {
            query?
                .fetch_all_as::<Self>(conn, &tag(Self::TABLE, "find_simple"))
                .await
        }
    }

    /// The first row matching `conditions`, if any.
    fn find_first_simple(
        conn: &impl GenericClient,
        conditions: impl Into<Conditions>,
        bind: BindMap,
    ) -> impl Future<Output = OrmResult<Option<Self>>> + Send {
        let query = build_params(conditions, bind)
            .and_then(|params| select_query(Self::TABLE, "*", params, Some(1)));
        async move {
            query?
                .fetch_opt_as::<Self>(conn, &tag(Self::TABLE, "find_first_simple"))
                .await
        }
    }

    /// Number of rows matching `conditions`.
    fn count_simple(
        conn: &impl GenericClient,
        conditions: impl Into<Conditions>,
        bind: BindMap,
    ) -> impl Future<Output = OrmResult<i64>> + Send {
        let query = build_params(conditions, bind)
            .and_then(|params| select_query(Self::TABLE, "COUNT(*)", params, None));
        async move {
            let count = query?
                .fetch_scalar_opt::<i64>(conn, &tag(Self::TABLE, "count_simple"))
                .await?;
            Ok(count.unwrap_or(0))
        }
    }

    /// The row whose primary key equals `id`, if any.
    fn find_by_id(
        conn: &impl GenericClient,
        id: impl Into<Value>,
    ) -> impl Future<Output = OrmResult<Option<Self>>> + Send {
        let mut bind = BindMap::new();
        bind.insert(Self::PK, BindValue::Scalar(id.into()));
        let query = validate_ident(Self::PK).and_then(|()| {
            let params = QueryParams::new(format!("{pk} = :{pk}:", pk = Self::PK), bind);
            select_query(Self::TABLE, "*", params, Some(1))
        });
        async move {
            query?
                .fetch_opt_as::<Self>(conn, &tag(Self::TABLE, "find_by_id"))
                .await
        }
    }
}

fn tag(table: &str, op: &str) -> String {
    format!("{table}.{op}")
}

/// `SELECT {projection} FROM {table}[ WHERE {filter}][ LIMIT n]`, compiled.
pub(crate) fn select_query(
    table: &str,
    projection: &str,
    params: QueryParams,
    limit: Option<u32>,
) -> OrmResult<CompiledQuery> {
    validate_ident(table)?;

    let mut sql = format!("SELECT {projection} FROM {table}");
    if !params.filter.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&params.filter);
    }
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    CompiledQuery::from_template(&sql, params.bind)
}

/// Check that `ident` is a plain (optionally dotted) SQL identifier:
/// each segment must match `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn validate_ident(ident: &str) -> OrmResult<()> {
    let invalid = || OrmError::validation(format!("invalid identifier '{ident}'"));

    if ident.is_empty() {
        return Err(OrmError::validation("empty identifier"));
    }

    for seg in ident.split('.') {
        let mut chars = seg.chars();
        let Some(first) = chars.next() else {
            return Err(invalid());
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
    }
    Ok(())
}
