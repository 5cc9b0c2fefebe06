//! Named-to-positional compilation and execution.
//!
//! Postgres only understands positional `$1, $2, ...` parameters. A
//! [`CompiledQuery`] is SQL written with `:name` placeholders, rewritten to
//! positional form together with the values in placeholder order.
//!
//! ```ignore
//! use pgrecord::{binds, CompiledQuery};
//!
//! let q = CompiledQuery::from_template(
//!     "SELECT * FROM users WHERE status = :status: AND id IN ({ids:array})",
//!     binds! { "status" => 1, "ids" => vec![5, 6] },
//! )?;
//! assert_eq!(q.sql(), "SELECT * FROM users WHERE status = $1 AND id IN ($2, $3)");
//! let rows = q.fetch_all(&client, "users.by_ids").await?;
//! ```

use crate::bind::translate_bind_syntax;
use crate::client::GenericClient;
use crate::condition::QueryParams;
use crate::error::{OrmError, OrmResult};
use crate::logging;
use crate::map::BindMap;
use crate::placeholder::{self, MarkerKind};
use crate::row::FromRow;
use crate::value::{BindValue, Value};
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql};

/// SQL with positional placeholders and the values bound to them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    sql: String,
    params: Vec<Value>,
}

impl CompiledQuery {
    /// Compile SQL that already uses `:name` placeholders.
    ///
    /// A name used more than once maps to a single positional parameter.
    /// Bind entries that no placeholder refers to are ignored.
    ///
    /// # Errors
    ///
    /// - [`OrmError::UnresolvedPlaceholder`] for a name missing from `bind`, or
    ///   for an untranslated `:name:` / `{name:array}` marker.
    /// - [`OrmError::Validation`] when a list value is bound to a `:name` placeholder.
    pub fn compile(sql: &str, bind: &BindMap) -> OrmResult<Self> {
        let markers = placeholder::scan(sql);
        let mut names: Vec<&str> = Vec::new();
        let mut params = Vec::new();

        let sql = placeholder::rewrite(sql, &markers, |m| {
            if m.kind != MarkerKind::Named {
                return Err(OrmError::unresolved(m.name));
            }
            if let Some(idx) = names.iter().position(|n| *n == m.name) {
                return Ok(Some(format!("${}", idx + 1)));
            }
            match bind.get(m.name) {
                Some(BindValue::Scalar(v)) => {
                    names.push(m.name);
                    params.push(v.clone());
                    Ok(Some(format!("${}", params.len())))
                }
                Some(BindValue::List(_)) => Err(OrmError::validation(format!(
                    "list value bound to scalar placeholder :{0}; use {{{0}:array}}",
                    m.name
                ))),
                None => Err(OrmError::unresolved(m.name)),
            }
        })?;

        Ok(Self { sql, params })
    }

    /// Translate `:name:` / `{name:array}` placeholders, then compile.
    pub fn from_template(sql: &str, bind: BindMap) -> OrmResult<Self> {
        let result =
            translate_bind_syntax(sql, bind).and_then(|(sql, bind)| Self::compile(&sql, &bind));
        if let Err(err) = &result {
            logging::rejected(sql, err);
        }
        result
    }

    /// Compile a built filter. The filter is used as the whole statement.
    pub fn from_params(params: QueryParams) -> OrmResult<Self> {
        Self::from_template(&params.filter, params.bind)
    }

    /// The SQL with `$n` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient, tag: &str) -> OrmResult<Vec<Row>> {
        logging::statement(tag, &self.sql, self.params.len());
        conn.query_tagged(tag, &self.sql, &self.params_ref()).await
    }

    /// Execute and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        tag: &str,
    ) -> OrmResult<Vec<T>> {
        let rows = self.fetch_all(conn, tag).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient, tag: &str) -> OrmResult<Option<Row>> {
        logging::statement(tag, &self.sql, self.params.len());
        conn.query_opt_tagged(tag, &self.sql, &self.params_ref()).await
    }

    /// Execute and return the first row mapped to `T`, if any.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        tag: &str,
    ) -> OrmResult<Option<T>> {
        let row = self.fetch_opt(conn, tag).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and return the first column of the first row, if any.
    pub async fn fetch_scalar_opt<T>(&self, conn: &impl GenericClient, tag: &str) -> OrmResult<Option<T>>
    where
        T: for<'a> FromSql<'a> + Send + Sync,
    {
        let Some(row) = self.fetch_opt(conn, tag).await? else {
            return Ok(None);
        };
        if row.is_empty() {
            return Err(OrmError::decode("0", "query returned no columns"));
        }
        row.try_get::<_, T>(0)
            .map(Some)
            .map_err(|e| OrmError::decode("0", e.to_string()))
    }

    /// Execute and return the number of affected rows.
    pub async fn execute(&self, conn: &impl GenericClient, tag: &str) -> OrmResult<u64> {
        logging::statement(tag, &self.sql, self.params.len());
        conn.execute_tagged(tag, &self.sql, &self.params_ref()).await
    }
}
