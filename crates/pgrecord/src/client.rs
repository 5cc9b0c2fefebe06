//! Generic client trait for unified database access.

use crate::error::{OrmError, OrmResult};
use futures_util::TryStreamExt;
use std::pin::pin;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
///
/// Finders and raw SQL helpers take `&impl GenericClient`, so the same call
/// works on a plain connection, a pooled connection or a transaction.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a query and return all rows, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::query`].
    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        let _ = tag;
        self.query(sql, params)
    }

    /// Execute a query and return the first row, if any.
    ///
    /// Rows after the first are not fetched.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send;

    /// Execute a query and return the first row, if any, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::query_opt`].
    fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send {
        let _ = tag;
        self.query_opt(sql, params)
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Execute a statement and return the number of affected rows, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::execute`].
    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        let _ = tag;
        self.execute(sql, params)
    }
}

/// Pull the first row off a `query_raw` stream and drop the rest.
async fn first_row(stream: tokio_postgres::RowStream) -> OrmResult<Option<Row>> {
    let mut stream = pin!(stream);
    stream.try_next().await.map_err(OrmError::from_db_error)
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Option<Row>> {
        let stream = tokio_postgres::Client::query_raw(self, sql, params.iter().copied())
            .await
            .map_err(OrmError::from_db_error)?;
        first_row(stream).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Option<Row>> {
        let stream = tokio_postgres::Transaction::query_raw(self, sql, params.iter().copied())
            .await
            .map_err(OrmError::from_db_error)?;
        first_row(stream).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

/// Pooled clients and transactions delegate to their `tokio_postgres` deref target.
#[cfg(feature = "pool")]
macro_rules! impl_generic_client_via_deref {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GenericClient for $ty {
                async fn query(
                    &self,
                    sql: &str,
                    params: &[&(dyn ToSql + Sync)],
                ) -> OrmResult<Vec<Row>> {
                    GenericClient::query(&**self, sql, params).await
                }

                async fn query_opt(
                    &self,
                    sql: &str,
                    params: &[&(dyn ToSql + Sync)],
                ) -> OrmResult<Option<Row>> {
                    GenericClient::query_opt(&**self, sql, params).await
                }

                async fn execute(
                    &self,
                    sql: &str,
                    params: &[&(dyn ToSql + Sync)],
                ) -> OrmResult<u64> {
                    GenericClient::execute(&**self, sql, params).await
                }
            }
        )*
    };
}

#[cfg(feature = "pool")]
impl_generic_client_via_deref!(
    deadpool_postgres::Client,
    deadpool_postgres::ClientWrapper,
    deadpool_postgres::Transaction<'_>,
);

// ===== Reference implementations =====

impl<C: GenericClient> GenericClient for &C {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        (*self).query(sql, params).await
    }

    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        (*self).query_tagged(tag, sql, params)
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Option<Row>> {
        (*self).query_opt(sql, params).await
    }

    fn query_opt_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send {
        (*self).query_opt_tagged(tag, sql, params)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        (*self).execute(sql, params).await
    }

    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (*self).execute_tagged(tag, sql, params)
    }
}
