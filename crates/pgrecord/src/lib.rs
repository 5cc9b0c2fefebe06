//! # pgrecord
//!
//! A small PostgreSQL record layer built around loosely-shaped conditions.
//!
//! ## Features
//!
//! - **Condition maps**: `{column: value}` or `{column: (operator, value)}` become a
//!   parameterized filter via [`build_params`]
//! - **Bind translation**: `:name:` and `{name:array}` placeholders, with list values
//!   expanded into one placeholder per item ([`translate_bind_syntax`])
//! - **Positional compilation**: named placeholders become `$1, $2, ...` for
//!   `tokio-postgres` ([`CompiledQuery`])
//! - **Explicit connections**: finders and raw helpers take any [`GenericClient`],
//!   including transactions and pooled clients
//!
//! ## Example
//!
//! ```ignore
//! use pgrecord::{binds, ConditionMap, BindMap, Model, raw};
//!
//! // Condition map → " status = :status:  AND  name LIKE :name: "
//! let users = User::find_simple(
//!     &client,
//!     ConditionMap::new().eq("status", 1).like("name", "%a%"),
//!     BindMap::new(),
//! )
//! .await?;
//!
//! // Raw SQL with a list placeholder
//! let rows = raw::sql_fetch_all(
//!     &client,
//!     "SELECT * FROM users WHERE id IN ({ids:array})",
//!     binds! { "ids" => vec![5, 6, 7] },
//! )
//! .await?;
//! ```

pub mod bind;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod map;
pub mod model;
pub mod named;
pub mod prelude;
pub mod raw;
pub mod record;
pub mod row;
pub mod value;

mod logging;
mod placeholder;

pub use bind::translate_bind_syntax;
pub use client::GenericClient;
pub use condition::{ConditionMap, ConditionValue, Conditions, QueryParams, build_params};
pub use config::{PoolConfig, Recycling};
pub use error::{OrmError, OrmResult};
pub use map::{BindMap, OrderedMap};
pub use model::Model;
pub use named::CompiledQuery;
pub use raw::{
    sql_execute, sql_fetch_all, sql_fetch_all_as, sql_fetch_column, sql_fetch_one,
    sql_fetch_one_as,
};
pub use record::Record;
pub use row::{FromRow, RowExt};
pub use value::{BindValue, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config, create_pool_with_config};
