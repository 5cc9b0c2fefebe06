//! Convenient imports for typical `pgrecord` usage.
//!
//! ```ignore
//! use pgrecord::prelude::*;
//! ```

pub use crate::{
    BindMap, BindValue, CompiledQuery, ConditionMap, Conditions, FromRow, GenericClient, Model,
    OrmError, OrmResult, QueryParams, Record, RowExt, Value, binds, build_params,
    translate_bind_syntax,
};

#[cfg(feature = "pool")]
pub use crate::{PoolConfig, create_pool, create_pool_from_config};
