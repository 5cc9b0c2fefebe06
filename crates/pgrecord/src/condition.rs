//! Condition maps and the filter/bind builder.
//!
//! A [`Conditions`] value describes a filter loosely: a raw SQL fragment, or a
//! map of column → value where the value implies `=` unless it carries an
//! explicit operator. [`build_params`] turns it into [`QueryParams`]: a filter
//! fragment using `:name:` placeholders plus the matching [`BindMap`].
//!
//! # Example
//!
//! ```ignore
//! use pgrecord::{ConditionMap, build_params, BindMap};
//!
//! let conditions = ConditionMap::new()
//!     .eq("status", 1)
//!     .like("name", "%a%");
//! let params = build_params(conditions, BindMap::new())?;
//! assert_eq!(params.filter, " status = :status:  AND  name LIKE :name: ");
//! ```
//!
//! Only values are parameterized. Column names and operators are copied into
//! the fragment verbatim, so they must never come from untrusted input.

use crate::error::{OrmError, OrmResult};
use crate::map::{BindMap, OrderedMap};
use crate::value::BindValue;

/// The right-hand side of one condition-map entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// `column = value`
    Eq(BindValue),
    /// `column {operator} value`, operator copied as given.
    Op { operator: String, value: BindValue },
}

impl ConditionValue {
    pub fn operator(&self) -> &str {
        match self {
            ConditionValue::Eq(_) => "=",
            ConditionValue::Op { operator, .. } => operator,
        }
    }

    pub fn value(&self) -> &BindValue {
        match self {
            ConditionValue::Eq(v) | ConditionValue::Op { value: v, .. } => v,
        }
    }

    fn into_parts(self) -> (String, BindValue) {
        match self {
            ConditionValue::Eq(v) => ("=".to_string(), v),
            ConditionValue::Op { operator, value } => (operator, value),
        }
    }
}

impl From<BindValue> for ConditionValue {
    fn from(value: BindValue) -> Self {
        ConditionValue::Eq(value)
    }
}

/// Column → condition, in insertion order.
pub type ConditionMap = OrderedMap<ConditionValue>;

impl OrderedMap<ConditionValue> {
    /// `column = value`
    pub fn eq(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.with(column, ConditionValue::Eq(value.into()))
    }

    /// `column {operator} value` with an arbitrary operator.
    pub fn op(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<BindValue>,
    ) -> Self {
        self.with(
            column,
            ConditionValue::Op {
                operator: operator.into(),
                value: value.into(),
            },
        )
    }

    pub fn ne(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.op(column, "<>", value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.op(column, ">", value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.op(column, ">=", value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.op(column, "<", value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.op(column, "<=", value)
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<BindValue>) -> Self {
        self.op(column, "LIKE", pattern)
    }

    pub fn ilike(self, column: impl Into<String>, pattern: impl Into<BindValue>) -> Self {
        self.op(column, "ILIKE", pattern)
    }
}

/// A loosely-shaped filter description.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Conditions {
    /// No filter.
    #[default]
    Empty,
    /// A filter fragment used as-is.
    Raw(String),
    /// Column → value/operator map.
    Map(ConditionMap),
}

impl Conditions {
    /// Whether this describes no filter at all (empty string or empty map included).
    pub fn is_empty(&self) -> bool {
        match self {
            Conditions::Empty => true,
            Conditions::Raw(s) => s.is_empty(),
            Conditions::Map(m) => m.is_empty(),
        }
    }

    /// Interpret a JSON value as conditions.
    ///
    /// Accepted shapes:
    /// - `null` → no filter
    /// - a string → raw filter
    /// - an object whose values are scalars (`=`) or `[operator, value]`
    ///   pairs with a string operator
    ///
    /// Anything else fails with [`OrmError::InvalidConditionShape`].
    pub fn from_json(json: serde_json::Value) -> OrmResult<Self> {
        use serde_json::Value as Json;

        match json {
            Json::Null => Ok(Conditions::Empty),
            Json::String(s) => Ok(Conditions::Raw(s)),
            Json::Object(obj) => {
                let mut map = ConditionMap::with_capacity(obj.len());
                for (column, value) in obj {
                    let cond = match value {
                        Json::Array(items) => condition_from_pair(&column, items)?,
                        Json::Object(_) => {
                            return Err(OrmError::invalid_shape(format!(
                                "condition for column '{column}' is an object"
                            )));
                        }
                        scalar => ConditionValue::Eq(BindValue::from_json(scalar)),
                    };
                    map.insert(column, cond);
                }
                Ok(Conditions::Map(map))
            }
            Json::Bool(_) => Err(OrmError::invalid_shape("conditions cannot be a boolean")),
            Json::Number(_) => Err(OrmError::invalid_shape("conditions cannot be a number")),
            Json::Array(_) => Err(OrmError::invalid_shape(
                "conditions cannot be a list; use an object of column => value",
            )),
        }
    }
}

fn condition_from_pair(column: &str, items: Vec<serde_json::Value>) -> OrmResult<ConditionValue> {
    let mut iter = items.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(serde_json::Value::String(operator)), Some(value), None) => Ok(ConditionValue::Op {
            operator,
            value: BindValue::from_json(value),
        }),
        _ => Err(OrmError::invalid_shape(format!(
            "condition for column '{column}' must be [operator, value]"
        ))),
    }
}

impl From<&str> for Conditions {
    fn from(s: &str) -> Self {
        Conditions::Raw(s.to_string())
    }
}

impl From<String> for Conditions {
    fn from(s: String) -> Self {
        Conditions::Raw(s)
    }
}

impl From<ConditionMap> for Conditions {
    fn from(map: ConditionMap) -> Self {
        Conditions::Map(map)
    }
}

impl From<()> for Conditions {
    fn from(_: ()) -> Self {
        Conditions::Empty
    }
}

impl<T: Into<Conditions>> From<Option<T>> for Conditions {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// A filter fragment and the values its placeholders refer to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParams {
    /// WHERE-clause fragment, empty when there is no filter.
    pub filter: String,
    /// Placeholder name → value.
    pub bind: BindMap,
}

impl QueryParams {
    pub fn new(filter: impl Into<String>, bind: BindMap) -> Self {
        Self {
            filter: filter.into(),
            bind,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty() && self.bind.is_empty()
    }
}

/// Build a filter fragment and bind map from `conditions`.
///
/// - Empty conditions yield empty params, whatever `bind` holds.
/// - With a non-empty `bind`, `conditions` must be a raw string; both are
///   returned unchanged and the caller keeps placeholders and keys in sync.
/// - With an empty `bind`, a raw string passes through with no binds, and a
///   map produces one ` {column} {operator} :{column}: ` clause per entry,
///   joined by ` AND ` in insertion order.
pub fn build_params(conditions: impl Into<Conditions>, bind: BindMap) -> OrmResult<QueryParams> {
    let conditions = conditions.into();
    if conditions.is_empty() {
        return Ok(QueryParams::default());
    }

    match conditions {
        Conditions::Raw(filter) => Ok(QueryParams { filter, bind }),
        Conditions::Map(map) if bind.is_empty() => Ok(params_from_map(map)),
        Conditions::Map(_) => Err(OrmError::invalid_shape(
            "a condition map cannot be combined with an explicit bind map; pass a filter string",
        )),
        Conditions::Empty => Ok(QueryParams::default()),
    }
}

fn params_from_map(map: ConditionMap) -> QueryParams {
    let mut clauses = Vec::with_capacity(map.len());
    let mut bind = BindMap::with_capacity(map.len());
    for (column, cond) in map {
        let (operator, value) = cond.into_parts();
        clauses.push(format!(" {column} {operator} :{column}: "));
        bind.insert(column, value);
    }
    QueryParams {
        filter: clauses.join(" AND "),
        bind,
    }
}
