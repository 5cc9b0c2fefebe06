//! Bind placeholder translation.
//!
//! Filters produced by [`build_params`](crate::build_params), and hand-written
//! SQL passed to the raw helpers, use two placeholder forms:
//!
//! - `:name:` for a scalar value
//! - `{name:array}` for a list value that expands into one placeholder per item
//!
//! [`translate_bind_syntax`] rewrites them into the `:name` form consumed by
//! [`CompiledQuery`](crate::CompiledQuery):
//!
//! ```ignore
//! use pgrecord::{binds, translate_bind_syntax};
//!
//! let (sql, bind) = translate_bind_syntax("id IN ({ids:array})", binds! { "ids" => vec![5, 6, 7] })?;
//! assert_eq!(sql, "id IN (:ids_0, :ids_1, :ids_2)");
//! assert_eq!(bind, binds! { "ids_0" => 5, "ids_1" => 6, "ids_2" => 7 });
//! ```

use crate::error::{OrmError, OrmResult};
use crate::map::BindMap;
use crate::placeholder::{self, MarkerKind};
use crate::value::BindValue;
use std::collections::HashMap;

/// Rendered in place of `{name:array}` when the list is empty, so `IN (...)` stays valid.
const EMPTY_LIST_SQL: &str = "NULL";

/// Translate `:name:` and `{name:array}` placeholders in `filter`.
///
/// - `:k:` becomes `:k` for every key `k` in `bind`.
/// - `{k:array}` with a list value becomes `:k_0, :k_1, ...`; the list items
///   are bound as `k_0, k_1, ...` (re-indexed from zero, in list order,
///   appended after the existing entries) and `k` itself is removed.
/// - Entries not used as `{k:array}` are left as they are.
///
/// # Errors
///
/// - [`OrmError::ArrayPlaceholderTypeMismatch`] if `{k:array}` refers to a scalar.
/// - [`OrmError::UnresolvedPlaceholder`] if a `:k:` or `{k:array}` marker has no bind entry.
/// - [`OrmError::Validation`] if an expanded name collides with an existing key.
pub fn translate_bind_syntax(filter: &str, bind: BindMap) -> OrmResult<(String, BindMap)> {
    let markers = placeholder::scan(filter);
    if markers.iter().all(|m| m.kind == MarkerKind::Named) {
        return Ok((filter.to_string(), bind));
    }

    for marker in &markers {
        match (marker.kind, bind.get(marker.name)) {
            (MarkerKind::Named, _) => {}
            (_, None) => return Err(OrmError::unresolved(marker.name)),
            (MarkerKind::Array, Some(BindValue::Scalar(_))) => {
                return Err(OrmError::array_mismatch(marker.name));
            }
            _ => {}
        }
    }

    let mut bind = bind;
    let array_keys: Vec<String> = bind
        .keys()
        .filter(|key| {
            markers
                .iter()
                .any(|m| m.kind == MarkerKind::Array && m.name == *key)
        })
        .map(str::to_string)
        .collect();

    let mut expansions: HashMap<String, String> = HashMap::with_capacity(array_keys.len());
    for key in array_keys {
        let Some(BindValue::List(items)) = bind.remove(&key) else {
            continue;
        };
        let mut names = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let name = format!("{key}_{i}");
            if bind.contains_key(&name) {
                return Err(OrmError::validation(format!(
                    "expanding {{{key}:array}} would overwrite the existing bind key '{name}'"
                )));
            }
            bind.insert(name.clone(), BindValue::Scalar(item));
            names.push(format!(":{name}"));
        }
        let rendered = if names.is_empty() {
            EMPTY_LIST_SQL.to_string()
        } else {
            names.join(", ")
        };
        expansions.insert(key, rendered);
    }

    let translated = placeholder::rewrite(filter, &markers, |m| {
        Ok::<_, OrmError>(match m.kind {
            MarkerKind::Legacy => Some(format!(":{}", m.name)),
            MarkerKind::Array => expansions.get(m.name).cloned(),
            MarkerKind::Named => None,
        })
    })?;

    Ok((translated, bind))
}

#[cfg(test)]
mod tests;
