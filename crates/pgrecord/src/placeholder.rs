//! Placeholder scanning over SQL text.
//!
//! Three marker forms are recognized:
//! - `:name:`       the builder's scalar placeholder
//! - `{name:array}` a list placeholder awaiting expansion
//! - `:name`        the translated scalar placeholder
//!
//! Names start with a letter or `_` and continue with letters, digits or
//! `_` (Unicode letters included), optionally in dotted segments such as
//! `u.status`. Nothing inside single-quoted literals (including `E'...'`
//! escape strings), double-quoted identifiers, dollar-quoted bodies or
//! comments is treated as a marker, and `::` casts are skipped.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerKind {
    /// `:name:`
    Legacy,
    /// `{name:array}`
    Array,
    /// `:name`
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marker<'a> {
    pub kind: MarkerKind,
    pub name: &'a str,
    /// Byte range of the whole marker in the scanned text.
    pub span: Range<usize>,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// A byte that can sit inside an unquoted identifier. Non-ASCII bytes count,
/// since they belong to a multi-byte letter.
fn is_word_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric() || !b.is_ascii()
}

/// End of the (possibly dotted) name starting at byte `start`, if one starts there.
fn ident_end(sql: &str, start: usize) -> Option<usize> {
    let first = sql.get(start..)?.chars().next()?;
    if !is_ident_start(first) {
        return None;
    }
    let mut end = start + first.len_utf8();
    loop {
        let mut rest = sql[end..].chars();
        match rest.next() {
            Some(c) if is_ident_continue(c) => end += c.len_utf8(),
            Some('.') if rest.next().is_some_and(is_ident_start) => end += 1,
            _ => break,
        }
    }
    Some(end)
}

/// Skip a quoted run starting at `start` (which holds `quote`). Doubled quotes
/// are escapes, and so is a backslash when `backslash_escapes` is set.
/// Returns the index just past the closing quote.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8, backslash_escapes: bool) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if backslash_escapes && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Whether the `'` at `start` opens an `E'...'` escape string.
fn is_escape_string(bytes: &[u8], start: usize) -> bool {
    match start.checked_sub(1).map(|i| bytes[i]) {
        Some(b'E' | b'e') => start < 2 || !is_word_byte(bytes[start - 2]),
        _ => false,
    }
}

/// Skip `$tag$ ... $tag$`. Returns `None` if `start` does not open a dollar quote.
fn skip_dollar_quoted(sql: &str, start: usize) -> Option<usize> {
    let bytes = sql.as_bytes();
    // `a$b` is an identifier, not a tag.
    if start > 0 && is_word_byte(bytes[start - 1]) {
        return None;
    }
    let mut tag_end = start + 1;
    while tag_end < bytes.len() && is_word_byte(bytes[tag_end]) {
        tag_end += 1;
    }
    if bytes.get(tag_end) != Some(&b'$') {
        return None;
    }
    // `$1` is a positional parameter, not a tag.
    if tag_end > start + 1 && bytes[start + 1].is_ascii_digit() {
        return None;
    }
    let tag = &sql[start..=tag_end];
    let body = tag_end + 1;
    Some(match sql[body..].find(tag) {
        Some(pos) => body + pos + tag.len(),
        None => bytes.len(),
    })
}

/// Find every placeholder marker in `sql`, in order of appearance.
pub(crate) fn scan(sql: &str) -> Vec<Marker<'_>> {
    let bytes = sql.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => i = skip_quoted(bytes, i, b'\'', is_escape_string(bytes, i)),
            b'"' => i = skip_quoted(bytes, i, b'"', false),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = match sql[i..].find('\n') {
                    Some(pos) => i + pos + 1,
                    None => bytes.len(),
                };
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match sql[i + 2..].find("*/") {
                    Some(pos) => i + 2 + pos + 2,
                    None => bytes.len(),
                };
            }
            b'$' => match skip_dollar_quoted(sql, i) {
                Some(next) => i = next,
                None => i += 1,
            },
            b':' if bytes.get(i + 1) == Some(&b':') => {
                // `::type` cast; step over the type name so `a::text:` is not a marker.
                i += 2;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
            }
            b':' => match ident_end(sql, i + 1) {
                Some(end) => {
                    let name = &sql[i + 1..end];
                    let legacy =
                        bytes.get(end) == Some(&b':') && bytes.get(end + 1) != Some(&b':');
                    let (kind, stop) = if legacy {
                        (MarkerKind::Legacy, end + 1)
                    } else {
                        (MarkerKind::Named, end)
                    };
                    markers.push(Marker {
                        kind,
                        name,
                        span: i..stop,
                    });
                    i = stop;
                }
                None => i += 1,
            },
            b'{' => match ident_end(sql, i + 1) {
                Some(end) if sql[end..].starts_with(":array}") => {
                    let stop = end + ":array}".len();
                    markers.push(Marker {
                        kind: MarkerKind::Array,
                        name: &sql[i + 1..end],
                        span: i..stop,
                    });
                    i = stop;
                }
                _ => i += 1,
            },
            _ => i += 1,
        }
    }

    markers
}

/// Rebuild `sql`, replacing each marker with whatever `render` returns for it.
///
/// Returning `None` keeps the marker text unchanged.
pub(crate) fn rewrite<'a, E>(
    sql: &str,
    markers: &[Marker<'a>],
    mut render: impl FnMut(&Marker<'a>) -> Result<Option<String>, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    for marker in markers {
        out.push_str(&sql[last..marker.span.start]);
        match render(marker)? {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(&sql[marker.span.clone()]),
        }
        last = marker.span.end;
    }
    out.push_str(&sql[last..]);
    Ok(out)
}
