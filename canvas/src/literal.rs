//! Parser for the numeric literals typed into widget prompts.
//!
//! Accepted shapes:
//! - one-dimensional: `1, 2, 3` or `[1, 2, 3]`
//! - two-dimensional: `[[1, 2], [3, 4]]` or `[1, 2], [3, 4]`
//!
//! Brackets are stripped, values are split on commas and trimmed, and every
//! value must parse as a finite number. Values keep their original spelling.
//! Grid rows shorter than the widest row are padded with
//! [`GRID_PAD`](crate::consts::GRID_PAD).

#[cfg(test)]
#[path = "literal_test.rs"]
mod literal_test;

use crate::widgets::pad_rows;

/// Error returned by the literal parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unbalanced brackets")]
    UnbalancedBrackets,
    #[error("unexpected bracket inside a flat list")]
    UnexpectedBracket,
    #[error("literal nests deeper than two levels")]
    NestedTooDeep,
    #[error("empty element at position {index}")]
    EmptyElement { index: usize },
    #[error("not a number: {token:?}")]
    InvalidNumber { token: String },
    #[error("unexpected text between rows: {token:?}")]
    StrayContent { token: String },
}

/// Validate a single numeric value, returning it trimmed.
///
/// # Errors
///
/// Returns [`LiteralError::InvalidNumber`] unless `token` is a finite number.
pub fn parse_number(token: &str) -> Result<String, LiteralError> {
    let token = token.trim();
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(token.to_owned()),
        _ => Err(LiteralError::InvalidNumber { token: token.to_owned() }),
    }
}

/// Parse a one-dimensional literal.
///
/// `""` and `"[]"` yield an empty list.
///
/// # Errors
///
/// Returns [`LiteralError`] for unbalanced or nested brackets, empty
/// elements (`1,,2` or a trailing comma) and non-numeric values.
pub fn parse_array(input: &str) -> Result<Vec<String>, LiteralError> {
    let s = input.trim();
    let depth = max_depth(s)?;
    if depth > 1 {
        return Err(LiteralError::NestedTooDeep);
    }
    let body = strip_brackets(s)?;
    if body.contains(['[', ']']) {
        return Err(LiteralError::UnexpectedBracket);
    }
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .enumerate()
        .map(|(index, token)| {
            if token.trim().is_empty() {
                Err(LiteralError::EmptyElement { index })
            } else {
                parse_number(token)
            }
        })
        .collect()
}

/// Parse a two-dimensional literal into padded rows.
///
/// A flat list becomes a single row. A grid whose rows are all empty
/// (`"[[]]"`) yields no rows.
///
/// # Errors
///
/// Returns [`LiteralError`] for malformed brackets, text between row groups,
/// empty elements and non-numeric values.
pub fn parse_grid(input: &str) -> Result<Vec<Vec<String>>, LiteralError> {
    let s = input.trim();
    let depth = max_depth(s)?;
    if depth > 2 {
        return Err(LiteralError::NestedTooDeep);
    }
    let body = if depth == 2 { strip_brackets(s)?.trim() } else { s };
    if max_depth(body)? > 1 {
        return Err(LiteralError::NestedTooDeep);
    }

    let mut rows = if body.contains('[') {
        parse_row_groups(body)?
    } else {
        vec![parse_array(body)?]
    };

    if rows.iter().all(Vec::is_empty) {
        return Ok(Vec::new());
    }
    pad_rows(&mut rows);
    Ok(rows)
}

/// Split `[a, b], [c]` into rows.
fn parse_row_groups(body: &str) -> Result<Vec<Vec<String>>, LiteralError> {
    let mut rows = Vec::new();
    let mut rest = body.trim_start();
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            let token = rest.split('[').next().unwrap_or(rest).trim();
            return Err(LiteralError::StrayContent { token: token.to_owned() });
        }
        let close = rest.find(']').ok_or(LiteralError::UnbalancedBrackets)?;
        rows.push(parse_array(&rest[..=close])?);

        rest = rest[close + 1..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                return Err(LiteralError::EmptyElement { index: rows.len() });
            }
        } else if !rest.is_empty() {
            let token = rest.split('[').next().unwrap_or(rest).trim();
            return Err(LiteralError::StrayContent { token: token.to_owned() });
        }
    }
    Ok(rows)
}

/// Deepest bracket nesting in `s`, validating balance along the way.
fn max_depth(s: &str) -> Result<usize, LiteralError> {
    let mut depth = 0usize;
    let mut max = 0usize;
    for c in s.chars() {
        match c {
            '[' => {
                depth += 1;
                max = max.max(depth);
            }
            ']' => depth = depth.checked_sub(1).ok_or(LiteralError::UnbalancedBrackets)?,
            _ => {}
        }
    }
    if depth == 0 { Ok(max) } else { Err(LiteralError::UnbalancedBrackets) }
}

/// Remove one enclosing `[` `]` pair, if present.
fn strip_brackets(s: &str) -> Result<&str, LiteralError> {
    match (s.strip_prefix('['), s.ends_with(']')) {
        (Some(inner), true) => inner.strip_suffix(']').ok_or(LiteralError::UnbalancedBrackets),
        (None, false) => Ok(s),
        _ => Err(LiteralError::UnbalancedBrackets),
    }
}
