//! Token encoder — turns semantic clause values into protocol literals.
//!
//! Every function here is pure and locale-independent:
//!
//! - **Numbers**: shortest decimal form, no exponent, no trailing zeros,
//!   `-0` → `0`. NaN and infinities are rejected with [`QueryError::NonFinite`].
//! - **Counted lists**: `<n> v1 … vn`, the count token first.
//! - **Enum sets**: one comma-joined lowercase token in canonical element order.
//! - **Points**: `POINT lat lon [z]`.

use std::collections::BTreeSet;

use crate::error::{QueryError, Result};
use crate::types::Literal;

/// Format a float as a protocol number token.
///
/// `clause` names the clause the value belongs to and is only used in the
/// error when the value is not finite.
///
/// # Examples
/// ```
/// use tile38_query::encoder::format_number;
/// assert_eq!(format_number(10.0, "POINT").unwrap(), "10");
/// assert_eq!(format_number(-20.0, "POINT").unwrap(), "-20");
/// assert_eq!(format_number(33.5, "POINT").unwrap(), "33.5");
/// assert!(format_number(f64::NAN, "POINT").is_err());
/// ```
pub fn format_number(value: f64, clause: &'static str) -> Result<String> {
    if !value.is_finite() {
        return Err(QueryError::NonFinite { clause, value });
    }
    // Normalize -0 to 0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < (i64::MAX as f64) {
        return Ok((value as i64).to_string());
    }
    // f64's Display is the shortest round-tripping form and never uses an exponent.
    Ok(format!("{}", value))
}

/// Encode a value list with its cardinality marker: `<n> v1 … vn`.
pub fn counted(values: &[f64], clause: &'static str) -> Result<Vec<String>> {
    let mut tokens = Vec::with_capacity(values.len() + 1);
    tokens.push(values.len().to_string());
    for value in values {
        tokens.push(format_number(*value, clause)?);
    }
    Ok(tokens)
}

/// Join an enum set into a single comma-separated token.
///
/// The set is ordered by the enum's declaration order, so the token is the
/// same no matter how the caller listed the elements. Returns `None` for an
/// empty set, which callers treat as "clause absent".
pub fn canonical_set<T: Literal + Ord>(set: &BTreeSet<T>) -> Option<String> {
    if set.is_empty() {
        return None;
    }
    let literals: Vec<&str> = set.iter().map(Literal::literal).collect();
    Some(literals.join(","))
}

/// Encode `POINT lat lon` followed by an optional third number
/// (radius for searches, elevation for writes).
pub fn point(lat: f64, lon: f64, extra: Option<f64>) -> Result<Vec<String>> {
    let mut tokens = vec![
        "POINT".to_string(),
        format_number(lat, "POINT")?,
        format_number(lon, "POINT")?,
    ];
    if let Some(extra) = extra {
        tokens.push(format_number(extra, "POINT")?);
    }
    Ok(tokens)
}

/// Encode a bounding box as `BOUNDS min_lat min_lon max_lat max_lon`.
pub fn bounds(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Vec<String>> {
    let mut tokens = vec!["BOUNDS".to_string()];
    for value in [min_lat, min_lon, max_lat, max_lon] {
        tokens.push(format_number(value, "BOUNDS")?);
    }
    Ok(tokens)
}
