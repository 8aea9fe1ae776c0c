//! Clause storage shared by the search and geofence builders.
//!
//! A clause set is a record, not a list. Singular clauses live in `Option`
//! slots and are overwritten by later calls; the only repeatable clauses are
//! the `WHERE` and `WHEREIN` filters, which keep the order they were added in.

use std::collections::BTreeSet;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::command::ArgWriter;
use crate::encoder::{counted, format_number};
use crate::error::Result;

/// `WHERE field min max`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeFilter {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

/// `WHEREIN field <n> v1 … vn`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembershipFilter {
    pub field: String,
    pub values: Vec<f64>,
}

/// The filter block common to searches and fences: range filters, then
/// membership filters, then the id pattern.
///
/// Serialized flattened into its query as `where`, `wherein` and `match`.
/// Queries deserialize these keys themselves so unknown keys can be rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filters {
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub(crate) ranges: Vec<RangeFilter>,
    #[serde(rename = "wherein", skip_serializing_if = "Vec::is_empty")]
    pub(crate) memberships: Vec<MembershipFilter>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<String>,
}

impl Filters {
    pub(crate) fn add_range(&mut self, field: String, min: f64, max: f64) {
        self.ranges.push(RangeFilter { field, min, max });
    }

    pub(crate) fn add_membership(&mut self, field: String, values: Vec<f64>) {
        self.memberships.push(MembershipFilter { field, values });
    }

    pub(crate) fn set_pattern(&mut self, pattern: String) {
        replace_slot(&mut self.pattern, pattern, "MATCH");
    }

    pub fn ranges(&self) -> &[RangeFilter] {
        &self.ranges
    }

    pub fn memberships(&self) -> &[MembershipFilter] {
        &self.memberships
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Emit `WHERE …`, `WHEREIN …`, `MATCH …` in that order.
    pub(crate) fn write(&self, args: &mut ArgWriter) -> Result<()> {
        for range in &self.ranges {
            args.push("WHERE")
                .push(range.field.as_str())
                .push(format_number(range.min, "WHERE")?)
                .push(format_number(range.max, "WHERE")?);
        }
        for membership in &self.memberships {
            args.push("WHEREIN")
                .push(membership.field.as_str())
                .extend(counted(&membership.values, "WHEREIN")?);
        }
        if let Some(pattern) = &self.pattern {
            args.push("MATCH").push(pattern.as_str());
        }
        Ok(())
    }
}

/// Store `value` in a singular slot. A previous value is dropped (last write
/// wins); the overwrite is logged at debug level but never rejected.
pub(crate) fn replace_slot<T: Debug>(slot: &mut Option<T>, value: T, clause: &'static str) {
    if let Some(previous) = slot.replace(value) {
        tracing::debug!(clause, ?previous, "singular clause overwritten");
    }
}

/// Replace an enum-set slot wholesale. Replacing a non-empty set is logged
/// like any other singular overwrite.
pub(crate) fn replace_set<T: Ord + Debug>(
    slot: &mut BTreeSet<T>,
    value: BTreeSet<T>,
    clause: &'static str,
) {
    let previous = std::mem::replace(slot, value);
    if !previous.is_empty() {
        tracing::debug!(clause, ?previous, "singular clause overwritten");
    }
}

/// Raise a flag clause. Raising it a second time is logged as an overwrite.
pub(crate) fn set_flag(flag: &mut bool, clause: &'static str) {
    if std::mem::replace(flag, true) {
        tracing::debug!(clause, previous = true, "singular clause overwritten");
    }
}
