//! Persistent geofence queries: a search predicate followed by the `FENCE`
//! block.
//!
//! Compiled order:
//!
//! ```text
//! <KIND> key [CLIP] [DISTANCE] [WHERE …]* [WHEREIN …]* [MATCH p] [CURSOR n]
//!     FENCE [DETECT actions] [COMMANDS commands]
//!     [format | ROAM target pattern meters] [POINT lat lon radius]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::clause::{replace_set, replace_slot, set_flag, Filters, MembershipFilter, RangeFilter};
use crate::command::{ArgWriter, Command};
use crate::encoder::{canonical_set, format_number, point};
use crate::error::Result;
use crate::types::{FenceAction, FenceCommand, OutputFormat};

/// Entry point for geofence queries. Each constructor starts a fresh clause set.
pub struct Geofence;

impl Geofence {
    pub fn nearby(key: impl Into<String>, lat: f64, lon: f64, radius: f64) -> GeofenceQuery {
        GeofenceQuery::new(FencePredicate::Nearby {
            key: key.into(),
            lat,
            lon,
            radius,
        })
    }

    pub fn intersects(key: impl Into<String>) -> GeofenceQuery {
        GeofenceQuery::new(FencePredicate::Intersects { key: key.into() })
    }

    pub fn within(key: impl Into<String>) -> GeofenceQuery {
        GeofenceQuery::new(FencePredicate::Within { key: key.into() })
    }

    /// Fence on objects in `key` coming within `meters` of objects in
    /// `target` whose ids match `pattern`.
    pub fn roam(
        key: impl Into<String>,
        target: impl Into<String>,
        pattern: impl Into<String>,
        meters: f64,
    ) -> GeofenceQuery {
        GeofenceQuery::new(FencePredicate::Roam {
            key: key.into(),
            target: target.into(),
            pattern: pattern.into(),
            meters,
        })
    }
}

/// The base predicate of a fence. `Roam` compiles as a `NEARBY` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum FencePredicate {
    Nearby {
        key: String,
        lat: f64,
        lon: f64,
        radius: f64,
    },
    Intersects {
        key: String,
    },
    Within {
        key: String,
    },
    Roam {
        key: String,
        target: String,
        pattern: String,
        meters: f64,
    },
}

impl FencePredicate {
    pub fn name(&self) -> &'static str {
        match self {
            FencePredicate::Nearby { .. } | FencePredicate::Roam { .. } => "NEARBY",
            FencePredicate::Intersects { .. } => "INTERSECTS",
            FencePredicate::Within { .. } => "WITHIN",
        }
    }

    /// The watched collection (the source collection for `Roam`).
    pub fn key(&self) -> &str {
        match self {
            FencePredicate::Nearby { key, .. }
            | FencePredicate::Intersects { key }
            | FencePredicate::Within { key }
            | FencePredicate::Roam { key, .. } => key,
        }
    }
}

/// Clause set and compiler for a geofence. Built by [`Geofence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeofenceQueryFields")]
pub struct GeofenceQuery {
    predicate: FencePredicate,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    clip: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    distance: bool,
    #[serde(flatten)]
    filters: Filters,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<u64>,
    #[serde(rename = "detect", skip_serializing_if = "BTreeSet::is_empty")]
    actions: BTreeSet<FenceAction>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    commands: BTreeSet<FenceCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
}

/// Flat JSON form of [`GeofenceQuery`], rejecting unknown clause keys.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GeofenceQueryFields {
    predicate: FencePredicate,
    #[serde(default)]
    clip: bool,
    #[serde(default)]
    distance: bool,
    #[serde(default, rename = "where")]
    ranges: Vec<RangeFilter>,
    #[serde(default, rename = "wherein")]
    memberships: Vec<MembershipFilter>,
    #[serde(default, rename = "match")]
    pattern: Option<String>,
    #[serde(default)]
    cursor: Option<u64>,
    #[serde(default, rename = "detect")]
    actions: BTreeSet<FenceAction>,
    #[serde(default)]
    commands: BTreeSet<FenceCommand>,
    #[serde(default)]
    format: Option<OutputFormat>,
}

impl From<GeofenceQueryFields> for GeofenceQuery {
    fn from(fields: GeofenceQueryFields) -> Self {
        Self {
            predicate: fields.predicate,
            clip: fields.clip,
            distance: fields.distance,
            filters: Filters {
                ranges: fields.ranges,
                memberships: fields.memberships,
                pattern: fields.pattern,
            },
            cursor: fields.cursor,
            actions: fields.actions,
            commands: fields.commands,
            format: fields.format,
        }
    }
}

impl GeofenceQuery {
    pub fn new(predicate: FencePredicate) -> Self {
        Self {
            predicate,
            clip: false,
            distance: false,
            filters: Filters::default(),
            cursor: None,
            actions: BTreeSet::new(),
            commands: BTreeSet::new(),
            format: None,
        }
    }

    /// Events to notify on. Replaces any previously set actions; an empty
    /// set omits `DETECT`.
    pub fn actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = FenceAction>,
    {
        replace_set(&mut self.actions, actions.into_iter().collect(), "DETECT");
        self
    }

    /// Write commands to notify on. Replaces any previously set commands; an
    /// empty set omits `COMMANDS`.
    pub fn commands<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = FenceCommand>,
    {
        replace_set(&mut self.commands, commands.into_iter().collect(), "COMMANDS");
        self
    }

    /// Clip returned shapes to the fence area.
    pub fn clip(mut self) -> Self {
        set_flag(&mut self.clip, "CLIP");
        self
    }

    /// Include the distance to the fence center in notifications.
    pub fn distance(mut self) -> Self {
        set_flag(&mut self.distance, "DISTANCE");
        self
    }

    pub fn where_range(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.filters.add_range(field.into(), min, max);
        self
    }

    pub fn where_in<I>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.filters
            .add_membership(field.into(), values.into_iter().collect());
        self
    }

    pub fn match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.filters.set_pattern(pattern.into());
        self
    }

    pub fn cursor(mut self, start: u64) -> Self {
        replace_slot(&mut self.cursor, start, "CURSOR");
        self
    }

    /// Output format of notifications. When set it takes the place of the
    /// `ROAM` clause; the two are not checked against each other.
    pub fn format(mut self, format: OutputFormat) -> Self {
        replace_slot(&mut self.format, format, "format");
        self
    }

    pub fn predicate(&self) -> &FencePredicate {
        &self.predicate
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Compile the clause set into a command in protocol order.
    pub fn compile(&self) -> Result<Command> {
        let mut args = ArgWriter::new();
        args.push(self.predicate.key());
        if self.clip {
            args.push("CLIP");
        }
        if self.distance {
            args.push("DISTANCE");
        }
        self.filters.write(&mut args)?;
        if let Some(cursor) = self.cursor {
            args.push("CURSOR").push(cursor.to_string());
        }
        args.push("FENCE");
        if let Some(actions) = canonical_set(&self.actions) {
            args.push("DETECT").push(actions);
        }
        if let Some(commands) = canonical_set(&self.commands) {
            args.push("COMMANDS").push(commands);
        }
        match (&self.format, &self.predicate) {
            (Some(format), _) => format.write(&mut args),
            (
                None,
                FencePredicate::Roam {
                    target,
                    pattern,
                    meters,
                    ..
                },
            ) => {
                args.push("ROAM")
                    .push(target.as_str())
                    .push(pattern.as_str())
                    .push(format_number(*meters, "ROAM")?);
            }
            (None, _) => {}
        }
        if let FencePredicate::Nearby {
            lat, lon, radius, ..
        } = &self.predicate
        {
            args.extend(point(*lat, *lon, Some(*radius))?);
        }
        Ok(args.finish(self.predicate.name()))
    }
}
