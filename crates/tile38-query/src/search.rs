//! Spatial search queries: `NEARBY`, `INTERSECTS` and `WITHIN`.
//!
//! Clauses can be set in any order; [`SearchQuery::compile`] always emits
//!
//! ```text
//! <KIND> key [WHERE …]* [WHEREIN …]* [MATCH p] [CURSOR n] [LIMIT n]
//!     [NOFIELDS] [format] [area | POINT lat lon radius]
//! ```

use serde::{Deserialize, Serialize};

use crate::clause::{replace_slot, set_flag, Filters, MembershipFilter, RangeFilter};
use crate::command::{ArgWriter, Command};
use crate::encoder::{bounds, format_number, point};
use crate::error::Result;
use crate::types::OutputFormat;

/// Entry point for search queries. Each constructor starts a fresh clause set.
pub struct Search;

impl Search {
    /// Objects within `radius` meters of a point, nearest first.
    pub fn nearby(key: impl Into<String>, lat: f64, lon: f64, radius: f64) -> SearchQuery {
        SearchQuery::new(SearchPredicate::Nearby {
            key: key.into(),
            lat,
            lon,
            radius,
        })
    }

    /// Objects intersecting the area set with one of the area clauses.
    pub fn intersects(key: impl Into<String>) -> SearchQuery {
        SearchQuery::new(SearchPredicate::Intersects { key: key.into() })
    }

    /// Objects fully contained in the area set with one of the area clauses.
    pub fn within(key: impl Into<String>) -> SearchQuery {
        SearchQuery::new(SearchPredicate::Within { key: key.into() })
    }
}

/// The base spatial predicate of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum SearchPredicate {
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
}

impl SearchPredicate {
    pub fn name(&self) -> &'static str {
        match self {
            SearchPredicate::Nearby { .. } => "NEARBY",
            SearchPredicate::Intersects { .. } => "INTERSECTS",
            SearchPredicate::Within { .. } => "WITHIN",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SearchPredicate::Nearby { key, .. }
            | SearchPredicate::Intersects { key }
            | SearchPredicate::Within { key } => key,
        }
    }
}

/// The area an `INTERSECTS`/`WITHIN` search is evaluated against. Always the
/// last token group of the command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum Area {
    Tile {
        x: u64,
        y: u64,
        z: u32,
    },
    Bounds {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },
    Circle {
        lat: f64,
        lon: f64,
        meters: f64,
    },
    /// The shape of another stored object.
    Get {
        key: String,
        id: String,
    },
    Hash(String),
    Quadkey(String),
    /// A GeoJSON geometry.
    Object(serde_json::Value),
}

impl Area {
    fn write(&self, args: &mut ArgWriter) -> Result<()> {
        match self {
            Area::Tile { x, y, z } => {
                args.push("TILE")
                    .push(x.to_string())
                    .push(y.to_string())
                    .push(z.to_string());
            }
            Area::Bounds {
                min_lat,
                min_lon,
                max_lat,
                max_lon,
            } => {
                args.extend(bounds(*min_lat, *min_lon, *max_lat, *max_lon)?);
            }
            Area::Circle { lat, lon, meters } => {
                args.push("CIRCLE")
                    .push(format_number(*lat, "CIRCLE")?)
                    .push(format_number(*lon, "CIRCLE")?)
                    .push(format_number(*meters, "CIRCLE")?);
            }
            Area::Get { key, id } => {
                args.push("GET").push(key.as_str()).push(id.as_str());
            }
            Area::Hash(hash) => {
                args.push("HASH").push(hash.as_str());
            }
            Area::Quadkey(quadkey) => {
                args.push("QUADKEY").push(quadkey.as_str());
            }
            Area::Object(geojson) => {
                args.push("OBJECT").push(serde_json::to_string(geojson)?);
            }
        }
        Ok(())
    }
}

/// Clause set and compiler for a search. Built by [`Search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SearchQueryFields")]
pub struct SearchQuery {
    predicate: SearchPredicate,
    #[serde(flatten)]
    filters: Filters,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    no_fields: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    area: Option<Area>,
}

/// Flat JSON form of [`SearchQuery`]. A misspelled clause key is an error
/// rather than a silently missing clause.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchQueryFields {
    predicate: SearchPredicate,
    #[serde(default, rename = "where")]
    ranges: Vec<RangeFilter>,
    #[serde(default, rename = "wherein")]
    memberships: Vec<MembershipFilter>,
    #[serde(default, rename = "match")]
    pattern: Option<String>,
    #[serde(default)]
    cursor: Option<u64>,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default)]
    no_fields: bool,
    #[serde(default)]
    format: Option<OutputFormat>,
    #[serde(default)]
    area: Option<Area>,
}

impl From<SearchQueryFields> for SearchQuery {
    fn from(fields: SearchQueryFields) -> Self {
        Self {
            predicate: fields.predicate,
            filters: Filters {
                ranges: fields.ranges,
                memberships: fields.memberships,
                pattern: fields.pattern,
            },
            cursor: fields.cursor,
            limit: fields.limit,
            no_fields: fields.no_fields,
            format: fields.format,
            area: fields.area,
        }
    }
}

impl SearchQuery {
    pub fn new(predicate: SearchPredicate) -> Self {
        Self {
            predicate,
            filters: Filters::default(),
            cursor: None,
            limit: None,
            no_fields: false,
            format: None,
            area: None,
        }
    }

    /// Keep objects whose `field` lies in `[min, max]`. Repeatable.
    pub fn where_range(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.filters.add_range(field.into(), min, max);
        self
    }

    /// Keep objects whose `field` equals one of `values`. Repeatable.
    pub fn where_in<I>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.filters
            .add_membership(field.into(), values.into_iter().collect());
        self
    }

    /// Keep objects whose id matches a glob pattern.
    pub fn match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.filters.set_pattern(pattern.into());
        self
    }

    pub fn cursor(mut self, start: u64) -> Self {
        replace_slot(&mut self.cursor, start, "CURSOR");
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        replace_slot(&mut self.limit, count, "LIMIT");
        self
    }

    /// Omit field values from the results.
    pub fn no_fields(mut self) -> Self {
        set_flag(&mut self.no_fields, "NOFIELDS");
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        replace_slot(&mut self.format, format, "format");
        self
    }

    /// Search a slippy-map tile. Replaces any other area clause.
    pub fn tile(self, x: u64, y: u64, z: u32) -> Self {
        self.area(Area::Tile { x, y, z })
    }

    pub fn bounds(self, min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        self.area(Area::Bounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    pub fn circle(self, lat: f64, lon: f64, meters: f64) -> Self {
        self.area(Area::Circle { lat, lon, meters })
    }

    pub fn get(self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.area(Area::Get {
            key: key.into(),
            id: id.into(),
        })
    }

    pub fn hash(self, geohash: impl Into<String>) -> Self {
        self.area(Area::Hash(geohash.into()))
    }

    pub fn quadkey(self, quadkey: impl Into<String>) -> Self {
        self.area(Area::Quadkey(quadkey.into()))
    }

    pub fn object(self, geojson: serde_json::Value) -> Self {
        self.area(Area::Object(geojson))
    }

    /// Set the area slot directly.
    pub fn area(mut self, area: Area) -> Self {
        replace_slot(&mut self.area, area, "area");
        self
    }

    pub fn predicate(&self) -> &SearchPredicate {
        &self.predicate
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Compile the clause set into a command in protocol order.
    pub fn compile(&self) -> Result<Command> {
        let mut args = ArgWriter::new();
        args.push(self.predicate.key());
        self.filters.write(&mut args)?;
        if let Some(cursor) = self.cursor {
            args.push("CURSOR").push(cursor.to_string());
        }
        if let Some(limit) = self.limit {
            args.push("LIMIT").push(limit.to_string());
        }
        if self.no_fields {
            args.push("NOFIELDS");
        }
        if let Some(format) = &self.format {
            format.write(&mut args);
        }
        // At most one trailing spatial group, and it is always last.
        match (&self.area, &self.predicate) {
            (Some(area), _) => area.write(&mut args)?,
            (
                None,
                SearchPredicate::Nearby {
                    lat, lon, radius, ..
                },
            ) => {
                args.extend(point(*lat, *lon, Some(*radius))?);
            }
            (None, _) => {}
        }
        Ok(args.finish(self.predicate.name()))
    }
}
