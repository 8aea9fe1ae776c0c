//! # tile38-query
//!
//! Command builders for the Tile38 geospatial/geofencing protocol.
//!
//! Tile38 commands are positional: every clause has one fixed slot on the
//! command line. This crate lets callers set clauses in whatever order is
//! convenient and compiles them into the exact token order the server expects.
//! Singular clauses (cursor, limit, format, ...) are last-write-wins;
//! `WHERE`/`WHEREIN` filters and write `FIELD`s are repeatable and keep call
//! order. No cross-clause validation is done; conflicting clauses compile
//! mechanically and are left for the server to reject.
//!
//! ## Quick start
//!
//! ```rust
//! use tile38_query::{OutputFormat, Search};
//!
//! let cmd = Search::nearby("fleet", 33.5, -112.2, 1000.0)
//!     .limit(5)
//!     .where_range("speed", 10.0, 20.0)
//!     .format(OutputFormat::Ids)
//!     .compile()
//!     .unwrap();
//! assert_eq!(cmd.to_string(), "NEARBY fleet WHERE speed 10 20 LIMIT 5 IDS POINT 33.5 -112.2 1000");
//! ```
//!
//! ## Modules
//!
//! - [`search`] — `NEARBY` / `INTERSECTS` / `WITHIN` searches
//! - [`geofence`] — persistent fences (`FENCE`, `DETECT`, `COMMANDS`, `ROAM`)
//! - [`keys`] — `SET` writes and single-shot key commands
//! - [`query`] — JSON-describable envelope over all families
//! - [`encoder`] — value → protocol token conversion
//! - [`command`] — the compiled `Command`
//! - [`error`] — error types

pub mod clause;
pub mod command;
pub mod encoder;
pub mod error;
pub mod geofence;
pub mod keys;
pub mod query;
pub mod search;
pub mod types;

pub use clause::{Filters, MembershipFilter, RangeFilter};
pub use command::Command;
pub use error::QueryError;
pub use geofence::{FencePredicate, Geofence, GeofenceQuery};
pub use keys::{Condition, Field, KeyCommand, Keys, Payload, SetQuery};
pub use query::Query;
pub use search::{Area, Search, SearchPredicate, SearchQuery};
pub use types::{FenceAction, FenceCommand, Literal, OutputFormat};
