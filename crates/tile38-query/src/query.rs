//! A serializable envelope over every builder family, so a query can be
//! described as JSON and compiled without going through the fluent API.
//!
//! ```
//! use tile38_query::Query;
//! let query = Query::from_json(
//!     r#"{"search":{"predicate":{"kind":"intersects","key":"fleet"},"match":"abc*","area":{"tile":{"x":10,"y":20,"z":30}}}}"#,
//! ).unwrap();
//! assert_eq!(query.compile().unwrap().to_string(), "INTERSECTS fleet MATCH abc* TILE 10 20 30");
//! ```

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::Result;
use crate::geofence::GeofenceQuery;
use crate::keys::{KeyCommand, SetQuery};
use crate::search::SearchQuery;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Query {
    Search(SearchQuery),
    Geofence(GeofenceQuery),
    Set(SetQuery),
    Key(KeyCommand),
}

impl Query {
    /// Parse a JSON query description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn compile(&self) -> Result<Command> {
        match self {
            Query::Search(query) => query.compile(),
            Query::Geofence(query) => query.compile(),
            Query::Set(query) => query.compile(),
            Query::Key(command) => command.compile(),
        }
    }
}

impl From<SearchQuery> for Query {
    fn from(query: SearchQuery) -> Self {
        Query::Search(query)
    }
}

impl From<GeofenceQuery> for Query {
    fn from(query: GeofenceQuery) -> Self {
        Query::Geofence(query)
    }
}

impl From<SetQuery> for Query {
    fn from(query: SetQuery) -> Self {
        Query::Set(query)
    }
}

impl From<KeyCommand> for Query {
    fn from(command: KeyCommand) -> Self {
        Query::Key(command)
    }
}
