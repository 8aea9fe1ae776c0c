//! Key commands: the `SET` write builder and the single-shot key commands
//! (`GET`, `DEL`, `DROP`, `EXPIRE`, `PERSIST`, `TTL`).

use serde::{Deserialize, Serialize};

use crate::clause::replace_slot;
use crate::command::{ArgWriter, Command};
use crate::encoder::{bounds, format_number, point};
use crate::error::Result;

/// Entry point for key commands.
pub struct Keys;

impl Keys {
    /// Start a write of object `id` in collection `key`.
    pub fn set(key: impl Into<String>, id: impl Into<String>) -> SetQuery {
        SetQuery::new(key, id)
    }

    pub fn get(key: impl Into<String>, id: impl Into<String>) -> KeyCommand {
        KeyCommand::Get {
            key: key.into(),
            id: id.into(),
        }
    }

    pub fn del(key: impl Into<String>, id: impl Into<String>) -> KeyCommand {
        KeyCommand::Del {
            key: key.into(),
            id: id.into(),
        }
    }

    /// Remove a whole collection.
    pub fn drop(key: impl Into<String>) -> KeyCommand {
        KeyCommand::Drop { key: key.into() }
    }

    pub fn expire(key: impl Into<String>, id: impl Into<String>, seconds: u64) -> KeyCommand {
        KeyCommand::Expire {
            key: key.into(),
            id: id.into(),
            seconds,
        }
    }

    pub fn persist(key: impl Into<String>, id: impl Into<String>) -> KeyCommand {
        KeyCommand::Persist {
            key: key.into(),
            id: id.into(),
        }
    }

    pub fn ttl(key: impl Into<String>, id: impl Into<String>) -> KeyCommand {
        KeyCommand::Ttl {
            key: key.into(),
            id: id.into(),
        }
    }
}

/// The object written by `SET`. Exactly one is sent; setting another form
/// replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", deny_unknown_fields)]
pub enum Payload {
    Point {
        lat: f64,
        lon: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f64>,
    },
    Bounds {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },
    Hash(String),
    /// A GeoJSON object.
    Object(serde_json::Value),
    String(String),
}

impl Payload {
    fn write(&self, args: &mut ArgWriter) -> Result<()> {
        match self {
            Payload::Point { lat, lon, z } => {
                args.extend(point(*lat, *lon, *z)?);
            }
            Payload::Bounds {
                min_lat,
                min_lon,
                max_lat,
                max_lon,
            } => {
                args.extend(bounds(*min_lat, *min_lon, *max_lat, *max_lon)?);
            }
            Payload::Hash(hash) => {
                args.push("HASH").push(hash.as_str());
            }
            Payload::Object(geojson) => {
                args.push("OBJECT").push(serde_json::to_string(geojson)?);
            }
            Payload::String(value) => {
                args.push("STRING").push(value.as_str());
            }
        }
        Ok(())
    }
}

/// Only write if the object does not exist (`NX`) or already exists (`XX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Nx,
    Xx,
}

/// `FIELD name value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    pub value: f64,
}

/// Clause set and compiler for `SET`.
///
/// ```text
/// SET key id [EX seconds] [FIELD name value]* [NX|XX] payload
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetQuery {
    key: String,
    id: String,
    #[serde(default, rename = "ex", skip_serializing_if = "Option::is_none")]
    expiration: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Payload>,
}

impl SetQuery {
    pub fn new(key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: id.into(),
            expiration: None,
            fields: Vec::new(),
            condition: None,
            payload: None,
        }
    }

    pub fn point(self, lat: f64, lon: f64) -> Self {
        self.payload(Payload::Point { lat, lon, z: None })
    }

    pub fn point_z(self, lat: f64, lon: f64, z: f64) -> Self {
        self.payload(Payload::Point {
            lat,
            lon,
            z: Some(z),
        })
    }

    pub fn bounds(self, min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        self.payload(Payload::Bounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    pub fn hash(self, geohash: impl Into<String>) -> Self {
        self.payload(Payload::Hash(geohash.into()))
    }

    pub fn object(self, geojson: serde_json::Value) -> Self {
        self.payload(Payload::Object(geojson))
    }

    pub fn string(self, value: impl Into<String>) -> Self {
        self.payload(Payload::String(value.into()))
    }

    /// Set the payload slot directly.
    pub fn payload(mut self, payload: Payload) -> Self {
        replace_slot(&mut self.payload, payload, "payload");
        self
    }

    /// Attach a numeric field. Repeatable; fields are sent in call order.
    pub fn field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value,
        });
        self
    }

    /// Expire the object after `seconds`. Longer spans (days, years) must be
    /// converted to seconds by the caller.
    pub fn expiration(mut self, seconds: u64) -> Self {
        replace_slot(&mut self.expiration, seconds, "EX");
        self
    }

    pub fn nx(mut self) -> Self {
        replace_slot(&mut self.condition, Condition::Nx, "NX");
        self
    }

    pub fn xx(mut self) -> Self {
        replace_slot(&mut self.condition, Condition::Xx, "XX");
        self
    }

    /// Compile the clause set into a command in protocol order.
    pub fn compile(&self) -> Result<Command> {
        let mut args = ArgWriter::new();
        args.push(self.key.as_str()).push(self.id.as_str());
        if let Some(seconds) = self.expiration {
            args.push("EX").push(seconds.to_string());
        }
        for field in &self.fields {
            args.push("FIELD")
                .push(field.name.as_str())
                .push(format_number(field.value, "FIELD")?);
        }
        match self.condition {
            Some(Condition::Nx) => {
                args.push("NX");
            }
            Some(Condition::Xx) => {
                args.push("XX");
            }
            None => {}
        }
        if let Some(payload) = &self.payload {
            payload.write(&mut args)?;
        }
        Ok(args.finish("SET"))
    }
}

/// Single-shot commands addressing a collection or one object in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase", deny_unknown_fields)]
pub enum KeyCommand {
    Get { key: String, id: String },
    Del { key: String, id: String },
    Drop { key: String },
    Expire { key: String, id: String, seconds: u64 },
    Persist { key: String, id: String },
    Ttl { key: String, id: String },
}

impl KeyCommand {
    pub fn name(&self) -> &'static str {
        match self {
            KeyCommand::Get { .. } => "GET",
            KeyCommand::Del { .. } => "DEL",
            KeyCommand::Drop { .. } => "DROP",
            KeyCommand::Expire { .. } => "EXPIRE",
            KeyCommand::Persist { .. } => "PERSIST",
            KeyCommand::Ttl { .. } => "TTL",
        }
    }

    pub fn compile(&self) -> Result<Command> {
        let mut args = ArgWriter::new();
        match self {
            KeyCommand::Drop { key } => {
                args.push(key.as_str());
            }
            KeyCommand::Expire { key, id, seconds } => {
                args.push(key.as_str())
                    .push(id.as_str())
                    .push(seconds.to_string());
            }
            KeyCommand::Get { key, id }
            | KeyCommand::Del { key, id }
            | KeyCommand::Persist { key, id }
            | KeyCommand::Ttl { key, id } => {
                args.push(key.as_str()).push(id.as_str());
            }
        }
        Ok(args.finish(self.name()))
    }
}
