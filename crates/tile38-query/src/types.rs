//! Enumerated clause values shared by the builder families.

use serde::{Deserialize, Serialize};

use crate::command::ArgWriter;

/// Maps an enum value to its fixed protocol literal.
pub trait Literal {
    fn literal(&self) -> &'static str;
}

/// What a search or fence reports for each matching object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Count,
    Ids,
    Objects,
    Points,
    Bounds,
    /// Geohashes of the given precision.
    Hashes(u32),
}

impl OutputFormat {
    pub(crate) fn write(&self, args: &mut ArgWriter) {
        match self {
            OutputFormat::Count => args.push("COUNT"),
            OutputFormat::Ids => args.push("IDS"),
            OutputFormat::Objects => args.push("OBJECTS"),
            OutputFormat::Points => args.push("POINTS"),
            OutputFormat::Bounds => args.push("BOUNDS"),
            OutputFormat::Hashes(precision) => args.push("HASHES").push(precision.to_string()),
        };
    }
}

/// Fence events to detect. Declaration order is the canonical wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceAction {
    Enter,
    Exit,
    Cross,
}

impl Literal for FenceAction {
    fn literal(&self) -> &'static str {
        match self {
            FenceAction::Enter => "enter",
            FenceAction::Exit => "exit",
            FenceAction::Cross => "cross",
        }
    }
}

/// Write commands a fence reacts to. Declaration order is the canonical wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceCommand {
    Set,
    Del,
    Expire,
    Drop,
}

impl Literal for FenceCommand {
    fn literal(&self) -> &'static str {
        match self {
            FenceCommand::Set => "set",
            FenceCommand::Del => "del",
            FenceCommand::Expire => "expire",
            FenceCommand::Drop => "drop",
        }
    }
}
