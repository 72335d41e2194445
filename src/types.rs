//! Typed view of the upstream league-group document.
//!
//! Only the fields the aggregation logic reads are modeled; everything else
//! (war documents, clan profiles, war logs) stays as raw `serde_json::Value`
//! and is passed through to the caller unmodified. Upstream data is not
//! always well formed, so every field degrades to an empty default instead
//! of failing the whole document.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Town-hall-level key -> clan name -> member count
pub type CensusTable = HashMap<String, HashMap<String, u32>>;

#[derive(Deserialize, Debug, Default)]
pub struct LeagueGroup {
    #[serde(default)]
    pub clans: Vec<LeagueClan>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl LeagueGroup {
    /// Parses the typed view out of a raw league-group document.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

#[derive(Deserialize, Debug)]
pub struct LeagueClan {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "members_or_empty")]
    pub members: Vec<LeagueMember>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub town_hall_level: Option<i64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(default)]
    pub war_tag: String,
}

/// A `members` field that is absent or not a list is treated as empty.
fn members_or_empty<'de, D>(deserializer: D) -> Result<Vec<LeagueMember>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// One league member absent from their clan's live roster.
#[derive(Serialize, Debug, PartialEq)]
pub struct MissingEntry {
    pub name: String,
    pub tag: String,
    /// Clan name at the time of the league-group snapshot
    pub clan: String,
    pub th: LevelDisplay,
}

/// Town-hall level as shown to callers: the number when known, `"?"` when not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDisplay {
    Known(i64),
    Unknown,
}

impl Serialize for LevelDisplay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LevelDisplay::Known(level) => serializer.serialize_i64(*level),
            LevelDisplay::Unknown => serializer.serialize_str("?"),
        }
    }
}
