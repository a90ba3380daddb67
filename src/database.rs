use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cell::TimelineRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: Vec<TimelineRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sheets: Vec<SheetData>,
}

/// The whole preloaded data set: match timelines plus the roster maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDatabase {
    #[serde(default)]
    pub matches: Vec<MatchData>,
    #[serde(default, alias = "playersList")]
    pub players_list: HashMap<String, String>,
    #[serde(default, alias = "playersRoles")]
    pub players_roles: HashMap<String, String>,
    /// League table rows: team, points, played, W, D, L, GF, GS.
    #[serde(default, deserialize_with = "rows_or_null")]
    pub classifica: Vec<TimelineRow>,
}

fn rows_or_null<'de, D>(deserializer: D) -> Result<Vec<TimelineRow>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TimelineRow>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MatchDatabase {
    pub fn roster(&self) -> Roster {
        Roster {
            names: self.players_list.clone(),
            roles: self.players_roles.clone(),
        }
    }
}

/// Display names and roles keyed by player id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub names: HashMap<String, String>,
    pub roles: HashMap<String, String>,
}

impl Roster {
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.names
            .get(id.trim())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// First word of the display name, or the id itself.
    pub fn short_name(&self, id: &str) -> String {
        self.display_name(id)
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or(id)
            .to_string()
    }

    pub fn role(&self, id: &str) -> Option<&str> {
        self.roles
            .get(id.trim())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }
}

pub fn load_database(path: &Path) -> Result<MatchDatabase> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read match database {}", path.display()))?;
    parse_database_json(&raw).with_context(|| format!("parse match database {}", path.display()))
}

/// Parses the database JSON. A `const NAME = {...};` script wrapper is
/// accepted, as produced by the dashboard's sync step.
pub fn parse_database_json(raw: &str) -> Result<MatchDatabase> {
    let trimmed = strip_script_assignment(raw.trim());
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchDatabase::default());
    }
    serde_json::from_str(trimmed).context("invalid match database json")
}

fn strip_script_assignment(raw: &str) -> &str {
    if raw.starts_with('{') || raw.starts_with('[') {
        return raw;
    }
    let Some(eq) = raw.find('=') else {
        return raw;
    };
    raw[eq + 1..].trim().trim_end_matches(';').trim_end()
}
