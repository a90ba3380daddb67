use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Goal-mouth zone tagged on a save or a conceded goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Left,
    Center,
    Right,
}

impl Zone {
    /// "SX" wins over "DX"; anything else is the center.
    pub fn from_tag(tag: &str) -> Self {
        let upper = tag.to_uppercase();
        if upper.contains("SX") {
            Zone::Left
        } else if upper.contains("DX") {
            Zone::Right
        } else {
            Zone::Center
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: String,
    pub minutes: f64,
    pub goals: u32,
    /// Goals conceded while on the field.
    pub gs: u32,
    /// Goals scored by the team while on the field.
    pub plus: u32,
    /// Goals conceded by the team while on the field.
    pub minus: u32,
    pub shots_on: u32,
    pub shots_off: u32,
    pub shots_blocked: u32,
    /// Turnovers lost.
    pub pp: u32,
    /// Turnovers won (recoveries).
    pub pr: u32,
    /// Fouls committed.
    pub ff: u32,
    /// Fouls suffered.
    pub fs: u32,
}

impl PlayerStats {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn plus_minus(&self) -> i64 {
        i64::from(self.plus) - i64::from(self.minus)
    }

    pub fn total_shots(&self) -> u32 {
        self.shots_on + self.shots_off
    }

    pub fn turnover_balance(&self) -> i64 {
        i64::from(self.pr) - i64::from(self.pp)
    }
}

/// Zone counters serialize as `savesSX`, `goalsDX`, ... next to the totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalkeeperStats {
    pub id: String,
    pub minutes: f64,
    pub saves: u32,
    #[serde(rename = "savesSX")]
    pub saves_sx: u32,
    #[serde(rename = "savesCT")]
    pub saves_ct: u32,
    #[serde(rename = "savesDX")]
    pub saves_dx: u32,
    pub gs: u32,
    #[serde(rename = "goalsSX")]
    pub goals_sx: u32,
    #[serde(rename = "goalsCT")]
    pub goals_ct: u32,
    #[serde(rename = "goalsDX")]
    pub goals_dx: u32,
}

impl GoalkeeperStats {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn record_save(&mut self, zone: Zone) {
        self.saves += 1;
        match zone {
            Zone::Left => self.saves_sx += 1,
            Zone::Center => self.saves_ct += 1,
            Zone::Right => self.saves_dx += 1,
        }
    }

    pub fn record_goal_against(&mut self, zone: Zone) {
        self.gs += 1;
        match zone {
            Zone::Left => self.goals_sx += 1,
            Zone::Center => self.goals_ct += 1,
            Zone::Right => self.goals_dx += 1,
        }
    }

    pub fn saves_in(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Left => self.saves_sx,
            Zone::Center => self.saves_ct,
            Zone::Right => self.saves_dx,
        }
    }

    pub fn goals_in(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Left => self.goals_sx,
            Zone::Center => self.goals_ct,
            Zone::Right => self.goals_dx,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuartetStats {
    pub key: String,
    /// Sorted member ids of the row that last touched this quartet.
    pub members: Vec<String>,
    pub minutes: f64,
    /// Number of separate stretches this lineup was on the field.
    pub freq: u32,
    pub gf: u32,
    pub gs: u32,
    pub shots_on: u32,
    pub shots_off: u32,
    pub shots_against: u32,
    pub pp: u32,
    pub pr: u32,
}

impl QuartetStats {
    pub fn new(key: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            key: key.into(),
            members,
            ..Default::default()
        }
    }

    pub fn goal_balance(&self) -> i64 {
        i64::from(self.gf) - i64::from(self.gs)
    }

    pub fn total_shots(&self) -> u32 {
        self.shots_on + self.shots_off
    }
}

pub const QUARTET_KEY_SEPARATOR: &str = "-";

/// Canonical identity of a lineup: ids sorted lexicographically.
pub fn quartet_key(members: &[String]) -> String {
    let mut sorted = members.to_vec();
    sorted.sort();
    sorted.join(QUARTET_KEY_SEPARATOR)
}

/// Everything one data load produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAggregate {
    pub players: HashMap<String, PlayerStats>,
    pub goalkeepers: HashMap<String, GoalkeeperStats>,
    pub quartets: HashMap<String, QuartetStats>,
    pub total_minutes: f64,
    pub total_goals_for: u32,
    pub total_goals_against: u32,
    pub processed_files: Vec<String>,
}

impl MatchAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_mut(&mut self, id: &str) -> &mut PlayerStats {
        self.players
            .entry(id.to_string())
            .or_insert_with(|| PlayerStats::new(id))
    }

    pub fn goalkeeper_mut(&mut self, id: &str) -> &mut GoalkeeperStats {
        self.goalkeepers
            .entry(id.to_string())
            .or_insert_with(|| GoalkeeperStats::new(id))
    }

    /// Quartet record for `key`, with `members` re-affirmed on every call.
    pub fn quartet_mut(&mut self, key: &str, members: &[String]) -> &mut QuartetStats {
        let quartet = self
            .quartets
            .entry(key.to_string())
            .or_insert_with(|| QuartetStats::new(key, Vec::new()));
        quartet.members = members.to_vec();
        quartet
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.goalkeepers.is_empty() && self.quartets.is_empty()
    }
}
