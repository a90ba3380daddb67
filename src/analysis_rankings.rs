use std::cmp::Ordering;

use serde::Serialize;

use crate::cell::{Cell, TimelineRow, cell_at};
use crate::database::Roster;
use crate::state::{GoalkeeperStats, MatchAggregate, PlayerStats, QuartetStats};

/// Score given to entities without playing time; always ranks last.
pub const EFFICIENCY_FLOOR: f64 = -9999.0;

const GOALKEEPER_ROLE_TAGS: [&str; 4] = ["PORTIERE", "PORTIERI", "GOALKEEPER", "GK"];

/// Balance of goals while on the field plus turnover balance, per 100 minutes.
pub fn player_efficiency(p: &PlayerStats) -> f64 {
    let balance = f64::from(p.plus) - f64::from(p.gs) + f64::from(p.pr) - f64::from(p.pp);
    per_hundred_minutes(balance, p.minutes)
}

/// Like `player_efficiency`, with the shot balance added in.
pub fn quartet_efficiency(q: &QuartetStats) -> f64 {
    let balance = f64::from(q.gf) - f64::from(q.gs) + f64::from(q.pr) - f64::from(q.pp)
        + f64::from(q.shots_on)
        + f64::from(q.shots_off)
        - f64::from(q.shots_against);
    per_hundred_minutes(balance, q.minutes)
}

fn per_hundred_minutes(balance: f64, minutes: f64) -> f64 {
    if !has_minutes(minutes) {
        return EFFICIENCY_FLOOR;
    }
    balance / minutes * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalkeeperBasis {
    ByRole,
    ByMinutes,
}

pub fn role_is_goalkeeper(role: &str) -> bool {
    let upper = role.to_uppercase();
    GOALKEEPER_ROLE_TAGS.iter().any(|tag| {
        if tag.len() <= 2 {
            upper.split(|c: char| !c.is_alphanumeric()).any(|w| w == *tag)
        } else {
            upper.contains(tag)
        }
    })
}

pub fn classify_goalkeeper(
    id: &str,
    roster: &Roster,
    aggregate: &MatchAggregate,
) -> Option<GoalkeeperBasis> {
    if roster.role(id).is_some_and(role_is_goalkeeper) {
        return Some(GoalkeeperBasis::ByRole);
    }
    aggregate
        .goalkeepers
        .get(id)
        .filter(|gk| gk.minutes > 0.0)
        .map(|_| GoalkeeperBasis::ByMinutes)
}

/// Outfield players worth listing, best scorers first.
///
/// When the roster carries names, unnamed ids (opponents, typos) are dropped.
pub fn active_players<'a>(
    aggregate: &'a MatchAggregate,
    roster: &Roster,
) -> Vec<&'a PlayerStats> {
    let mut players: Vec<&PlayerStats> = aggregate
        .players
        .values()
        .filter(|p| classify_goalkeeper(&p.id, roster, aggregate).is_none())
        .filter(|p| !roster.has_names() || roster.display_name(&p.id).is_some())
        .collect();
    players.sort_by(|a, b| b.goals.cmp(&a.goals).then_with(|| cmp_ids(&a.id, &b.id)));
    players
}

pub fn active_goalkeepers<'a>(
    aggregate: &'a MatchAggregate,
    roster: &Roster,
) -> Vec<&'a GoalkeeperStats> {
    let mut gks: Vec<&GoalkeeperStats> = aggregate
        .goalkeepers
        .values()
        .filter(|g| !roster.has_names() || roster.display_name(&g.id).is_some())
        .collect();
    gks.sort_by(|a, b| {
        b.minutes
            .total_cmp(&a.minutes)
            .then_with(|| cmp_ids(&a.id, &b.id))
    });
    gks
}

pub fn quartets_by_minutes(aggregate: &MatchAggregate) -> Vec<&QuartetStats> {
    let mut quartets: Vec<&QuartetStats> = aggregate.quartets.values().collect();
    quartets.sort_by(|a, b| b.minutes.total_cmp(&a.minutes).then_with(|| a.key.cmp(&b.key)));
    quartets
}

pub fn top_quartets_by_balance(aggregate: &MatchAggregate, limit: usize) -> Vec<&QuartetStats> {
    let mut quartets: Vec<&QuartetStats> = aggregate.quartets.values().collect();
    quartets.sort_by(|a, b| {
        b.goal_balance()
            .cmp(&a.goal_balance())
            .then_with(|| b.minutes.total_cmp(&a.minutes))
            .then_with(|| a.key.cmp(&b.key))
    });
    quartets.truncate(limit);
    quartets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub id: String,
    pub label: String,
    pub minutes: f64,
    pub efficiency: f64,
}

pub fn efficiency_ranking_players(
    aggregate: &MatchAggregate,
    roster: &Roster,
) -> Vec<EfficiencyRow> {
    let rows = active_players(aggregate, roster)
        .into_iter()
        .map(|p| EfficiencyRow {
            id: p.id.clone(),
            label: roster.display_name(&p.id).unwrap_or(&p.id).to_string(),
            minutes: p.minutes,
            efficiency: player_efficiency(p),
        })
        .collect();
    sort_by_efficiency(rows)
}

pub fn efficiency_ranking_quartets(
    aggregate: &MatchAggregate,
    roster: &Roster,
) -> Vec<EfficiencyRow> {
    let rows = aggregate
        .quartets
        .values()
        .map(|q| EfficiencyRow {
            id: q.key.clone(),
            label: quartet_label(q, roster),
            minutes: q.minutes,
            efficiency: quartet_efficiency(q),
        })
        .collect();
    sort_by_efficiency(rows)
}

/// Best first. Rows without playing time go last whatever their score, since
/// a short stint can legitimately score below `EFFICIENCY_FLOOR`.
fn sort_by_efficiency(mut rows: Vec<EfficiencyRow>) -> Vec<EfficiencyRow> {
    rows.sort_by(|a, b| {
        has_minutes(b.minutes)
            .cmp(&has_minutes(a.minutes))
            .then_with(|| b.efficiency.total_cmp(&a.efficiency))
            .then_with(|| cmp_ids(&a.id, &b.id))
    });
    rows
}

fn has_minutes(minutes: f64) -> bool {
    minutes.is_finite() && minutes > 0.0
}

pub fn quartet_label(q: &QuartetStats, roster: &Roster) -> String {
    q.members
        .iter()
        .map(|id| roster.short_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numeric ids (shirt numbers) compare as numbers, the rest as text.
fn cmp_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Name fragment that picks the club's own line out of the league table.
pub const DEFAULT_TEAM_TAG: &str = "VALLI";

/// The club's line in the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// First standings row whose team name contains `team_tag`, case-insensitively.
pub fn team_record(standings: &[TimelineRow], team_tag: &str) -> Option<TeamRecord> {
    let tag = team_tag.trim().to_uppercase();
    if tag.is_empty() {
        return None;
    }
    let row = standings
        .iter()
        .find(|row| cell_at(row, 0).as_text().to_uppercase().contains(&tag))?;
    let count = |idx: usize| leading_count(cell_at(row, idx));
    Some(TeamRecord {
        team: cell_at(row, 0).as_text().trim().to_string(),
        played: count(2),
        wins: count(3),
        draws: count(4),
        losses: count(5),
        goals_for: count(6),
        goals_against: count(7),
    })
}

/// Non-negative integer prefix of a table cell; anything unreadable is 0.
fn leading_count(cell: &Cell) -> u32 {
    match cell {
        Cell::Scalar(v) if v.is_finite() && *v >= 0.0 => v.trunc() as u32,
        Cell::Scalar(_) | Cell::Empty => 0,
        other => {
            let text = other.as_text();
            let digits: String = text
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
    }
}

/// Headline season numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonSummary {
    pub matches: usize,
    pub goals_for: u32,
    pub goals_against: u32,
    pub record: Option<TeamRecord>,
}

/// Timeline totals, raised to the league table's figures where the table
/// covers matches that have no timeline file.
pub fn season_summary(aggregate: &MatchAggregate, record: Option<&TeamRecord>) -> SeasonSummary {
    let mut summary = SeasonSummary {
        matches: aggregate.processed_files.len(),
        goals_for: aggregate.total_goals_for,
        goals_against: aggregate.total_goals_against,
        record: record.cloned(),
    };
    if let Some(r) = record {
        summary.matches = summary.matches.max(r.played as usize);
        summary.goals_for = summary.goals_for.max(r.goals_for);
        summary.goals_against = summary.goals_against.max(r.goals_against);
    }
    summary
}

/// `M:SS` rendering of fractional minutes.
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0:00".to_string();
    }
    let total_secs = (minutes * 60.0).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
