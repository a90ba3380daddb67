use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis_rankings::{
    SeasonSummary, TeamRecord, active_goalkeepers, active_players, format_minutes,
    player_efficiency, quartet_efficiency, quartet_label, quartets_by_minutes, season_summary,
};
use crate::database::Roster;
use crate::state::MatchAggregate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub players: usize,
    pub goalkeepers: usize,
    pub quartets: usize,
    pub files: usize,
}

pub fn export_aggregate(
    path: &Path,
    aggregate: &MatchAggregate,
    roster: &Roster,
    record: Option<&TeamRecord>,
) -> Result<ExportReport> {
    let summary = summary_rows(aggregate, &season_summary(aggregate, record));
    let players = players_rows(aggregate, roster);
    let goalkeepers = goalkeepers_rows(aggregate, roster);
    let quartets = quartets_rows(aggregate, roster);
    let files = files_rows(aggregate);

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Summary", &summary),
        ("Players", &players),
        ("Goalkeepers", &goalkeepers),
        ("Quartets", &quartets),
        ("Files", &files),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: players.len().saturating_sub(1),
        goalkeepers: goalkeepers.len().saturating_sub(1),
        quartets: quartets.len().saturating_sub(1),
        files: files.len().saturating_sub(1),
    })
}

pub fn summary_rows(aggregate: &MatchAggregate, season: &SeasonSummary) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["Metric".to_string(), "Value".to_string()],
        vec![
            "Generated At".to_string(),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ],
        vec![
            "Total Time".to_string(),
            format_minutes(aggregate.total_minutes),
        ],
        vec!["Matches".to_string(), season.matches.to_string()],
        vec!["Goals For".to_string(), season.goals_for.to_string()],
        vec!["Goals Against".to_string(), season.goals_against.to_string()],
    ];
    if let Some(record) = &season.record {
        rows.push(vec!["Team".to_string(), record.team.clone()]);
        rows.push(vec![
            "W-D-L".to_string(),
            format!("{}-{}-{}", record.wins, record.draws, record.losses),
        ]);
    }
    rows
}

pub fn players_rows(aggregate: &MatchAggregate, roster: &Roster) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "ID".to_string(),
        "Player".to_string(),
        "Minutes".to_string(),
        "Goals".to_string(),
        "Conceded".to_string(),
        "Shots".to_string(),
        "Shots On".to_string(),
        "Blocked".to_string(),
        "Recoveries".to_string(),
        "Turnovers".to_string(),
        "Fouls".to_string(),
        "Fouled".to_string(),
        "+/-".to_string(),
        "Efficiency".to_string(),
    ]];

    for p in active_players(aggregate, roster) {
        rows.push(vec![
            p.id.clone(),
            roster.display_name(&p.id).unwrap_or_default().to_string(),
            format_minutes(p.minutes),
            p.goals.to_string(),
            p.gs.to_string(),
            p.total_shots().to_string(),
            p.shots_on.to_string(),
            p.shots_blocked.to_string(),
            p.pr.to_string(),
            p.pp.to_string(),
            p.ff.to_string(),
            p.fs.to_string(),
            signed(p.plus_minus()),
            format!("{:.1}", player_efficiency(p)),
        ]);
    }
    rows
}

pub fn goalkeepers_rows(aggregate: &MatchAggregate, roster: &Roster) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "ID".to_string(),
        "Goalkeeper".to_string(),
        "Minutes".to_string(),
        "Conceded".to_string(),
        "Conceded SX".to_string(),
        "Conceded CT".to_string(),
        "Conceded DX".to_string(),
        "Saves".to_string(),
        "Saves SX".to_string(),
        "Saves CT".to_string(),
        "Saves DX".to_string(),
    ]];

    for g in active_goalkeepers(aggregate, roster) {
        rows.push(vec![
            g.id.clone(),
            roster.display_name(&g.id).unwrap_or_default().to_string(),
            format_minutes(g.minutes),
            g.gs.to_string(),
            g.goals_sx.to_string(),
            g.goals_ct.to_string(),
            g.goals_dx.to_string(),
            g.saves.to_string(),
            g.saves_sx.to_string(),
            g.saves_ct.to_string(),
            g.saves_dx.to_string(),
        ]);
    }
    rows
}

pub fn quartets_rows(aggregate: &MatchAggregate, roster: &Roster) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Quartet".to_string(),
        "Members".to_string(),
        "GF".to_string(),
        "GS".to_string(),
        "Shots".to_string(),
        "Shots Against".to_string(),
        "Recoveries".to_string(),
        "Turnovers".to_string(),
        "Stints".to_string(),
        "+/-".to_string(),
        "Minutes".to_string(),
        "Efficiency".to_string(),
    ]];

    for q in quartets_by_minutes(aggregate) {
        rows.push(vec![
            q.key.clone(),
            quartet_label(q, roster),
            q.gf.to_string(),
            q.gs.to_string(),
            q.total_shots().to_string(),
            q.shots_against.to_string(),
            q.pr.to_string(),
            q.pp.to_string(),
            q.freq.to_string(),
            signed(q.goal_balance()),
            format_minutes(q.minutes),
            format!("{:.1}", quartet_efficiency(q)),
        ]);
    }
    rows
}

pub fn files_rows(aggregate: &MatchAggregate) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["#".to_string(), "Match".to_string()]];
    rows.extend(
        aggregate
            .processed_files
            .iter()
            .enumerate()
            .map(|(idx, name)| vec![(idx + 1).to_string(), name.clone()]),
    );
    rows
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
