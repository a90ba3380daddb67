use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use futsal_stats::analysis_export::export_aggregate;
use futsal_stats::analysis_rankings::{
    DEFAULT_TEAM_TAG, efficiency_ranking_players, efficiency_ranking_quartets, format_minutes,
    season_summary, team_record,
};
use futsal_stats::config::AggregatorConfig;
use futsal_stats::database::load_database;
use futsal_stats::timeline::aggregate_matches;

const TOP_ROWS: usize = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let db_path = path_arg("--db")
        .or_else(|| env_path("FUTSAL_DB"))
        .context("no match database given (use --db <path> or FUTSAL_DB)")?;
    let export_path = path_arg("--export").or_else(|| env_path("FUTSAL_EXPORT"));

    let cfg = AggregatorConfig::from_env();
    let db = load_database(&db_path)?;
    info!(
        "loaded {} matches from {}",
        db.matches.len(),
        db_path.display()
    );

    let report = aggregate_matches(&db.matches, &cfg);
    let roster = db.roster();
    let agg = &report.aggregate;
    let team_tag = std::env::var("FUTSAL_TEAM").unwrap_or_else(|_| DEFAULT_TEAM_TAG.to_string());
    let record = team_record(&db.classifica, &team_tag);
    if record.is_none() && !db.classifica.is_empty() {
        warn!("no standings row matches team tag {team_tag:?}");
    }
    let season = season_summary(agg, record.as_ref());

    println!("Aggregation complete");
    println!("Matches: {}", season.matches);
    println!(
        "Sheets: {} processed, {} skipped",
        report.sheets_processed,
        report.skipped.len()
    );
    println!("Total time: {}", format_minutes(agg.total_minutes));
    println!(
        "Goals: {} for, {} against",
        season.goals_for, season.goals_against
    );
    if let Some(r) = &season.record {
        println!("{}: {}W {}D {}L", r.team, r.wins, r.draws, r.losses);
    }
    for skipped in report.skipped.iter().take(6) {
        println!(
            "   - {} / {}: {}",
            skipped.match_name, skipped.sheet_name, skipped.reason
        );
    }

    println!("Top players by efficiency:");
    for row in efficiency_ranking_players(agg, &roster).iter().take(TOP_ROWS) {
        println!(
            "  {:>4} {:<24} {:>7} {:>8.1}",
            row.id,
            row.label,
            format_minutes(row.minutes),
            row.efficiency
        );
    }
    println!("Top quartets by efficiency:");
    for row in efficiency_ranking_quartets(agg, &roster).iter().take(TOP_ROWS) {
        println!(
            "  {:<40} {:>7} {:>8.1}",
            row.label,
            format_minutes(row.minutes),
            row.efficiency
        );
    }

    if let Some(path) = export_path {
        let exported = export_aggregate(&path, agg, &roster, record.as_ref())?;
        println!(
            "Workbook: {} ({} players, {} goalkeepers, {} quartets)",
            path.display(),
            exported.players,
            exported.goalkeepers,
            exported.quartets
        );
    }

    Ok(())
}

fn path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
