use std::path::PathBuf;

use futsal_stats::analysis_rankings::{
    EFFICIENCY_FLOOR, GoalkeeperBasis, active_goalkeepers, active_players, classify_goalkeeper,
    efficiency_ranking_players, efficiency_ranking_quartets, quartet_efficiency, quartet_label,
    top_quartets_by_balance,
};
use futsal_stats::cell::{Cell, TimelineRow};
use futsal_stats::config::AggregatorConfig;
use futsal_stats::database::{Roster, load_database};
use futsal_stats::state::{MatchAggregate, QuartetStats};
use futsal_stats::timeline::{aggregate_matches, process_sheet};

fn fixture_aggregate() -> (MatchAggregate, Roster) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("match_database.json");
    let db = load_database(&path).expect("fixture should load");
    let report = aggregate_matches(&db.matches, &AggregatorConfig::default());
    (report.aggregate, db.roster())
}

#[test]
fn players_ranked_by_efficiency() {
    let (agg, roster) = fixture_aggregate();
    let rows = efficiency_ranking_players(&agg, &roster);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["7", "9", "5", "3", "11", "10"]);
    assert!((rows[0].efficiency - 200.0 / 8.5).abs() < 1e-6);
    assert_eq!(rows[0].label, "Neri Marco");
}

#[test]
fn quartets_ranked_by_efficiency() {
    let (agg, roster) = fixture_aggregate();
    let rows = efficiency_ranking_quartets(&agg, &roster);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "3-5-7-9");
    assert_eq!(rows[0].label, "Rossi, Verdi, Neri, Gialli");
    assert!((rows[0].efficiency - 300.0 / 8.5).abs() < 1e-6);
    assert!((rows[1].efficiency + 100.0 / 3.5).abs() < 1e-6);
}

#[test]
fn idle_quartet_sorts_last() {
    let (mut agg, roster) = fixture_aggregate();
    let mut idle = QuartetStats::new("2-4-6-8", vec!["2".into(), "4".into(), "6".into(), "8".into()]);
    idle.gf = 5;
    assert_eq!(quartet_efficiency(&idle), EFFICIENCY_FLOOR);
    agg.quartets.insert(idle.key.clone(), idle);

    let rows = efficiency_ranking_quartets(&agg, &roster);
    assert_eq!(rows.last().map(|r| r.id.as_str()), Some("2-4-6-8"));
    // Goal balance ignores minutes, so the idle quartet tops that table.
    assert_eq!(top_quartets_by_balance(&agg, 1)[0].key, "2-4-6-8");
}

#[test]
fn idle_quartet_sorts_below_short_losing_stint() {
    let rows: Vec<TimelineRow> = vec![
        vec!["TIMING".into(), "Q1".into(), "Q2".into(), "Q3".into(), "Q4".into(), "GOAL SUBITI".into()],
        vec!["0:00:00".into(), "3".into(), "5".into(), "7".into(), "9".into(), "SX".into()],
        vec!["0:00:01".into(), "3".into(), "5".into(), "7".into(), "9".into(), Cell::Empty],
    ];
    let mut agg = MatchAggregate::new();
    process_sheet(&rows, &mut agg, &AggregatorConfig::default());
    agg.quartets.insert(
        "2-4-6-8".to_string(),
        QuartetStats::new("2-4-6-8", vec!["2".into(), "4".into(), "6".into(), "8".into()]),
    );

    let ranked = efficiency_ranking_quartets(&agg, &Roster::default());
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, "3-5-7-9");
    assert!(ranked[0].efficiency < EFFICIENCY_FLOOR);
    assert_eq!(ranked[1].id, "2-4-6-8");
    assert_eq!(ranked[1].efficiency, EFFICIENCY_FLOOR);
}

#[test]
fn goalkeepers_classified_by_role_or_minutes() {
    let (agg, roster) = fixture_aggregate();
    assert_eq!(
        classify_goalkeeper("1", &roster, &agg),
        Some(GoalkeeperBasis::ByRole)
    );
    assert_eq!(classify_goalkeeper("3", &roster, &agg), None);

    let unnamed = Roster::default();
    assert_eq!(
        classify_goalkeeper("12", &unnamed, &agg),
        Some(GoalkeeperBasis::ByMinutes)
    );

    let gks: Vec<&str> = active_goalkeepers(&agg, &roster)
        .iter()
        .map(|g| g.id.as_str())
        .collect();
    assert_eq!(gks, vec!["1", "12"]);
}

#[test]
fn active_players_exclude_goalkeepers_and_unnamed() {
    let (mut agg, mut roster) = fixture_aggregate();
    agg.player_mut("99").minutes = 4.0;
    roster.roles.insert("5".to_string(), "GK".to_string());

    let ids: Vec<&str> = active_players(&agg, &roster)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["3", "7", "9", "10", "11"]);
}

#[test]
fn quartet_label_uses_short_names() {
    let (agg, roster) = fixture_aggregate();
    let q = &agg.quartets["10-11-3-5"];
    assert_eq!(quartet_label(q, &roster), "Blu, Viola, Rossi, Verdi");
    assert_eq!(quartet_label(q, &Roster::default()), "10, 11, 3, 5");
}
