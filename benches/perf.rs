use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use futsal_stats::analysis_rankings::{efficiency_ranking_players, efficiency_ranking_quartets};
use futsal_stats::cell::{Cell, TimelineRow};
use futsal_stats::config::AggregatorConfig;
use futsal_stats::database::{MatchData, Roster, SheetData};
use futsal_stats::header::resolve;
use futsal_stats::timeline::aggregate_matches;

const HEADER: [&str; 15] = [
    "TIMING",
    "PORTIERI",
    "Q1",
    "Q2",
    "Q3",
    "Q4",
    "GOAL FATTI",
    "GOAL SUBITI",
    "TIRI IN PORTA",
    "TIRI OUT",
    "PARATE",
    "PALLE PERSE",
    "PALLE RECUPERATE",
    "FALLI FATTI",
    "FALLI SUBITI",
];

fn header_row() -> TimelineRow {
    HEADER.iter().map(|h| Cell::from(*h)).collect()
}

/// One half of synthetic play: a row every ~10 seconds, lineups rotating
/// every 12 rows through a 10-player squad.
fn sample_sheet(name: &str, rows: usize) -> SheetData {
    let mut out = vec![header_row()];
    for i in 0..rows {
        let base = (i / 12) % 10;
        let lineup: Vec<Cell> = (0..4)
            .map(|k| Cell::Scalar(((base + k * 2) % 10 + 2) as f64))
            .collect();
        let tag = |every: usize, value: Cell| if i % every == 0 { value } else { Cell::Empty };
        let mut row = vec![
            Cell::text(format!("{}:{:02}", (i * 10) / 60, (i * 10) % 60)),
            Cell::Scalar(1.0),
        ];
        row.extend(lineup.iter().cloned());
        row.push(tag(37, lineup[0].clone()));
        row.push(tag(41, Cell::text("SX")));
        row.push(tag(7, lineup[1].clone()));
        row.push(tag(9, lineup[2].clone()));
        row.push(tag(11, Cell::text("DX")));
        row.push(tag(5, lineup[3].clone()));
        row.push(tag(6, lineup[0].clone()));
        row.push(tag(13, lineup[1].clone()));
        row.push(tag(17, lineup[2].clone()));
        out.push(row);
    }
    SheetData {
        name: name.to_string(),
        rows: out,
    }
}

fn sample_matches(count: usize) -> Vec<MatchData> {
    (0..count)
        .map(|idx| MatchData {
            name: format!("Match {}", idx + 1),
            sheets: vec![sample_sheet("1T", 240), sample_sheet("2T", 240)],
        })
        .collect()
}

fn bench_header_resolve(c: &mut Criterion) {
    let header = header_row();
    c.bench_function("header_resolve", |b| {
        b.iter(|| {
            let map = resolve(black_box(&header));
            black_box(map);
        })
    });
}

fn bench_season_aggregate(c: &mut Criterion) {
    let matches = sample_matches(20);
    let cfg = AggregatorConfig::default();
    c.bench_function("season_aggregate", |b| {
        b.iter(|| {
            let report = aggregate_matches(black_box(&matches), &cfg);
            black_box(report.aggregate.quartets.len());
        })
    });
}

fn bench_rankings(c: &mut Criterion) {
    let report = aggregate_matches(&sample_matches(20), &AggregatorConfig::default());
    let roster = Roster::default();
    c.bench_function("efficiency_rankings", |b| {
        b.iter(|| {
            let players = efficiency_ranking_players(black_box(&report.aggregate), &roster);
            let quartets = efficiency_ranking_quartets(black_box(&report.aggregate), &roster);
            black_box(players.len() + quartets.len());
        })
    });
}

criterion_group!(
    benches,
    bench_header_resolve,
    bench_season_aggregate,
    bench_rankings
);
criterion_main!(benches);
