use log::{debug, warn};

use crate::cell::{Cell, TimelineRow, cell_at};
use crate::config::{AggregatorConfig, ZeroPolicy};
use crate::database::{MatchData, SheetData};
use crate::header::{self, HeaderError, SheetColumns};
use crate::state::{MatchAggregate, Zone, quartet_key};

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Minutes credited to a row: the gap to the next row's timestamp, or 0 when
/// there is no next timestamp or the clock does not move forward.
pub fn credited_minutes(t1: f64, next: Option<f64>) -> f64 {
    match next {
        Some(t2) if t2 > t1 => (t2 - t1) * MINUTES_PER_DAY,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Processed {
        header_row: usize,
        rows_used: usize,
        rows_skipped: usize,
    },
    Skipped(HeaderError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSheet {
    pub match_name: String,
    pub sheet_name: String,
    pub reason: HeaderError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub aggregate: MatchAggregate,
    pub sheets_processed: usize,
    pub skipped: Vec<SkippedSheet>,
}

/// Fresh aggregate over every sheet of every match, in the order supplied.
pub fn aggregate_matches(matches: &[MatchData], cfg: &AggregatorConfig) -> LoadReport {
    let mut report = LoadReport::default();

    for m in matches {
        if !m.name.trim().is_empty() {
            report.aggregate.processed_files.push(m.name.clone());
        }
        for sheet in &m.sheets {
            match process_sheet(&sheet.rows, &mut report.aggregate, cfg) {
                SheetOutcome::Processed {
                    rows_used,
                    rows_skipped,
                    ..
                } => {
                    debug!(
                        "sheet {} / {}: {} rows aggregated, {} skipped",
                        m.name, sheet.name, rows_used, rows_skipped
                    );
                    report.sheets_processed += 1;
                }
                SheetOutcome::Skipped(reason) => {
                    warn!("sheet {} / {} skipped: {}", m.name, sheet.name, reason);
                    report.skipped.push(SkippedSheet {
                        match_name: m.name.clone(),
                        sheet_name: sheet_label(sheet),
                        reason,
                    });
                }
            }
        }
    }

    report
}

fn sheet_label(sheet: &SheetData) -> String {
    if sheet.name.trim().is_empty() {
        "(unnamed)".to_string()
    } else {
        sheet.name.clone()
    }
}

/// Fold one sheet (header included) into `store`.
///
/// Malformed rows never abort the sheet: a row with an unreadable timing cell
/// is skipped whole, a row without lineup only feeds the goalkeeper, and a
/// sheet whose header cannot be resolved leaves `store` untouched.
pub fn process_sheet(
    rows: &[TimelineRow],
    store: &mut MatchAggregate,
    cfg: &AggregatorConfig,
) -> SheetOutcome {
    let (header_row, cols) = match header::resolve_sheet(rows, cfg.header_scan_rows) {
        Ok(found) => found,
        Err(err) => return SheetOutcome::Skipped(err),
    };
    let body = &rows[header_row + 1..];
    let reader = RowReader {
        cols: &cols,
        zero: cfg.zero_policy,
    };

    let mut last_key: Option<String> = None;
    let mut rows_used = 0usize;
    let mut rows_skipped = 0usize;

    for (i, row) in body.iter().enumerate() {
        let Some(t1) = reader.timing(row) else {
            rows_skipped += 1;
            continue;
        };
        let next = body.get(i + 1).and_then(|r| reader.timing(r));
        let duration = credited_minutes(t1, next);
        store.total_minutes += duration;
        rows_used += 1;

        credit_goalkeeper(&reader, row, duration, store);

        let members = reader.lineup(row);
        if members.is_empty() {
            continue;
        }
        let key = quartet_key(&members);
        if last_key.as_deref() != Some(key.as_str()) {
            store.quartet_mut(&key, &members).freq += 1;
            last_key = Some(key.clone());
        }

        for pid in &members {
            store.player_mut(pid).minutes += duration;
        }
        store.quartet_mut(&key, &members).minutes += duration;

        attribute_events(&reader, row, &key, &members, store);
    }

    SheetOutcome::Processed {
        header_row,
        rows_used,
        rows_skipped,
    }
}

struct RowReader<'a> {
    cols: &'a SheetColumns,
    zero: ZeroPolicy,
}

impl RowReader<'_> {
    fn timing(&self, row: &[Cell]) -> Option<f64> {
        cell_at(row, self.cols.timing).day_fraction()
    }

    fn text(&self, row: &[Cell], col: Option<usize>) -> Option<String> {
        let col = col?;
        cell_at(row, col)
            .present_text(self.zero)
            .filter(|s| !s.is_empty())
    }

    /// Present lineup ids, sorted so the slot order never matters.
    fn lineup(&self, row: &[Cell]) -> Vec<String> {
        let mut members: Vec<String> = self
            .cols
            .lineup
            .iter()
            .filter_map(|&col| self.text(row, Some(col)))
            .collect();
        members.sort();
        members
    }
}

fn credit_goalkeeper(
    reader: &RowReader<'_>,
    row: &[Cell],
    duration: f64,
    store: &mut MatchAggregate,
) {
    let Some(gk_id) = reader.text(row, reader.cols.goalkeeper) else {
        return;
    };
    let saves = reader.text(row, reader.cols.saves);
    let conceded = reader.text(row, reader.cols.goals_against);

    let gk = store.goalkeeper_mut(&gk_id);
    gk.minutes += duration;
    if let Some(tag) = saves {
        gk.record_save(Zone::from_tag(&tag));
    }
    if let Some(tag) = conceded {
        gk.record_goal_against(Zone::from_tag(&tag));
    }
}

fn attribute_events(
    reader: &RowReader<'_>,
    row: &[Cell],
    key: &str,
    members: &[String],
    store: &mut MatchAggregate,
) {
    let cols = reader.cols;

    if let Some(scorer) = reader.text(row, cols.goals_for) {
        store.total_goals_for += 1;
        store.player_mut(&scorer).goals += 1;
        for pid in members {
            store.player_mut(pid).plus += 1;
        }
        store.quartet_mut(key, members).gf += 1;
    }

    if reader.text(row, cols.goals_against).is_some() {
        store.total_goals_against += 1;
        for pid in members {
            let p = store.player_mut(pid);
            p.gs += 1;
            p.minus += 1;
        }
        let q = store.quartet_mut(key, members);
        q.gs += 1;
        q.shots_against += 1;
    }

    if let Some(shooter) = reader.text(row, cols.shots_on) {
        store.player_mut(&shooter).shots_on += 1;
        store.quartet_mut(key, members).shots_on += 1;
    }
    if let Some(shooter) = reader.text(row, cols.shots_off) {
        store.player_mut(&shooter).shots_off += 1;
        store.quartet_mut(key, members).shots_off += 1;
    }

    if let Some(pid) = reader.text(row, cols.turnovers_lost) {
        store.player_mut(&pid).pp += 1;
        store.quartet_mut(key, members).pp += 1;
    }
    if let Some(pid) = reader.text(row, cols.turnovers_won) {
        store.player_mut(&pid).pr += 1;
        store.quartet_mut(key, members).pr += 1;
    }

    // Fouls and blocked shots are personal only.
    if let Some(pid) = reader.text(row, cols.fouls_committed) {
        store.player_mut(&pid).ff += 1;
    }
    if let Some(pid) = reader.text(row, cols.fouls_suffered) {
        store.player_mut(&pid).fs += 1;
    }
    if let Some(pid) = reader.text(row, cols.shots_blocked) {
        store.player_mut(&pid).shots_blocked += 1;
    }
}
