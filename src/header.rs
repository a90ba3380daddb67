use std::fmt;

use thiserror::Error;

use crate::cell::Cell;

/// Semantic columns of a timeline sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timing,
    Goalkeeper,
    Slot1,
    Slot2,
    Slot3,
    Slot4,
    GoalsFor,
    GoalsAgainst,
    ShotsOn,
    ShotsOff,
    Saves,
    TurnoversLost,
    TurnoversWon,
    FoulsCommitted,
    FoulsSuffered,
    ShotsBlocked,
}

impl Field {
    pub const COUNT: usize = 16;

    pub const LINEUP: [Field; 4] = [Field::Slot1, Field::Slot2, Field::Slot3, Field::Slot4];

    pub fn aliases(self) -> &'static [&'static str] {
        FIELD_ALIASES[self as usize].1
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Timing => "timing",
            Field::Goalkeeper => "goalkeeper",
            Field::Slot1 => "lineup slot 1",
            Field::Slot2 => "lineup slot 2",
            Field::Slot3 => "lineup slot 3",
            Field::Slot4 => "lineup slot 4",
            Field::GoalsFor => "goals for",
            Field::GoalsAgainst => "goals against",
            Field::ShotsOn => "shots on target",
            Field::ShotsOff => "shots off target",
            Field::Saves => "saves",
            Field::TurnoversLost => "turnovers lost",
            Field::TurnoversWon => "turnovers won",
            Field::FoulsCommitted => "fouls committed",
            Field::FoulsSuffered => "fouls suffered",
            Field::ShotsBlocked => "shots blocked",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted header spellings per field, indexed by `Field as usize`.
/// Any alias contained in a header cell is a match; order is not a priority.
pub const FIELD_ALIASES: [(Field, &[&str]); Field::COUNT] = [
    (Field::Timing, &["TIMING"]),
    (Field::Goalkeeper, &["PORTIERI", "PORTIERE"]),
    (Field::Slot1, &["Q1"]),
    (Field::Slot2, &["Q2"]),
    (Field::Slot3, &["Q3"]),
    (Field::Slot4, &["Q4"]),
    (Field::GoalsFor, &["GOAL FATTI", "GOAL F", "RETI F"]),
    (Field::GoalsAgainst, &["GOAL SUBITI", "GOAL S", "RETI S"]),
    (Field::ShotsOn, &["TIRI IN PORTA", "TIRI IN"]),
    (Field::ShotsOff, &["TIRI OUT", "TIRI FUORI"]),
    (Field::Saves, &["PARATE"]),
    (Field::TurnoversLost, &["PALLE PERSE", "P.P.", "PP"]),
    (Field::TurnoversWon, &["PALLE RECUPERATE", "P.R.", "PR"]),
    (Field::FoulsCommitted, &["FALLI FATTI"]),
    (Field::FoulsSuffered, &["FALLI SUBITI"]),
    (Field::ShotsBlocked, &["TIRI RIBATTUTI", "TIRI BLOCCATI", "RIBATTUTI"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("no header row with a timing column in the first {scanned} rows")]
    NoHeaderRow { scanned: usize },
    #[error("missing required columns: {}", join_fields(.0))]
    MissingColumns(Vec<Field>),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn normalize_header(cell: &Cell) -> String {
    cell.as_text().to_uppercase().trim().to_string()
}

/// Column index of every field found in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndexMap {
    indices: [Option<usize>; Field::COUNT],
}

impl FieldIndexMap {
    pub fn get(&self, field: Field) -> Option<usize> {
        self.indices[field as usize]
    }

    pub fn require_columns(&self) -> Result<SheetColumns, HeaderError> {
        let mut missing = Vec::new();
        if self.get(Field::Timing).is_none() {
            missing.push(Field::Timing);
        }
        for slot in Field::LINEUP {
            if self.get(slot).is_none() {
                missing.push(slot);
            }
        }
        let (Some(timing), Some(q1), Some(q2), Some(q3), Some(q4)) = (
            self.get(Field::Timing),
            self.get(Field::Slot1),
            self.get(Field::Slot2),
            self.get(Field::Slot3),
            self.get(Field::Slot4),
        ) else {
            return Err(HeaderError::MissingColumns(missing));
        };

        Ok(SheetColumns {
            timing,
            lineup: [q1, q2, q3, q4],
            goalkeeper: self.get(Field::Goalkeeper),
            goals_for: self.get(Field::GoalsFor),
            goals_against: self.get(Field::GoalsAgainst),
            shots_on: self.get(Field::ShotsOn),
            shots_off: self.get(Field::ShotsOff),
            saves: self.get(Field::Saves),
            turnovers_lost: self.get(Field::TurnoversLost),
            turnovers_won: self.get(Field::TurnoversWon),
            fouls_committed: self.get(Field::FoulsCommitted),
            fouls_suffered: self.get(Field::FoulsSuffered),
            shots_blocked: self.get(Field::ShotsBlocked),
        })
    }
}

/// Validated column layout: timing and lineup slots are guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetColumns {
    pub timing: usize,
    pub lineup: [usize; 4],
    pub goalkeeper: Option<usize>,
    pub goals_for: Option<usize>,
    pub goals_against: Option<usize>,
    pub shots_on: Option<usize>,
    pub shots_off: Option<usize>,
    pub saves: Option<usize>,
    pub turnovers_lost: Option<usize>,
    pub turnovers_won: Option<usize>,
    pub fouls_committed: Option<usize>,
    pub fouls_suffered: Option<usize>,
    pub shots_blocked: Option<usize>,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|alias| h.contains(alias)))
}

pub fn resolve(header_row: &[Cell]) -> FieldIndexMap {
    let headers: Vec<String> = header_row.iter().map(normalize_header).collect();
    let mut indices = [None; Field::COUNT];
    for (field, aliases) in FIELD_ALIASES {
        indices[field as usize] = find_column(&headers, aliases);
    }
    FieldIndexMap { indices }
}

/// Index of the first row (within `scan_limit`) carrying the timing header.
/// Metadata rows above the real header are common in exported sheets.
pub fn locate_header_row(rows: &[Vec<Cell>], scan_limit: usize) -> Option<usize> {
    let timing = Field::Timing.aliases();
    rows.iter().take(scan_limit).position(|row| {
        row.iter()
            .map(normalize_header)
            .any(|h| timing.iter().any(|alias| h.contains(alias)))
    })
}

/// Header row index plus validated columns for a whole sheet.
pub fn resolve_sheet(
    rows: &[Vec<Cell>],
    scan_limit: usize,
) -> Result<(usize, SheetColumns), HeaderError> {
    let header_idx = locate_header_row(rows, scan_limit).ok_or(HeaderError::NoHeaderRow {
        scanned: scan_limit.min(rows.len()),
    })?;
    let columns = resolve(&rows[header_idx]).require_columns()?;
    Ok((header_idx, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn alias_table_is_indexed_by_field() {
        for (idx, (field, aliases)) in FIELD_ALIASES.iter().enumerate() {
            assert_eq!(*field as usize, idx);
            assert!(!aliases.is_empty());
        }
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let map = resolve(&header(&[" timing ", "Portiere", "q1", "Q2", "Q3", "Q4", "Goal Fatti (ID)"]));
        assert_eq!(map.get(Field::Timing), Some(0));
        assert_eq!(map.get(Field::Goalkeeper), Some(1));
        assert_eq!(map.get(Field::Slot1), Some(2));
        assert_eq!(map.get(Field::GoalsFor), Some(6));
        assert_eq!(map.get(Field::GoalsAgainst), None);
        assert_eq!(map.get(Field::ShotsBlocked), None);
    }

    #[test]
    fn leftmost_match_wins() {
        let map = resolve(&header(&["TIMING", "RETI F", "GOAL FATTI"]));
        assert_eq!(map.get(Field::GoalsFor), Some(1));
    }

    #[test]
    fn missing_slot_is_reported() {
        let map = resolve(&header(&["TIMING", "Q1", "Q2", "Q4"]));
        let err = map.require_columns().unwrap_err();
        assert_eq!(err, HeaderError::MissingColumns(vec![Field::Slot3]));
        assert!(err.to_string().contains("lineup slot 3"));
    }

    #[test]
    fn header_row_found_after_metadata() {
        let rows = vec![
            header(&["PARTITA", "VALLI - OSPITI"]),
            header(&[]),
            header(&["TIMING", "Q1", "Q2", "Q3", "Q4"]),
        ];
        assert_eq!(locate_header_row(&rows, 10), Some(2));
        assert_eq!(locate_header_row(&rows, 2), None);
        let (idx, cols) = resolve_sheet(&rows, 10).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(cols.lineup, [1, 2, 3, 4]);
    }
}
