use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ZeroPolicy;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

const NULL_TOKENS: [&str; 4] = ["null", "none", "undefined", "nan"];

/// One spreadsheet cell as exported by the timeline sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Scalar(f64),
    Text(String),
    Link { text: String, url: String },
}

pub type TimelineRow = Vec<Cell>;

static EMPTY: Cell = Cell::Empty;

/// Cell at `idx`, reading past the end of a short row as empty.
pub fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY)
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// String rendering, the way a spreadsheet would show it.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Scalar(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Link { text, .. } => text.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Scalar(v) => v.is_nan(),
            Cell::Text(s) | Cell::Link { text: s, .. } => s.trim().is_empty(),
        }
    }

    fn is_zero_like(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Scalar(v) => *v == 0.0 || v.is_nan(),
            Cell::Text(s) | Cell::Link { text: s, .. } => {
                let t = s.trim();
                if NULL_TOKENS.iter().any(|tok| t.eq_ignore_ascii_case(tok)) {
                    return true;
                }
                t.parse::<f64>().is_ok_and(|v| v == 0.0)
            }
        }
    }

    pub fn is_present(&self, zero: ZeroPolicy) -> bool {
        if self.is_blank() {
            return false;
        }
        match zero {
            ZeroPolicy::Keep => true,
            ZeroPolicy::TreatAsEmpty => !self.is_zero_like(),
        }
    }

    /// Trimmed identity text (player id, zone tag) when the cell counts as present.
    pub fn present_text(&self, zero: ZeroPolicy) -> Option<String> {
        if !self.is_present(zero) {
            return None;
        }
        Some(self.as_text().trim().to_string())
    }

    /// Timing value as a fraction of a day.
    ///
    /// Numbers are taken as-is (spreadsheet time serials). Strings accept
    /// `H:MM:SS`, `MM:SS` or a plain number.
    pub fn day_fraction(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Scalar(v) => *v,
            Cell::Text(s) | Cell::Link { text: s, .. } => parse_clock_text(s)?,
        };
        value.is_finite().then_some(value)
    }
}

fn parse_clock_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if !s.contains(':') {
        return s.parse::<f64>().ok();
    }
    let parts = s
        .split(':')
        .map(|p| {
            let p = p.trim();
            if p.is_empty() {
                Some(0.0)
            } else {
                p.parse::<f64>().ok()
            }
        })
        .collect::<Option<Vec<f64>>>()?;
    let seconds = match parts.as_slice() {
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        [m, s] => m * 60.0 + s,
        _ => return None,
    };
    Some(seconds / SECONDS_PER_DAY)
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Scalar(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Scalar(value as f64)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CellVisitor)
    }
}

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Cell;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, string, null or {text, url} object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Cell, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Cell, E> {
        Ok(Cell::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cell, E> {
        Ok(Cell::Scalar(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cell, E> {
        Ok(Cell::Scalar(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cell, E> {
        Ok(Cell::Scalar(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Cell, E> {
        Ok(Cell::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Cell, E> {
        if v.is_empty() {
            Ok(Cell::Empty)
        } else {
            Ok(Cell::Text(v))
        }
    }

    // Rich-text cells arrive as {"text": ..., "url": ...} or {"richText": [...]};
    // values may themselves be numbers or nested runs. Unknown keys are ignored.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Cell, A::Error> {
        let mut text: Option<String> = None;
        let mut url: Option<String> = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "text" | "richText" => text = Some(map.next_value::<Cell>()?.as_text()),
                "url" | "hyperlink" => {
                    url = Some(map.next_value::<Cell>()?.as_text()).filter(|u| !u.is_empty());
                }
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }
        let text = text.unwrap_or_default();
        match url {
            Some(url) => Ok(Cell::Link { text, url }),
            None => Ok(Cell::from(text.as_str())),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Cell, A::Error> {
        let mut parts = Vec::new();
        while let Some(part) = seq.next_element::<Cell>()? {
            parts.push(part.as_text());
        }
        Ok(Cell::from(parts.join("").as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_text_converts_to_day_fraction() {
        let five_min = Cell::text("5:00").day_fraction().unwrap();
        assert!((five_min * 1440.0 - 5.0).abs() < 1e-9);
        let hour = Cell::text("1:00:00").day_fraction().unwrap();
        assert!((hour * 24.0 - 1.0).abs() < 1e-9);
        assert_eq!(Cell::Scalar(0.25).day_fraction(), Some(0.25));
        assert_eq!(Cell::text("0.5").day_fraction(), Some(0.5));
    }

    #[test]
    fn unparsable_timing_is_none() {
        assert!(Cell::Empty.day_fraction().is_none());
        assert!(Cell::text("abc").day_fraction().is_none());
        assert!(Cell::text("1:xx").day_fraction().is_none());
        assert!(Cell::text("1:2:3:4").day_fraction().is_none());
        assert!(Cell::Scalar(f64::NAN).day_fraction().is_none());
    }

    #[test]
    fn zero_policy_controls_presence() {
        let zero = Cell::text("0");
        assert!(!zero.is_present(ZeroPolicy::TreatAsEmpty));
        assert!(zero.is_present(ZeroPolicy::Keep));
        assert!(!Cell::Scalar(0.0).is_present(ZeroPolicy::TreatAsEmpty));
        assert!(!Cell::text("null").is_present(ZeroPolicy::TreatAsEmpty));
        assert!(!Cell::text("   ").is_present(ZeroPolicy::Keep));
        assert!(Cell::text("SX").is_present(ZeroPolicy::TreatAsEmpty));
    }

    #[test]
    fn numeric_ids_render_without_fraction() {
        assert_eq!(
            Cell::Scalar(7.0).present_text(ZeroPolicy::TreatAsEmpty).as_deref(),
            Some("7")
        );
        assert_eq!(
            Cell::text(" 10 ").present_text(ZeroPolicy::TreatAsEmpty).as_deref(),
            Some("10")
        );
    }

    #[test]
    fn deserializes_mixed_cells() {
        let cells: Vec<Cell> =
            serde_json::from_str(r#"[null, 3, 0.5, "", "SX", {"text": "MVP", "url": "http://x"}, true]"#)
                .unwrap();
        assert_eq!(cells[0], Cell::Empty);
        assert_eq!(cells[1], Cell::Scalar(3.0));
        assert_eq!(cells[2], Cell::Scalar(0.5));
        assert_eq!(cells[3], Cell::Empty);
        assert_eq!(cells[4], Cell::text("SX"));
        assert_eq!(
            cells[5],
            Cell::Link {
                text: "MVP".to_string(),
                url: "http://x".to_string()
            }
        );
        assert_eq!(cells[6], Cell::text("true"));
    }

    #[test]
    fn rich_text_values_may_be_numbers_or_runs() {
        let cells: Vec<Cell> = serde_json::from_str(
            r#"[{"text": 5}, {"richText": [{"text": "Ros"}, {"text": "si"}]}, {"text": null, "url": ""}]"#,
        )
        .unwrap();
        assert_eq!(cells[0], Cell::text("5"));
        assert_eq!(cells[1], Cell::text("Rossi"));
        assert_eq!(cells[2], Cell::Empty);
    }

    #[test]
    fn short_rows_read_as_empty() {
        let row = vec![Cell::Scalar(1.0)];
        assert_eq!(cell_at(&row, 5), &Cell::Empty);
    }
}
