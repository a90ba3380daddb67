use std::env;

const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// How event cells holding a literal zero are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPolicy {
    /// "0", "0.0", numeric zero and null-like tokens count as an empty cell.
    #[default]
    TreatAsEmpty,
    /// Only blank cells are empty.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub zero_policy: ZeroPolicy,
    /// How many leading rows may be searched for the header row.
    pub header_scan_rows: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            zero_policy: ZeroPolicy::TreatAsEmpty,
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }
}

impl AggregatorConfig {
    pub fn from_env() -> Self {
        let zero_policy = if env_bool("FUTSAL_ZERO_AS_EMPTY", true) {
            ZeroPolicy::TreatAsEmpty
        } else {
            ZeroPolicy::Keep
        };
        let header_scan_rows = env::var("FUTSAL_HEADER_SCAN_ROWS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_HEADER_SCAN_ROWS)
            .clamp(1, 50);

        Self {
            zero_policy,
            header_scan_rows,
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_treat_zero_as_empty() {
        let cfg = AggregatorConfig::default();
        assert_eq!(cfg.zero_policy, ZeroPolicy::TreatAsEmpty);
        assert_eq!(cfg.header_scan_rows, 10);
    }
}
