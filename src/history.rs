//! History store loader.
//!
//! Reads the persisted market-cap history from a JSON file, drops
//! incomplete entries, and returns the rest sorted ascending by date.
//! The store is an external, append-only input — this module never
//! writes to it.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::HistoryRecord;

/// Default history file path, relative to the working directory.
const DEFAULT_HISTORY_FILE: &str = "data/history.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no history file found at {path}")]
    Missing { path: String },

    #[error("failed to read history file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A history entry as it appears on disk, before validation.
///
/// Every field is optional so that one incomplete entry cannot poison
/// the whole file — incomplete entries are dropped, not fatal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    bp_market_cap: Option<f64>,
    #[serde(default)]
    coin_market_cap: Option<f64>,
}

impl RawRecord {
    /// Keep an entry only if all three fields are present and truthy.
    /// A zero cap counts as missing: it would put a zero denominator
    /// under the ahead ratio downstream.
    fn validate(self) -> Option<HistoryRecord> {
        let date = self.date.filter(|d| !d.is_empty())?;
        let bp = self.bp_market_cap.filter(|v| *v != 0.0)?;
        let coin = self.coin_market_cap.filter(|v| *v != 0.0)?;
        Some(HistoryRecord {
            date,
            bp_market_cap: bp,
            coin_market_cap: coin,
        })
    }
}

/// Load the history store and return valid records sorted ascending by date.
///
/// `None` selects the default `data/history.json` path. A missing file is
/// `HistoryError::Missing`; unparseable contents are `HistoryError::Malformed`.
pub fn load_history(path: Option<&Path>) -> Result<Vec<HistoryRecord>, HistoryError> {
    let path = path.unwrap_or(Path::new(DEFAULT_HISTORY_FILE));
    let path_display = path.display().to_string();

    if !path.exists() {
        return Err(HistoryError::Missing { path: path_display });
    }

    let json = std::fs::read_to_string(path).map_err(|source| HistoryError::Unreadable {
        path: path_display.clone(),
        source,
    })?;

    let raw: Vec<RawRecord> =
        serde_json::from_str(&json).map_err(|source| HistoryError::Malformed {
            path: path_display.clone(),
            source,
        })?;

    let total = raw.len();
    let mut rows: Vec<HistoryRecord> = raw.into_iter().filter_map(RawRecord::validate).collect();
    // Lexicographic order on YYYY-MM-DD is chronological order; the sort is
    // stable, so duplicate dates keep their input order.
    rows.sort_by(|a, b| a.date.cmp(&b.date));

    debug!(path = %path_display, total, kept = rows.len(), "History filtered");
    info!(
        path = %path_display,
        records = rows.len(),
        dropped = total - rows.len(),
        "History loaded"
    );

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(contents: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("capduel_test_history_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&p, contents).unwrap();
        p
    }

    #[test]
    fn test_load_missing_file() {
        let p = Path::new("/tmp/capduel_nonexistent_history_12345.json");
        let err = load_history(Some(p)).unwrap_err();
        assert!(matches!(err, HistoryError::Missing { .. }));
        assert!(err.to_string().contains("capduel_nonexistent_history_12345"));
    }

    #[test]
    fn test_load_malformed_file() {
        let p = temp_file("this is not json");
        let err = load_history(Some(&p)).unwrap_err();
        assert!(matches!(err, HistoryError::Malformed { .. }));
        std::fs::remove_file(&p).unwrap();
    }

    #[test]
    fn test_load_non_array_is_malformed() {
        let p = temp_file(r#"{"date":"2026-08-01"}"#);
        let err = load_history(Some(&p)).unwrap_err();
        assert!(matches!(err, HistoryError::Malformed { .. }));
        std::fs::remove_file(&p).unwrap();
    }

    #[test]
    fn test_load_sorts_ascending() {
        let p = temp_file(
            r#"[
                {"date":"2026-08-03","bpMarketCap":3.0,"coinMarketCap":30.0},
                {"date":"2026-08-01","bpMarketCap":1.0,"coinMarketCap":10.0},
                {"date":"2026-08-02","bpMarketCap":2.0,"coinMarketCap":20.0}
            ]"#,
        );
        let rows = load_history(Some(&p)).unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-08-01", "2026-08-02", "2026-08-03"]);
        std::fs::remove_file(&p).unwrap();
    }

    #[test]
    fn test_load_drops_incomplete_records() {
        let p = temp_file(
            r#"[
                {"date":"2026-08-01","bpMarketCap":1.0,"coinMarketCap":10.0},
                {"date":"2026-08-02","coinMarketCap":20.0},
                {"bpMarketCap":3.0,"coinMarketCap":30.0},
                {"date":"","bpMarketCap":4.0,"coinMarketCap":40.0},
                {"date":"2026-08-05","bpMarketCap":5.0,"coinMarketCap":50.0}
            ]"#,
        );
        let rows = load_history(Some(&p)).unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-08-01", "2026-08-05"]);
        std::fs::remove_file(&p).unwrap();
    }

    #[test]
    fn test_load_drops_zero_caps() {
        // Zero reads as "missing" — kept behavior from the source data feed.
        let p = temp_file(
            r#"[
                {"date":"2026-08-01","bpMarketCap":0.0,"coinMarketCap":10.0},
                {"date":"2026-08-02","bpMarketCap":2.0,"coinMarketCap":0},
                {"date":"2026-08-03","bpMarketCap":3.0,"coinMarketCap":30.0}
            ]"#,
        );
        let rows = load_history(Some(&p)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2026-08-03");
        std::fs::remove_file(&p).unwrap();
    }

    #[test]
    fn test_load_empty_array() {
        let p = temp_file("[]");
        let rows = load_history(Some(&p)).unwrap();
        assert!(rows.is_empty());
        std::fs::remove_file(&p).unwrap();
    }
}
