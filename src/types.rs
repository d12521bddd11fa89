//! Shared types for the CAPDUEL reporter.
//!
//! These types form the data model used across all modules: the raw
//! history entries read from disk and the leader/ahead comparison
//! derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// HistoryRecord
// ---------------------------------------------------------------------------

/// One daily entry of the market-cap race.
///
/// Wire format (JSON): `{"date": "YYYY-MM-DD", "bpMarketCap": n, "coinMarketCap": n}`.
/// The date string doubles as the sort key — lexicographic order matches
/// chronological order for `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub date: String,
    pub bp_market_cap: f64,
    pub coin_market_cap: f64,
}

impl HistoryRecord {
    /// Leader/ahead comparison for this entry.
    pub fn comparison(&self) -> Comparison {
        Comparison::from_caps(self.bp_market_cap, self.coin_market_cap)
    }

    /// Helper to build a test record with sensible defaults.
    #[cfg(test)]
    pub fn sample(date: &str, bp: f64, coin: f64) -> Self {
        HistoryRecord {
            date: date.to_string(),
            bp_market_cap: bp,
            coin_market_cap: coin,
        }
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (BP: {:.0} | COIN: {:.0})",
            self.date, self.bp_market_cap, self.coin_market_cap
        )
    }
}

// ---------------------------------------------------------------------------
// Leader
// ---------------------------------------------------------------------------

/// Display color for Marty's pill and headline (COIN leads).
pub const MARTY_BLUE: &str = "#184FF8";
/// Display color for Winslow's pill and headline (BP leads).
pub const WINSLOW_GREEN: &str = "#007F01";

/// Who is currently ahead in the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leader {
    /// COIN is larger.
    Marty,
    /// BP is larger.
    Winslow,
    /// Both caps are exactly equal.
    Tied,
}

impl Leader {
    /// Fixed display color keyed to the leading entity.
    /// A tie falls back to Winslow's green, as the original report did.
    pub fn color(&self) -> &'static str {
        match self {
            Leader::Marty => MARTY_BLUE,
            Leader::Winslow | Leader::Tied => WINSLOW_GREEN,
        }
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leader::Marty => write!(f, "Marty (COIN)"),
            Leader::Winslow => write!(f, "Winslow (BP)"),
            Leader::Tied => write!(f, "Tied"),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Leader and relative lead for one pair of caps.
///
/// `ahead` is the leader's excess over the trailing value, as a fraction
/// of the trailing value: `(leader - trailer) / trailer`. Zero when tied.
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub leader: Leader,
    pub ahead: f64,
}

impl Comparison {
    pub fn from_caps(bp: f64, coin: f64) -> Self {
        if coin > bp {
            Comparison {
                leader: Leader::Marty,
                ahead: (coin - bp) / bp,
            }
        } else if bp > coin {
            Comparison {
                leader: Leader::Winslow,
                ahead: (bp - coin) / coin,
            }
        } else {
            Comparison {
                leader: Leader::Tied,
                ahead: 0.0,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_leads() {
        let c = Comparison::from_caps(100.0, 150.0);
        assert_eq!(c.leader, Leader::Marty);
        assert!((c.ahead - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bp_leads() {
        let c = Comparison::from_caps(200.0, 160.0);
        assert_eq!(c.leader, Leader::Winslow);
        assert!((c.ahead - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_tied() {
        let c = Comparison::from_caps(100.0, 100.0);
        assert_eq!(c.leader, Leader::Tied);
        assert_eq!(c.ahead, 0.0);
    }

    #[test]
    fn test_antisymmetric() {
        // Swapping the operands swaps the leader but keeps the fraction.
        for (a, b) in [(100.0, 150.0), (3.0, 7.0), (1e12, 2.5e12)] {
            let fwd = Comparison::from_caps(a, b);
            let rev = Comparison::from_caps(b, a);
            assert_eq!(fwd.leader, Leader::Marty);
            assert_eq!(rev.leader, Leader::Winslow);
            assert!((fwd.ahead - rev.ahead).abs() < 1e-12);
        }
    }

    #[test]
    fn test_record_comparison() {
        let r = HistoryRecord::sample("2026-08-01", 100.0, 150.0);
        assert_eq!(r.comparison().leader, Leader::Marty);
    }

    #[test]
    fn test_leader_labels() {
        assert_eq!(Leader::Marty.to_string(), "Marty (COIN)");
        assert_eq!(Leader::Winslow.to_string(), "Winslow (BP)");
        assert_eq!(Leader::Tied.to_string(), "Tied");
    }

    #[test]
    fn test_leader_colors() {
        assert_eq!(Leader::Marty.color(), MARTY_BLUE);
        assert_eq!(Leader::Winslow.color(), WINSLOW_GREEN);
        assert_eq!(Leader::Tied.color(), WINSLOW_GREEN);
    }

    #[test]
    fn test_wire_names() {
        let json = r#"{"date":"2026-08-01","bpMarketCap":1.0,"coinMarketCap":2.0}"#;
        let r: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.date, "2026-08-01");
        assert_eq!(r.bp_market_cap, 1.0);
        assert_eq!(r.coin_market_cap, 2.0);
    }
}
