//! Report rendering.
//!
//! Derives the leader/ahead metrics from the loaded history and renders
//! the weekly summary as a self-contained HTML document. Everything in
//! this module is a pure function of its arguments: no I/O, no clock
//! reads — the current date comes in as a parameter.
//!
//! All presentation is inline so the document renders correctly in email
//! clients that refuse to fetch external resources.

use chrono::NaiveDate;

use crate::types::{HistoryRecord, Leader};

/// How many of the most recent entries the trend table shows.
const WINDOW_LEN: usize = 7;

/// The race ends May 1, 2030.
pub fn race_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 5, 1).expect("valid race end date")
}

/// Whole days from `today` until the race end, never negative.
pub fn days_left(today: NaiveDate) -> i64 {
    (race_end() - today).num_days().max(0)
}

/// Render a fraction as a percentage with two decimals: `0.1234` → `"12.34%"`.
pub fn pct_str(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}

/// Abbreviate a dollar amount: T/B/M suffixes with two decimals above the
/// 1e12/1e9/1e6 thresholds, a thousands-grouped integer below.
pub fn money_str(n: f64) -> String {
    if n >= 1e12 {
        format!("{:.2}T", n / 1e12)
    } else if n >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else {
        group_thousands(n)
    }
}

/// Round to a whole number and insert thousands separators.
fn group_thousands(n: f64) -> String {
    let whole = n.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render the full report document.
///
/// `rows` must already be filtered and sorted ascending by date. An empty
/// history renders a minimal placeholder instead of the full layout — the
/// report is still sent in that case, so the recipient learns the feed is
/// empty.
pub fn render_report(rows: &[HistoryRecord], site_url: Option<&str>, today: NaiveDate) -> String {
    let Some(latest) = rows.last() else {
        return "<p>No data yet.</p>".to_string();
    };

    let headline = latest.comparison();

    // Most recent stretch, at most WINDOW_LEN entries.
    let window = &rows[rows.len().saturating_sub(WINDOW_LEN)..];

    // Textual trend vs the oldest entry in the window.
    let trend = if window.len() >= 2 {
        let oldest = window[0].comparison();
        let delta = if headline.leader != Leader::Tied {
            headline.ahead - oldest.ahead
        } else {
            0.0
        };
        format!(" (Δ vs 7d: {})", pct_str(delta))
    } else {
        String::new()
    };

    // Table rows, newest first.
    let mut table_rows = String::new();
    for r in window.iter().rev() {
        let c = r.comparison();
        let pill_color = c.leader.color();
        table_rows.push_str(&format!(
            "<tr>\
             <td style='padding:8px;border-bottom:1px solid #e5e7eb'>{date}</td>\
             <td style='padding:8px;border-bottom:1px solid #e5e7eb'>{bp}</td>\
             <td style='padding:8px;border-bottom:1px solid #e5e7eb'>{coin}</td>\
             <td style='padding:8px;border-bottom:1px solid #e5e7eb'>{leader}</td>\
             <td style='padding:8px;border-bottom:1px solid #e5e7eb'>\
             <span style='border:1px solid {pill_color};border-radius:999px;padding:3px 8px;color:{pill_color};font-size:12px'>{pct}</span>\
             </td></tr>",
            date = r.date,
            bp = money_str(r.bp_market_cap),
            coin = money_str(r.coin_market_cap),
            leader = c.leader,
            pct = pct_str(c.ahead),
        ));
    }

    let link = site_url
        .filter(|u| !u.is_empty())
        .map(|u| {
            format!(
                "<p style='margin:12px 0 0'>\
                 <a href='{u}' style='color:#2563eb;text-decoration:none'>Open the live dashboard →</a>\
                 </p>"
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html>
  <body style="font-family:-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;color:#0b1221;background:#ffffff;margin:0;padding:16px;">
    <div style="max-width:720px;margin:0 auto;">
      <h2 style="margin:0 0 4px 0;">Marty vs Winslow — Weekly Update</h2>
      <div style="color:#6b7280;margin-bottom:12px;">COIN vs BP market capitalization • Ends May 1, 2030</div>

      <div style="background:#f8fafc;border-radius:12px;padding:14px 16px;margin-bottom:12px;">
        <table role="presentation" style="width:100%;border-collapse:collapse">
          <tr>
            <td style="padding:6px 0;width:33%;">
              <div style="color:#6b7280;font-size:13px;">Days left</div>
              <div style="font-weight:700;font-size:22px;">{days_left}</div>
            </td>
            <td style="padding:6px 0;width:33%;">
              <div style="color:#6b7280;font-size:13px;">Currently winning</div>
              <div style="font-weight:800;font-size:22px;color:{leader_color}">{leader}</div>
            </td>
            <td style="padding:6px 0;width:33%;">
              <div style="color:#6b7280;font-size:13px;">% ahead</div>
              <div style="font-weight:700;font-size:22px;">{ahead}{trend}</div>
            </td>
          </tr>
        </table>
        <div style="color:#6b7280;font-size:12px;margin-top:4px">% ahead = (leader − loser) / loser</div>
      </div>

      <div style="background:#f8fafc;border-radius:12px;padding:14px 16px;">
        <div style="display:flex;justify-content:space-between;align-items:baseline;margin-bottom:8px;">
          <strong>Last 7 entries</strong>
          <span style="color:#6b7280;font-size:12px;">Updated {updated}</span>
        </div>
        <table style="width:100%;border-collapse:collapse;">
          <thead>
            <tr>
              <th align="left" style="padding:8px;border-bottom:1px solid #e5e7eb;">Date</th>
              <th align="left" style="padding:8px;border-bottom:1px solid #e5e7eb;">BP Market Cap</th>
              <th align="left" style="padding:8px;border-bottom:1px solid #e5e7eb;">COIN Market Cap</th>
              <th align="left" style="padding:8px;border-bottom:1px solid #e5e7eb;">Leader</th>
              <th align="left" style="padding:8px;border-bottom:1px solid #e5e7eb;">% Ahead</th>
            </tr>
          </thead>
          <tbody>
            {table_rows}
          </tbody>
        </table>
        {link}
      </div>

      <div style="color:#6b7280;font-size:12px;margin-top:12px;">
        This email was sent automatically by GitHub Actions using Brevo.
      </div>
    </div>
  </body>
</html>
"#,
        days_left = days_left(today),
        leader_color = headline.leader.color(),
        leader = headline.leader,
        ahead = pct_str(headline.ahead),
        trend = trend,
        updated = latest.date,
        table_rows = table_rows,
        link = link,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
