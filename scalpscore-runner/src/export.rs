//! Export of signal results: CSV for spreadsheets, JSON for tooling.

use anyhow::{Context, Result};
use scalpscore_core::domain::SignalResult;

use crate::data_loader::TIMESTAMP_FORMAT;
use crate::scan::ScanReport;

fn price(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

/// Export results as CSV, one row per symbol in the given order.
///
/// Columns: symbol, bias, score, session, last, entry, stop, target_1r,
/// target_2r, reason, as_of. Absent levels are empty cells.
pub fn export_csv(results: &[SignalResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "symbol",
        "bias",
        "score",
        "session",
        "last",
        "entry",
        "stop",
        "target_1r",
        "target_2r",
        "reason",
        "as_of",
    ])?;

    for r in results {
        let as_of = r
            .timestamp
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        wtr.write_record([
            r.symbol.as_str(),
            &r.bias.to_string(),
            &r.score.to_string(),
            &r.session.to_string(),
            &price(r.last_price),
            &price(r.entry()),
            &price(r.stop()),
            &price(r.target_1r()),
            &price(r.target_2r()),
            r.reason.as_str(),
            &as_of,
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Serialize a scan report to pretty JSON.
pub fn export_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScanReport to JSON")
}
