// =============================================================================
// CSV Bar Loader
// =============================================================================
//
// Reads daily bars from delimited text with a header row naming at least
// `Date`, `Open`, `High`, `Low` and `Close` (any case, any column order; extra
// columns such as `Volume` are ignored).
//
// Rows that fail to parse are skipped. The result is sorted by date and
// duplicate dates collapse to the last row seen, so the output always
// satisfies the bar-sequence contract of the indicator engines.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use ::csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, trace};

use crate::types::Bar;

/// Column positions of the fields we need.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("header is missing a `{name}` column: {names:?}"))
        };
        Ok(Self {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
        })
    }

    fn parse_record(&self, record: &StringRecord) -> Option<Bar> {
        let price = |idx: usize| -> Option<f64> {
            // thousands separators survive inside quoted fields
            let v: f64 = record.get(idx)?.replace(',', "").parse().ok()?;
            v.is_finite().then_some(v)
        };
        Some(Bar {
            date: parse_date(record.get(self.date)?)?,
            open: price(self.open)?,
            high: price(self.high)?,
            low: price(self.low)?,
            close: price(self.close)?,
        })
    }
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
fn parse_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// Parse CSV text into an ascending, duplicate-free bar sequence.
pub fn parse_bars(text: &str) -> Result<Vec<Bar>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("CSV input has no header row");
    }
    let columns = Columns::from_headers(&headers)?;

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in reader.records().enumerate() {
        match result.ok().and_then(|record| columns.parse_record(&record)) {
            Some(bar) => bars.push(bar),
            None => {
                skipped += 1;
                trace!(row = row + 1, "skipping malformed CSV row");
            }
        }
    }

    bars.sort_by_key(|b| b.date);
    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }

    debug!(bars = deduped.len(), skipped, "parsed CSV bars");
    Ok(deduped)
}

/// Read and parse a CSV bar file.
pub fn load_bars(path: impl AsRef<Path>) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bar file {}", path.display()))?;
    parse_bars(&text).with_context(|| format!("failed to parse bar file {}", path.display()))
}

/// Keep only bars dated on or after `cutoff`.
pub fn trim_to_lookback(mut bars: Vec<Bar>, cutoff: NaiveDate) -> Vec<Bar> {
    bars.retain(|b| b.date >= cutoff);
    bars
}
