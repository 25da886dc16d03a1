// =============================================================================
// Text Report
// =============================================================================
//
// Human-readable rendering of a `RegimeSummary`. Undefined values print as
// `n/a` rather than being coerced to a number.

use std::fmt;

use crate::regime::{RegimePerformance, RegimeSummary};
use crate::runtime_config::IndicatorParams;

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Headline report for one summary, labelled with the windows that produced it.
pub struct SummaryReport<'a> {
    pub summary: &'a RegimeSummary,
    pub params: &'a IndicatorParams,
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s, p) = (self.summary, self.params);
        let flags = &s.flags;

        writeln!(f, "Daily Bearish Indicators (last close):")?;
        writeln!(f, "Date: {}", s.date)?;
        writeln!(f, "Close: {:.6}", s.close)?;
        writeln!(
            f,
            "SMA{}: {} | SMA{}: {}",
            p.sma_fast,
            fixed(s.sma_fast, 6),
            p.sma_slow,
            fixed(s.sma_slow, 6)
        )?;
        writeln!(f, "RSI{}: {}", p.rsi_period, fixed(s.rsi, 2))?;
        writeln!(
            f,
            "MACD: {} | Signal: {} | Hist: {}",
            fixed(s.macd, 6),
            fixed(s.macd_signal, 6),
            fixed(s.macd_hist, 6)
        )?;
        writeln!(f, "{}D Return: {}", p.return_lookback, percent(s.period_return))?;
        writeln!(f, "Bearish conditions ({}/5):", flags.count())?;
        writeln!(f, "- Price below SMA{}: {}", p.sma_slow, flags.price_below_sma_slow)?;
        writeln!(
            f,
            "- SMA{} below SMA{} (death-cross state): {}",
            p.sma_fast, p.sma_slow, flags.sma_fast_below_sma_slow
        )?;
        writeln!(
            f,
            "- MACD below signal: {} (MACD<0: {})",
            flags.macd_below_signal, flags.macd_negative
        )?;
        writeln!(f, "- RSI<50: {}", flags.rsi_below_50)?;
        writeln!(
            f,
            "- Bear share last {}d (close<SMA{} and MACD<0): {}",
            p.bear_share_window,
            p.sma_fast,
            s.bear_share
                .map_or_else(|| "no data".to_string(), |v| format!("{:.1}%", v * 100.0))
        )
    }
}

/// Render the headline report for `summary`, labelled with `params`.
pub fn render_summary(summary: &RegimeSummary, params: &IndicatorParams) -> String {
    SummaryReport { summary, params }.to_string()
}

/// One-line rendering of a regime performance split.
pub fn render_performance(perf: &RegimePerformance) -> String {
    format!(
        "Bull regime: {} over {} bars | Bear regime: {} over {} bars",
        percent(Some(perf.bull_return)),
        perf.bull_bars,
        percent(Some(perf.bear_return)),
        perf.bear_bars
    )
}
