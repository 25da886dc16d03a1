// =============================================================================
// Bearish Regime Scorer
// =============================================================================
//
// Runs every indicator over the full close history, snapshots the last bar and
// evaluates five bearish conditions plus a trailing "bear share":
//
//   1. close      < SMA(slow)
//   2. SMA(fast)  < SMA(slow)          (death-cross state)
//   3. MACD       < signal
//   4. MACD       < 0
//   5. RSI        < 50
//
//   bear share = #bars with (close < SMA(fast) AND MACD < 0)
//                / #bars where both SMA(fast) and MACD are defined
//                over the last `bear_share_window` bars.
//
// A condition whose operands are undefined evaluates to false. The bear share
// is `None` when no bar in the window has both operands defined.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{IndicatorError, Result};
use crate::indicators::{macd, rate_of_change, rsi, sma, MacdSeries};
use crate::regime::trend::{trend_regime, TrendRegime};
use crate::runtime_config::IndicatorParams;
use crate::types::{self, Bar, IndicatorSeries};

// =============================================================================
// Types
// =============================================================================

/// The five boolean bearish conditions at the final bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearFlags {
    pub price_below_sma_slow: bool,
    pub sma_fast_below_sma_slow: bool,
    pub macd_below_signal: bool,
    pub macd_negative: bool,
    pub rsi_below_50: bool,
}

impl BearFlags {
    /// Number of conditions that hold.
    pub fn count(&self) -> usize {
        [
            self.price_below_sma_slow,
            self.sma_fast_below_sma_slow,
            self.macd_below_signal,
            self.macd_negative,
            self.rsi_below_50,
        ]
        .iter()
        .filter(|&&f| f)
        .count()
    }
}

/// Snapshot of every indicator at the final bar plus the bearish assessment.
///
/// With default parameters `sma_fast` is SMA(50), `sma_slow` SMA(200), `rsi`
/// RSI(14), the MACD triple MACD(12, 26, 9), `period_return` the 20-bar
/// return and `bear_share` covers the last 30 bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub period_return: Option<f64>,
    pub flags: BearFlags,
    pub bear_share: Option<f64>,
}

/// Full per-bar indicator history, index-aligned with the input bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub sma_fast: IndicatorSeries,
    pub sma_slow: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Bull/bear/neutral state of the fast/slow SMA pair at every bar.
    pub fn trend_regimes(&self) -> Vec<TrendRegime> {
        trend_regime(&self.sma_fast, &self.sma_slow)
    }
}

/// Summary plus the series it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub summary: RegimeSummary,
    pub frame: IndicatorFrame,
}

// =============================================================================
// BearScorer
// =============================================================================

/// Stateless scorer bound to one parameter set.
#[derive(Debug, Clone, Default)]
pub struct BearScorer {
    params: IndicatorParams,
}

impl BearScorer {
    /// Create a scorer, rejecting invalid parameters up front.
    pub fn new(params: IndicatorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Score a closes/dates pair and return only the final snapshot.
    pub fn score(&self, closes: &[f64], dates: &[NaiveDate]) -> Result<RegimeSummary> {
        let frame = self.frame(closes, dates)?;
        self.summarize(&frame)
    }

    /// Score a bar sequence and return only the final snapshot.
    pub fn score_bars(&self, bars: &[Bar]) -> Result<RegimeSummary> {
        Ok(self.analyze(bars)?.summary)
    }

    /// Score a bar sequence and keep the full indicator history.
    pub fn analyze(&self, bars: &[Bar]) -> Result<RegimeReport> {
        types::validate_bars(bars)?;
        let frame = self.frame(&types::closes(bars), &types::dates(bars))?;
        let summary = self.summarize(&frame)?;
        Ok(RegimeReport { summary, frame })
    }

    /// Compute every indicator series over the full history.
    pub fn frame(&self, closes: &[f64], dates: &[NaiveDate]) -> Result<IndicatorFrame> {
        types::validate_closes(closes, dates)?;
        if closes.len() < self.params.min_history {
            return Err(IndicatorError::InsufficientHistory {
                required: self.params.min_history,
                actual: closes.len(),
            });
        }

        let p = &self.params;
        Ok(IndicatorFrame {
            dates: dates.to_vec(),
            closes: closes.to_vec(),
            sma_fast: sma(closes, p.sma_fast)?,
            sma_slow: sma(closes, p.sma_slow)?,
            rsi: rsi(closes, p.rsi_period)?,
            macd: macd(closes, p.macd_fast, p.macd_slow, p.macd_signal)?,
        })
    }

    /// Snapshot the final bar of `frame` and evaluate the bearish conditions.
    fn summarize(&self, frame: &IndicatorFrame) -> Result<RegimeSummary> {
        let n = frame.len();
        let lengths = [
            frame.dates.len(),
            frame.sma_fast.len(),
            frame.sma_slow.len(),
            frame.rsi.len(),
            frame.macd.macd.len(),
            frame.macd.signal.len(),
            frame.macd.histogram.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(IndicatorError::InvalidInput(format!(
                "indicator frame series are misaligned: {n} closes, series lengths {lengths:?}"
            )));
        }
        if n < self.params.min_history {
            return Err(IndicatorError::InsufficientHistory {
                required: self.params.min_history,
                actual: n,
            });
        }
        let last = n
            .checked_sub(1)
            .ok_or_else(|| IndicatorError::InvalidInput("indicator frame is empty".into()))?;

        let close = frame.closes[last];
        let sma_fast = frame.sma_fast[last];
        let sma_slow = frame.sma_slow[last];
        let rsi = frame.rsi[last];
        let macd = frame.macd.macd[last];
        let macd_signal = frame.macd.signal[last];
        let macd_hist = frame.macd.histogram[last];

        let period_return = rate_of_change(&frame.closes, self.params.return_lookback)?[last];

        let flags = BearFlags {
            price_below_sma_slow: below(Some(close), sma_slow),
            sma_fast_below_sma_slow: below(sma_fast, sma_slow),
            macd_below_signal: below(macd, macd_signal),
            macd_negative: below(macd, Some(0.0)),
            rsi_below_50: below(rsi, Some(50.0)),
        };

        let bear_share = bear_share(
            &frame.closes,
            &frame.sma_fast,
            &frame.macd.macd,
            self.params.bear_share_window,
        );

        let summary = RegimeSummary {
            date: frame.dates[last],
            close,
            sma_fast,
            sma_slow,
            rsi,
            macd,
            macd_signal,
            macd_hist,
            period_return,
            flags,
            bear_share,
        };

        debug!(
            date = %summary.date,
            close = format!("{:.6}", close),
            rsi = ?rsi.map(|v| format!("{:.2}", v)),
            macd = ?macd.map(|v| format!("{:.6}", v)),
            bearish = flags.count(),
            bear_share = ?bear_share.map(|v| format!("{:.3}", v)),
            "Regime scored"
        );

        Ok(summary)
    }
}

/// Score with the default parameters (SMA 50/200, RSI 14, MACD 12/26/9,
/// 20-bar return, 30-bar bear share, 210-bar floor).
pub fn score(closes: &[f64], dates: &[NaiveDate]) -> Result<RegimeSummary> {
    BearScorer::default().score(closes, dates)
}

// =============================================================================
// Condition helpers
// =============================================================================

/// `a < b` when both are defined, otherwise false.
fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// Share of the trailing `window` bars that close below the fast SMA while the
/// MACD line is negative, among bars where both are defined.
pub fn bear_share(
    closes: &[f64],
    sma_fast: &[Option<f64>],
    macd_line: &[Option<f64>],
    window: usize,
) -> Option<f64> {
    let start = closes.len().saturating_sub(window);

    let (bearish, defined) = (start..closes.len())
        .filter_map(|i| Some((closes[i], sma_fast.get(i).copied()??, macd_line.get(i).copied()??)))
        .fold((0usize, 0usize), |(bearish, defined), (close, sma, macd)| {
            let hit = close < sma && macd < 0.0;
            (bearish + usize::from(hit), defined + 1)
        });

    if defined == 0 {
        trace!(window, "bear share: no bar with both SMA and MACD defined");
        return None;
    }
    Some(bearish as f64 / defined as f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
    }

    fn bars_from(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .zip(dates(closes.len()))
            .map(|(&c, d)| Bar::new(d, c, c + 1.0, c - 1.0, c))
            .collect()
    }

    fn falling(n: usize) -> Vec<f64> {
        (0..n).map(|i| 200.0 - i as f64 * 0.5).collect()
    }

    // ---- scenarios -------------------------------------------------------

    #[test]
    fn flat_series_is_not_bearish() {
        let closes = vec![100.0; 210];
        let scorer = BearScorer::default();
        let frame = scorer.frame(&closes, &dates(210)).unwrap();

        for i in 199..210 {
            assert!((frame.sma_fast[i].unwrap() - 100.0).abs() < 1e-10);
            assert!((frame.sma_slow[i].unwrap() - 100.0).abs() < 1e-10);
        }
        for i in 14..210 {
            assert_eq!(frame.rsi[i], Some(100.0));
        }
        for v in &frame.macd.macd {
            assert!(v.unwrap().abs() < 1e-10);
        }

        let s = scorer.summarize(&frame).unwrap();
        assert_eq!(s.flags, BearFlags::default());
        assert_eq!(s.flags.count(), 0);
        assert_eq!(s.bear_share, Some(0.0));
        assert!(s.period_return.unwrap().abs() < 1e-12);
    }

    #[test]
    fn falling_series_is_bearish() {
        let closes = falling(210);
        let s = score(&closes, &dates(210)).unwrap();

        assert!(s.flags.price_below_sma_slow);
        assert!(s.flags.sma_fast_below_sma_slow);
        assert!(s.flags.macd_below_signal);
        assert!(s.flags.macd_negative);
        assert!(s.flags.rsi_below_50);
        assert_eq!(s.flags.count(), 5);
        assert_eq!(s.bear_share, Some(1.0));
        assert!(s.period_return.unwrap() < 0.0);
        assert_eq!(s.date, dates(210)[209]);
        assert!((s.close - (200.0 - 209.0 * 0.5)).abs() < 1e-10);
    }

    #[test]
    fn bounce_after_decline_flips_only_macd_signal() {
        // 210 falling bars, then three up days of +1: the MACD line crosses
        // above its slower signal (about -2.89 vs -3.31) but stays negative,
        // and RSI only recovers to about 33.
        let mut closes = falling(210);
        let last = *closes.last().unwrap();
        closes.extend([last + 1.0, last + 2.0, last + 3.0]);
        let s = score(&closes, &dates(closes.len())).unwrap();

        assert!(!s.flags.macd_below_signal);
        assert!(s.macd.unwrap() > s.macd_signal.unwrap());
        assert!(s.flags.price_below_sma_slow);
        assert!(s.flags.sma_fast_below_sma_slow);
        assert!(s.flags.macd_negative);
        assert!(s.flags.rsi_below_50);
        assert_eq!(s.flags.count(), 4);
    }

    #[test]
    fn misaligned_frame_is_rejected() {
        let scorer = BearScorer::default();
        let mut frame = scorer.frame(&[100.0; 220], &dates(220)).unwrap();
        frame.rsi.truncate(10);
        assert!(matches!(
            scorer.summarize(&frame),
            Err(IndicatorError::InvalidInput(_))
        ));

        let mut short = scorer.frame(&[100.0; 220], &dates(220)).unwrap();
        short.dates.truncate(200);
        short.closes.truncate(200);
        short.sma_fast.truncate(200);
        short.sma_slow.truncate(200);
        short.rsi.truncate(200);
        short.macd.macd.truncate(200);
        short.macd.signal.truncate(200);
        short.macd.histogram.truncate(200);
        assert_eq!(
            scorer.summarize(&short),
            Err(IndicatorError::InsufficientHistory {
                required: 210,
                actual: 200
            })
        );
    }

    #[test]
    fn one_bar_short_is_insufficient() {
        let closes = falling(209);
        assert_eq!(
            score(&closes, &dates(209)),
            Err(IndicatorError::InsufficientHistory {
                required: 210,
                actual: 209
            })
        );

        // the individual engines are fine on the same length
        assert!(sma(&closes, 200).unwrap()[208].is_some());
        assert!(rsi(&closes, 14).unwrap()[208].is_some());
        assert!(crate::indicators::ema(&closes, 26.0).is_ok());
        assert!(macd(&closes, 12, 26, 9).is_ok());
    }

    #[test]
    fn malformed_input_is_invalid() {
        assert!(matches!(score(&[], &[]), Err(IndicatorError::InvalidInput(_))));

        let mut closes = falling(220);
        closes[100] = f64::NAN;
        assert!(matches!(
            score(&closes, &dates(220)),
            Err(IndicatorError::InvalidInput(_))
        ));

        let mut bars = bars_from(&falling(220));
        bars.swap(10, 11);
        assert!(matches!(
            BearScorer::default().score_bars(&bars),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn analyze_returns_aligned_frame() {
        let closes: Vec<f64> = (0..260)
            .map(|i| 100.0 + (i as f64 * 0.11).sin() * 8.0)
            .collect();
        let bars = bars_from(&closes);
        let report = BearScorer::default().analyze(&bars).unwrap();

        assert_eq!(report.frame.len(), 260);
        assert_eq!(report.frame.sma_slow.len(), 260);
        assert_eq!(report.frame.rsi.len(), 260);
        assert_eq!(report.frame.macd.histogram.len(), 260);
        assert_eq!(report.summary.macd, report.frame.macd.macd[259]);
        assert_eq!(report.summary, BearScorer::default().score_bars(&bars).unwrap());
    }

    #[test]
    fn snapshot_hist_matches_line_minus_signal() {
        let closes: Vec<f64> = (0..230).map(|i| 50.0 + (i as f64 * 0.3).cos()).collect();
        let s = score(&closes, &dates(230)).unwrap();
        assert_eq!(s.macd_hist, Some(s.macd.unwrap() - s.macd_signal.unwrap()));
    }

    #[test]
    fn custom_params_are_validated() {
        let bad = IndicatorParams {
            sma_slow: 0,
            ..IndicatorParams::default()
        };
        assert!(BearScorer::new(bad).is_err());

        let short = IndicatorParams {
            sma_fast: 5,
            sma_slow: 10,
            min_history: 12,
            ..IndicatorParams::default()
        };
        let scorer = BearScorer::new(short).unwrap();
        let s = scorer.score(&falling(12), &dates(12)).unwrap();
        assert!(s.flags.sma_fast_below_sma_slow);
    }

    // ---- bear_share ------------------------------------------------------

    #[test]
    fn bear_share_no_data_is_none() {
        let closes = vec![1.0; 10];
        let undefined = vec![None; 10];
        let macd_line = vec![Some(-1.0); 10];
        assert_eq!(bear_share(&closes, &undefined, &macd_line, 30), None);
        assert_eq!(bear_share(&[], &[], &[], 30), None);
    }

    #[test]
    fn bear_share_counts_only_defined_bars() {
        let closes = vec![10.0, 10.0, 10.0, 10.0];
        let sma_fast = vec![None, Some(11.0), Some(11.0), Some(9.0)];
        let macd_line = vec![Some(-1.0), Some(-1.0), Some(1.0), Some(-1.0)];
        // defined at 1..=3; bearish only at 1
        let share = bear_share(&closes, &sma_fast, &macd_line, 30).unwrap();
        assert!((share - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bear_share_uses_trailing_window() {
        let closes = vec![10.0; 6];
        let sma_fast = vec![Some(11.0); 6];
        let macd_line = vec![Some(-1.0), Some(-1.0), Some(-1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(bear_share(&closes, &sma_fast, &macd_line, 3), Some(0.0));
        assert_eq!(bear_share(&closes, &sma_fast, &macd_line, 6), Some(0.5));
    }

    // ---- flags -----------------------------------------------------------

    #[test]
    fn undefined_operand_is_false() {
        assert!(!below(None, Some(1.0)));
        assert!(!below(Some(1.0), None));
        assert!(below(Some(1.0), Some(2.0)));
        assert!(!below(Some(2.0), Some(2.0)));
    }

    #[test]
    fn flag_count() {
        let flags = BearFlags {
            macd_negative: true,
            rsi_below_50: true,
            ..BearFlags::default()
        };
        assert_eq!(flags.count(), 2);
    }
}
