// =============================================================================
// Runtime Configuration - indicator parameters and run settings
// =============================================================================
//
// Every tunable window and threshold of the regime scorer lives here, next to
// the settings of the command-line runner (data file, look-back window,
// output format).
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IndicatorError;
use crate::indicators::macd::{DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW};
use crate::indicators::roc::DEFAULT_RETURN_LOOKBACK;
use crate::indicators::rsi::DEFAULT_RSI_PERIOD;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_fast() -> usize {
    50
}

fn default_sma_slow() -> usize {
    200
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

fn default_macd_fast() -> usize {
    DEFAULT_MACD_FAST
}

fn default_macd_slow() -> usize {
    DEFAULT_MACD_SLOW
}

fn default_macd_signal() -> usize {
    DEFAULT_MACD_SIGNAL
}

fn default_return_lookback() -> usize {
    DEFAULT_RETURN_LOOKBACK
}

fn default_bear_share_window() -> usize {
    30
}

fn default_min_history() -> usize {
    210
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/daily_bars.csv")
}

fn default_lookback_days() -> u32 {
    3 * 365
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Windows and periods used by the regime scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Short SMA window (price-vs-trend and bear-share checks).
    #[serde(default = "default_sma_fast")]
    pub sma_fast: usize,

    /// Long SMA window (death-cross and price-below-trend checks).
    #[serde(default = "default_sma_slow")]
    pub sma_slow: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Bars between the two closes of the headline return.
    #[serde(default = "default_return_lookback")]
    pub return_lookback: usize,

    /// Trailing bars inspected for the bear share.
    #[serde(default = "default_bear_share_window")]
    pub bear_share_window: usize,

    /// Minimum bars the scorer accepts. Must cover `sma_slow`.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: default_sma_fast(),
            sma_slow: default_sma_slow(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            return_lookback: default_return_lookback(),
            bear_share_window: default_bear_share_window(),
            min_history: default_min_history(),
        }
    }
}

impl IndicatorParams {
    /// Reject zero windows and a history floor that cannot fill the long SMA.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let windows = [
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("return_lookback", self.return_lookback),
            ("bear_share_window", self.bear_share_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(IndicatorError::invalid_parameter(name, 0.0));
            }
        }
        if self.min_history < self.sma_slow {
            return Err(IndicatorError::invalid_parameter(
                "min_history",
                self.min_history as f64,
            ));
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the `bear-regime` runner.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// CSV file with `Date,Open,High,Low,Close` rows.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Only bars within this many calendar days of today are scored.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Print the summary as JSON instead of the text report.
    #[serde(default)]
    pub emit_json: bool,

    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            lookback_days: default_lookback_days(),
            emit_json: false,
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .indicator_params
            .validate()
            .with_context(|| format!("invalid indicator params in {}", path.display()))?;

        info!(
            path = %path.display(),
            data_file = %config.data_file.display(),
            lookback_days = config.lookback_days,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
