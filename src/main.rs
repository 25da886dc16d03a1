// =============================================================================
// bear-regime - Main Entry Point
// =============================================================================
//
// Loads daily bars from CSV, keeps the configured trailing window, scores the
// bearish regime and prints the summary (text or JSON).
// =============================================================================

use anyhow::Context;
use chrono::{Days, Local};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bear_regime::market_data::{load_bars, trim_to_lookback};
use bear_regime::regime::{regime_performance, BearScorer};
use bear_regime::report::{render_performance, render_summary};
use bear_regime::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("REGIME_CONFIG").unwrap_or_else(|_| "runtime_config.json".to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(path) = std::env::var("REGIME_DATA_FILE") {
        config.data_file = path.into();
    }

    // ── 2. Load bars ─────────────────────────────────────────────────────
    let bars = load_bars(&config.data_file)?;
    let today = Local::now().date_naive();
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(config.lookback_days)))
        .context("lookback window reaches before the supported date range")?;
    let bars = trim_to_lookback(bars, cutoff);

    info!(
        file = %config.data_file.display(),
        bars = bars.len(),
        cutoff = %cutoff,
        "Bars loaded"
    );

    // ── 3. Score ─────────────────────────────────────────────────────────
    let scorer = BearScorer::new(config.indicator_params.clone())?;
    let report = scorer.analyze(&bars).with_context(|| {
        format!(
            "cannot score {} bars from {}",
            bars.len(),
            config.data_file.display()
        )
    })?;

    if config.emit_json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print!("{}", render_summary(&report.summary, scorer.params()));
    }

    // ── 4. Trend regime split ────────────────────────────────────────────
    let regimes = report.frame.trend_regimes();
    let perf = regime_performance(&report.frame.closes, &regimes)?;
    info!("{}", render_performance(&perf));

    Ok(())
}
