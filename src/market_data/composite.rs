// =============================================================================
// Equal-weight Composite Index
// =============================================================================
//
// Collapses several instruments into one market proxy by averaging open, high,
// low and close per date across every component that has a bar on that date.
// The result can be scored like any single instrument.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::Bar;

#[derive(Debug, Default, Clone, Copy)]
struct Sums {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    count: usize,
}

/// Average OHLC per date across `components`, ascending by date.
pub fn composite_index(components: &[Vec<Bar>]) -> Vec<Bar> {
    let mut by_date: BTreeMap<NaiveDate, Sums> = BTreeMap::new();

    for bar in components.iter().flatten() {
        let s = by_date.entry(bar.date).or_default();
        s.open += bar.open;
        s.high += bar.high;
        s.low += bar.low;
        s.close += bar.close;
        s.count += 1;
    }

    by_date
        .into_iter()
        .map(|(date, s)| {
            let n = s.count as f64;
            Bar::new(date, s.open / n, s.high / n, s.low / n, s.close / n)
        })
        .collect()
}
