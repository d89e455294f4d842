//! Incremental indicator engine.
//!
//! Each call to [`IndicatorEngine::update`] appends one bar and extends every
//! series by exactly one value. Positions in the series are 0-based counts of
//! bars seen, independent of `Bar::index`.

use super::crossover::cross_above;
use super::sma::window_mean;
use crate::config::CycleBottomParams;
use crate::domain::Bar;

/// Aligned per-bar series. Undefined values are stored as NaN and surface as
/// `None` through the accessors.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSeries {
    close: Vec<f64>,
    low: Vec<f64>,
    average: Vec<f64>,
    lower_envelope: Vec<f64>,
    cross_up: Vec<f64>,
    cross_down: Vec<f64>,
}

impl IndicatorSeries {
    /// Number of bars seen.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Position of the most recent bar.
    pub fn last_pos(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn close(&self, pos: usize) -> Option<f64> {
        defined(&self.close, pos)
    }

    pub fn low(&self, pos: usize) -> Option<f64> {
        defined(&self.low, pos)
    }

    pub fn average(&self, pos: usize) -> Option<f64> {
        defined(&self.average, pos)
    }

    pub fn lower_envelope(&self, pos: usize) -> Option<f64> {
        defined(&self.lower_envelope, pos)
    }

    /// 1.0 when close crossed above the average at `pos`, else 0.0.
    pub fn cross_up(&self, pos: usize) -> Option<f64> {
        defined(&self.cross_up, pos)
    }

    /// 1.0 when the average crossed above close at `pos`, else 0.0.
    pub fn cross_down(&self, pos: usize) -> Option<f64> {
        defined(&self.cross_down, pos)
    }

    pub fn average_series(&self) -> &[f64] {
        &self.average
    }

    pub fn lower_envelope_series(&self) -> &[f64] {
        &self.lower_envelope
    }

    pub fn cross_up_series(&self) -> &[f64] {
        &self.cross_up
    }

    pub fn cross_down_series(&self) -> &[f64] {
        &self.cross_down
    }
}

fn defined(series: &[f64], pos: usize) -> Option<f64> {
    series.get(pos).copied().filter(|v| !v.is_nan())
}

/// Rolling state that turns a stream of bars into an [`IndicatorSeries`].
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    period: usize,
    envelope_factor: f64,
    series: IndicatorSeries,
}

impl IndicatorEngine {
    pub fn new(period: usize, envelope_pct: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            envelope_factor: 1.0 - envelope_pct / 100.0,
            series: IndicatorSeries::default(),
        }
    }

    pub fn from_params(params: &CycleBottomParams) -> Self {
        Self::new(params.cycle_length, params.envelope_pct)
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn series(&self) -> &IndicatorSeries {
        &self.series
    }

    /// Append one bar and extend every series. Returns the bar's position.
    ///
    /// Callers must not feed void bars; a NaN close poisons every window it sits in.
    pub fn update(&mut self, bar: &Bar) -> usize {
        debug_assert!(!bar.is_void(), "void bar fed to indicator engine");
        let s = &mut self.series;
        let pos = s.close.len();

        s.close.push(bar.close);
        s.low.push(bar.low);

        let average = if pos + 1 >= self.period {
            window_mean(&s.close[(pos + 1 - self.period)..=pos])
        } else {
            f64::NAN
        };
        s.average.push(average);
        s.lower_envelope.push(average * self.envelope_factor);

        let (up, down) = if pos == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let prev_close = s.close[pos - 1];
            let prev_avg = s.average[pos - 1];
            (
                cross_above(prev_close, prev_avg, bar.close, average),
                cross_above(prev_avg, prev_close, average, bar.close),
            )
        };
        s.cross_up.push(up);
        s.cross_down.push(down);

        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{
        crossover_signs, make_bars, Indicator, LowerEnvelope, Sma,
    };

    fn feed(engine: &mut IndicatorEngine, bars: &[Bar]) {
        for bar in bars {
            engine.update(bar);
        }
    }

    fn same(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn average_undefined_until_period() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let mut engine = IndicatorEngine::new(3, 2.0);
        feed(&mut engine, &bars);
        let s = engine.series();
        assert_eq!(s.len(), 4);
        assert_eq!(s.average(0), None);
        assert_eq!(s.average(1), None);
        assert_eq!(s.average(2), Some(11.0));
        assert_eq!(s.average(3), Some(12.0));
        assert_eq!(s.lower_envelope(2), Some(11.0 * 0.98));
    }

    #[test]
    fn out_of_range_positions_are_undefined() {
        let engine = IndicatorEngine::new(3, 2.0);
        assert!(engine.series().is_empty());
        assert_eq!(engine.series().last_pos(), None);
        assert_eq!(engine.series().close(0), None);
    }

    #[test]
    fn cross_signs_need_two_defined_averages() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 103.0]);
        let mut engine = IndicatorEngine::new(3, 2.0);
        feed(&mut engine, &bars);
        let s = engine.series();
        // First defined average at pos 2; pos 2 has no defined predecessor.
        assert_eq!(s.cross_up(2), None);
        // close 103 > avg 101 after close 100 <= avg 100.
        assert_eq!(s.cross_up(3), Some(1.0));
        assert_eq!(s.cross_down(3), Some(0.0));
    }

    #[test]
    fn cross_down_when_average_rises_above_close() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 97.0]);
        let mut engine = IndicatorEngine::new(3, 2.0);
        feed(&mut engine, &bars);
        assert_eq!(engine.series().cross_down(3), Some(1.0));
        assert_eq!(engine.series().cross_up(3), Some(0.0));
    }

    #[test]
    fn incremental_matches_batch_indicators() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.17).sin() * 6.0 + (i as f64 * 0.031).cos())
            .collect();
        let bars = make_bars(&closes);
        let mut engine = IndicatorEngine::new(20, 2.5);
        feed(&mut engine, &bars);
        let s = engine.series();

        let sma = Sma::new(20).compute(&bars);
        let env = LowerEnvelope::new(20, 2.5).compute(&bars);
        assert!(same(s.average_series(), &sma));
        assert!(same(s.lower_envelope_series(), &env));
        assert!(same(s.cross_up_series(), &crossover_signs(&closes, &sma)));
        assert!(same(s.cross_down_series(), &crossover_signs(&sma, &closes)));
    }

    #[test]
    fn values_never_depend_on_later_bars() {
        let closes: Vec<f64> = (0..120).map(|i| 50.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let bars = make_bars(&closes);

        let mut full = IndicatorEngine::new(10, 1.0);
        feed(&mut full, &bars);
        let mut truncated = IndicatorEngine::new(10, 1.0);
        feed(&mut truncated, &bars[..70]);

        let n = truncated.series().len();
        assert!(same(
            &full.series().average_series()[..n],
            truncated.series().average_series()
        ));
        assert!(same(
            &full.series().cross_up_series()[..n],
            truncated.series().cross_up_series()
        ));
    }

    #[test]
    fn average_is_exact_once_outlier_leaves() {
        let bars = make_bars(&[0.1, 0.2, 0.3, 1e6 + 0.7, 0.3, 100.0, 100.0, 100.0]);
        let mut engine = IndicatorEngine::new(3, 2.0);
        feed(&mut engine, &bars);
        assert_eq!(engine.series().average(7), Some(100.0));
        assert_eq!(engine.series().lower_envelope(7), Some(100.0 * 0.98));
    }

    #[test]
    fn from_params_uses_cycle_length() {
        let engine = IndicatorEngine::from_params(&CycleBottomParams::default());
        assert_eq!(engine.period(), 40);
    }
}
