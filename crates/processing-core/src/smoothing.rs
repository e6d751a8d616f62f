//! Adaptive fingertip smoothing.
//!
//! A 1-euro style filter: an exponential low-pass whose cutoff rises with
//! the estimated speed of the signal. At rest the cutoff sits at
//! `min_cutoff` and jitter is suppressed; during fast strokes the cutoff
//! opens up and lag stays low.
//!
//! Only the drawing control point is filtered, never the whole skeleton.

use std::f64::consts::PI;

use airsketch_common::config::FilterConfig;
use airsketch_sketch_model::geometry::Point2D;

/// Smoothing factor for an exponential low-pass at `cutoff` Hz sampled
/// every `dt` seconds: `1 / (1 + tau / dt)` with `tau = 1 / (2*pi*cutoff)`.
pub fn smoothing_factor(dt: f64, cutoff: f64) -> f64 {
    let tau = 1.0 / (2.0 * PI * cutoff);
    1.0 / (1.0 + tau / dt)
}

/// Per-axis filter memory. Absent until the first sample.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FilterState {
    last_raw: f64,
    last_filtered: f64,
    last_derivative: f64,
    last_secs: f64,
}

/// One-dimensional adaptive low-pass filter.
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    params: FilterConfig,
    state: Option<FilterState>,
}

impl OneEuroFilter {
    pub fn new(params: FilterConfig) -> Self {
        Self {
            params,
            state: None,
        }
    }

    /// Filter one sample taken at `t_secs`.
    ///
    /// The first sample passes through unchanged and seeds the state.
    /// The sample interval is floored at `min_dt_secs` so duplicate or
    /// reordered timestamps cannot blow up the derivative.
    pub fn filter(&mut self, t_secs: f64, raw: f64) -> f64 {
        let Some(prev) = self.state else {
            self.state = Some(FilterState {
                last_raw: raw,
                last_filtered: raw,
                last_derivative: 0.0,
                last_secs: t_secs,
            });
            return raw;
        };

        let dt = (t_secs - prev.last_secs).max(self.params.min_dt_secs);

        let derivative = (raw - prev.last_raw) / dt;
        let a_d = smoothing_factor(dt, self.params.d_cutoff);
        let smoothed_derivative = a_d * derivative + (1.0 - a_d) * prev.last_derivative;

        let cutoff = self.params.min_cutoff + self.params.beta * smoothed_derivative.abs();
        let alpha = smoothing_factor(dt, cutoff);
        let filtered = alpha * raw + (1.0 - alpha) * prev.last_filtered;

        self.state = Some(FilterState {
            last_raw: raw,
            last_filtered: filtered,
            last_derivative: smoothed_derivative,
            last_secs: t_secs.max(prev.last_secs),
        });

        filtered
    }

    /// Whether a sample has been seen since creation or the last reset.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Last filtered value, if any.
    pub fn last(&self) -> Option<f64> {
        self.state.map(|s| s.last_filtered)
    }

    /// Forget all history; the next sample passes through unfiltered.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn params(&self) -> &FilterConfig {
        &self.params
    }
}

/// Independent filters for the x and y axes of one control point.
#[derive(Debug, Clone)]
pub struct PointSmoother {
    x: OneEuroFilter,
    y: OneEuroFilter,
}

impl PointSmoother {
    pub fn new(params: FilterConfig) -> Self {
        Self {
            x: OneEuroFilter::new(params),
            y: OneEuroFilter::new(params),
        }
    }

    pub fn smooth(&mut self, t_secs: f64, point: Point2D) -> Point2D {
        Point2D::new(self.x.filter(t_secs, point.x), self.y.filter(t_secs, point.y))
    }

    pub fn is_initialized(&self) -> bool {
        self.x.is_initialized()
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

impl Default for PointSmoother {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 30.0;

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = OneEuroFilter::new(FilterConfig::default());
        assert!(!filter.is_initialized());
        assert_eq!(filter.filter(0.0, 123.0), 123.0);
        assert!(filter.is_initialized());
    }

    #[test]
    fn test_converges_under_constant_input() {
        let mut smoother = PointSmoother::default();
        smoother.smooth(0.0, Point2D::new(0.0, 0.0));

        let target = Point2D::new(100.0, 50.0);
        let mut out = Point2D::new(0.0, 0.0);
        for i in 1..=60 {
            out = smoother.smooth(i as f64 * FRAME, target);
        }
        assert!(out.distance_to(&target) < 0.01, "got {out:?}");
    }

    #[test]
    fn test_constant_input_from_start_is_exact() {
        let mut filter = OneEuroFilter::new(FilterConfig::default());
        for i in 0..10 {
            assert!((filter.filter(i as f64 * FRAME, 42.0) - 42.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reduces_jitter() {
        let mut filter = OneEuroFilter::new(FilterConfig::default());
        let raw = [320.0, 326.0, 315.0, 324.0, 317.0, 323.0, 318.0, 322.0];
        let mut filtered = Vec::new();
        for (i, x) in raw.iter().enumerate() {
            filtered.push(filter.filter(i as f64 * FRAME, *x));
        }
        let spread = |v: &[f64]| {
            let max = v.iter().copied().fold(f64::MIN, f64::max);
            let min = v.iter().copied().fold(f64::MAX, f64::min);
            max - min
        };
        assert!(spread(&filtered[2..]) < spread(&raw[2..]) / 2.0);
    }

    #[test]
    fn test_higher_beta_tracks_fast_motion_closer() {
        let run = |beta: f64| {
            let mut filter = OneEuroFilter::new(FilterConfig {
                beta,
                ..FilterConfig::default()
            });
            let mut last = 0.0;
            for i in 0..10 {
                last = filter.filter(i as f64 * FRAME, i as f64 * 30.0);
            }
            (270.0 - last).abs()
        };
        assert!(run(0.5) < run(0.0));
    }

    #[test]
    fn test_duplicate_timestamp_is_finite() {
        let mut filter = OneEuroFilter::new(FilterConfig::default());
        filter.filter(1.0, 10.0);
        let out = filter.filter(1.0, 20.0);
        assert!(out.is_finite());
        assert!(out > 10.0 && out <= 20.0);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut smoother = PointSmoother::default();
        smoother.smooth(0.0, Point2D::new(10.0, 10.0));
        smoother.smooth(FRAME, Point2D::new(11.0, 11.0));
        smoother.reset();
        assert!(!smoother.is_initialized());
        assert_eq!(
            smoother.smooth(2.0 * FRAME, Point2D::new(50.0, 50.0)),
            Point2D::new(50.0, 50.0)
        );
    }

    #[test]
    fn test_smoothing_factor_bounds() {
        let a = smoothing_factor(FRAME, 1.0);
        assert!(a > 0.0 && a < 1.0);
        assert!(smoothing_factor(FRAME, 100.0) > a);
    }
}
