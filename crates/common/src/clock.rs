//! Session clock and frame-rate measurement.
//!
//! Filter timestamps are seconds relative to a monotonic epoch captured at
//! session start. The FPS figure shown by the GUI is derived from the same
//! clock.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Frames-per-second meter fed with the timestamp of each processed frame.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    last_secs: Option<f64>,
    instantaneous: f64,
    smoothed: f64,
    /// Weight of the newest sample in the display average.
    smoothing: f64,
}

impl FpsMeter {
    /// Create a meter. `smoothing` is clamped to `(0, 1]`; 1.0 disables averaging.
    pub fn new(smoothing: f64) -> Self {
        Self {
            last_secs: None,
            instantaneous: 0.0,
            smoothed: 0.0,
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
        }
    }

    /// Record a frame at `now_secs` and return the smoothed FPS.
    ///
    /// The first call yields 0. A non-increasing timestamp yields an
    /// instantaneous rate of 0 and leaves the average untouched.
    pub fn tick(&mut self, now_secs: f64) -> f64 {
        let Some(last) = self.last_secs.replace(now_secs) else {
            return 0.0;
        };

        let dt = now_secs - last;
        if dt <= 0.0 {
            self.instantaneous = 0.0;
            return self.smoothed;
        }

        self.instantaneous = 1.0 / dt;
        self.smoothed = if self.smoothed == 0.0 {
            self.instantaneous
        } else {
            self.smoothing * self.instantaneous + (1.0 - self.smoothing) * self.smoothed
        };
        self.smoothed
    }

    /// Smoothed FPS for display.
    pub fn fps(&self) -> f64 {
        self.smoothed
    }

    /// Unsmoothed rate from the last two ticks.
    pub fn instantaneous(&self) -> f64 {
        self.instantaneous
    }

    pub fn reset(&mut self) {
        self.last_secs = None;
        self.instantaneous = 0.0;
        self.smoothed = 0.0;
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(0.2)
    }
}
