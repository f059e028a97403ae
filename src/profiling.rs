//! Frame metrics for the compositing loop.
//!
//! Records how long each composition pass took, how many draw commands the
//! surface executed and how many hotspots were registered. Min/max and a
//! moving average are kept for compose time, and a summary is logged at
//! `debug!` every [`METRICS_LOG_INTERVAL`] frames.
//!
//! # Usage
//!
//! ```ignore
//! let mut metrics = FrameMetrics::new();
//!
//! let started = Instant::now();
//! let composed = renderer.compose(&screen, &mut widgets, &ctx);
//! let executed = renderer.present(surface);
//! metrics.record_frame(started.elapsed(), executed, composed.hotspots);
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::METRICS_LOG_INTERVAL;

// =============================================================================
// Frame Metrics
// =============================================================================

/// Per-frame compositing statistics.
pub struct FrameMetrics {
    // Last frame
    /// Time spent composing and presenting
    pub compose_time_us: u32,
    /// Commands executed by the surface
    pub commands: usize,
    /// Hotspots registered by widgets
    pub hotspots: usize,

    // Statistics
    pub compose_time_min_us: u32,
    pub compose_time_max_us: u32,
    compose_time_avg_us: f32,
    commands_max: usize,

    // Counters
    /// Frames composed since startup
    pub total_frames: u64,
    /// Ticks that had nothing to redraw
    pub idle_ticks: u64,

    start_time: Instant,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            compose_time_us: 0,
            commands: 0,
            hotspots: 0,
            compose_time_min_us: u32::MAX,
            compose_time_max_us: 0,
            compose_time_avg_us: 0.0,
            commands_max: 0,
            total_frames: 0,
            idle_ticks: 0,
            start_time: Instant::now(),
        }
    }

    /// Exponential moving average alpha.
    const EMA_ALPHA: f32 = 0.1;

    /// Record one composed frame.
    pub fn record_frame(&mut self, compose_time: Duration, commands: usize, hotspots: usize) {
        let compose_us = u32::try_from(compose_time.as_micros()).unwrap_or(u32::MAX);

        self.compose_time_us = compose_us;
        self.commands = commands;
        self.hotspots = hotspots;

        self.compose_time_min_us = self.compose_time_min_us.min(compose_us);
        self.compose_time_max_us = self.compose_time_max_us.max(compose_us);
        self.commands_max = self.commands_max.max(commands);

        if self.total_frames == 0 {
            self.compose_time_avg_us = compose_us as f32;
        } else {
            self.compose_time_avg_us =
                Self::EMA_ALPHA.mul_add(compose_us as f32, (1.0 - Self::EMA_ALPHA) * self.compose_time_avg_us);
        }

        self.total_frames += 1;
        if self.total_frames % METRICS_LOG_INTERVAL == 0 {
            self.log_summary();
        }
    }

    /// Count a tick that did not recompose.
    #[inline]
    pub const fn record_idle(&mut self) {
        self.idle_ticks += 1;
    }

    #[inline]
    pub const fn compose_time_avg_us(&self) -> u32 {
        self.compose_time_avg_us as u32
    }

    #[inline]
    pub const fn commands_max(&self) -> usize {
        self.commands_max
    }

    #[inline]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn log_summary(&self) {
        debug!(
            frames = self.total_frames,
            idle = self.idle_ticks,
            avg_us = self.compose_time_avg_us(),
            min_us = self.compose_time_min_us,
            max_us = self.compose_time_max_us,
            commands = self.commands,
            commands_max = self.commands_max,
            hotspots = self.hotspots,
            uptime_s = self.uptime().as_secs(),
            "frame metrics"
        );
    }
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_metrics_new() {
        let metrics = FrameMetrics::new();
        assert_eq!(metrics.total_frames, 0);
        assert_eq!(metrics.compose_time_us, 0);
        assert_eq!(metrics.compose_time_min_us, u32::MAX);
        assert_eq!(metrics.compose_time_max_us, 0);
    }

    #[test]
    fn test_record_frame() {
        let mut metrics = FrameMetrics::new();
        metrics.record_frame(Duration::from_micros(20000), 120, 14);

        assert_eq!(metrics.total_frames, 1);
        assert_eq!(metrics.compose_time_us, 20000);
        assert_eq!(metrics.commands, 120);
        assert_eq!(metrics.hotspots, 14);
        assert_eq!(metrics.compose_time_avg_us(), 20000, "first frame seeds the average");
    }

    #[test]
    fn test_min_max_and_average() {
        let mut metrics = FrameMetrics::new();
        metrics.record_frame(Duration::from_micros(20000), 100, 10);
        metrics.record_frame(Duration::from_micros(15000), 300, 10);
        metrics.record_frame(Duration::from_micros(25000), 200, 10);

        assert_eq!(metrics.compose_time_min_us, 15000);
        assert_eq!(metrics.compose_time_max_us, 25000);
        assert_eq!(metrics.commands_max(), 300);
        let avg = metrics.compose_time_avg_us();
        assert!((15000..25000).contains(&avg), "average {avg} stays between the extremes");
    }

    #[test]
    fn test_idle_ticks_do_not_count_as_frames() {
        let mut metrics = FrameMetrics::new();
        metrics.record_idle();
        metrics.record_idle();
        assert_eq!(metrics.idle_ticks, 2);
        assert_eq!(metrics.total_frames, 0);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let mut metrics = FrameMetrics::new();
        metrics.record_frame(Duration::from_secs(u64::from(u32::MAX)), 0, 0);
        assert_eq!(metrics.compose_time_us, u32::MAX);
    }
}
