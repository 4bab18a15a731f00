use std::path::PathBuf;
use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames should animate continuously,
/// be evaluated at a fixed timestamp, or be exported to disk.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Present a single still frame at an optional timestamp.
    Still {
        /// Specific timestamp to evaluate the animation at (seconds).
        time: Option<f32>,
    },
    /// Render a frame and write the result to disk.
    Export {
        /// Specific timestamp to evaluate the animation at (seconds).
        time: Option<f32>,
        /// Destination path for the exported file.
        path: PathBuf,
        /// Output format the user requested.
        format: ExportFormat,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// File formats supported by the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Bmp,
}

/// Throttles redraw requests to an optional FPS cap.
///
/// With no cap every request passes through and the compositor's redraw
/// delivery is the only pacing.
#[derive(Debug)]
pub struct FrameLimiter {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            interval,
            next_deadline: None,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.next_deadline) {
            (Some(_), Some(deadline)) => now >= deadline,
            _ => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.next_deadline = self.interval.map(|interval| now + interval);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    pub fn reset(&mut self) {
        self.next_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_limiter_is_always_ready() {
        let mut limiter = FrameLimiter::new(None);
        let now = Instant::now();
        assert!(limiter.ready_for_frame(now));
        limiter.mark_rendered(now);
        assert!(limiter.ready_for_frame(now));
        assert_eq!(limiter.next_deadline(), None);
    }

    #[test]
    fn capped_limiter_waits_out_the_interval() {
        let mut limiter = FrameLimiter::new(Some(10.0));
        let now = Instant::now();
        assert!(limiter.ready_for_frame(now));
        limiter.mark_rendered(now);
        assert!(!limiter.ready_for_frame(now + Duration::from_millis(50)));
        assert!(limiter.ready_for_frame(now + Duration::from_millis(100)));
    }

    #[test]
    fn zero_fps_cap_means_uncapped() {
        let mut limiter = FrameLimiter::new(Some(0.0));
        let now = Instant::now();
        limiter.mark_rendered(now);
        assert!(limiter.ready_for_frame(now));
    }

    #[test]
    fn reset_clears_the_pending_deadline() {
        let mut limiter = FrameLimiter::new(Some(60.0));
        let now = Instant::now();
        limiter.mark_rendered(now);
        assert!(limiter.next_deadline().is_some());
        limiter.reset();
        assert!(limiter.ready_for_frame(now));
    }
}
