// src/audio/visualizer/scheduler.rs
//! Frame-rate capped scheduling of render passes.
//!
//! The host loop calls [`FrameScheduler::tick`] as often as it likes; the
//! scheduler decides which ticks become frames.

/// Timestamp of the last frame actually drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    /// Milliseconds of the last drawn frame, 0 before the first one.
    pub fn last_time(&self) -> f64 {
        self.last_time.unwrap_or(0.0)
    }

    /// Record `now` as a drawn frame if at least `interval` ms have passed.
    /// The first admitted frame is never throttled. Never moves backwards.
    fn admit(&mut self, now: f64, interval: f64) -> bool {
        if !now.is_finite() {
            return false;
        }
        match self.last_time {
            Some(last) if now - last < interval => false,
            _ => {
                self.last_time = Some(now);
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No frames are produced. Entered at startup, on pause and on teardown.
    Stopped,
    /// Every tick is considered for a frame.
    Running,
}

/// Outcome of a single host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Scheduler is stopped.
    Idle,
    /// Too soon after the previous frame.
    Throttled,
    /// Draw a frame now.
    Render,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    clock: FrameClock,
    /// Minimum spacing between frames in milliseconds
    frame_interval: f64,
}

impl FrameScheduler {
    /// `target_fps` must be positive (enforced by config validation).
    pub fn new(target_fps: f64) -> Self {
        Self {
            state: SchedulerState::Stopped,
            clock: FrameClock::default(),
            frame_interval: 1000.0 / target_fps,
        }
    }

    pub fn start(&mut self) {
        if self.state == SchedulerState::Stopped {
            tracing::debug!("frame scheduler started");
            self.state = SchedulerState::Running;
        }
    }

    /// The clock is kept, so a restart is still spaced from the last frame.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            tracing::debug!(last_frame_ms = self.clock.last_time(), "frame scheduler stopped");
            self.state = SchedulerState::Stopped;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    /// Handle a host tick at `now` milliseconds.
    pub fn tick(&mut self, now: f64) -> FrameDecision {
        match self.state {
            SchedulerState::Stopped => FrameDecision::Idle,
            SchedulerState::Running if self.clock.admit(now, self.frame_interval) => {
                FrameDecision::Render
            }
            SchedulerState::Running => FrameDecision::Throttled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped() {
        let mut scheduler = FrameScheduler::new(12.0);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.tick(0.0), FrameDecision::Idle);
        assert_eq!(scheduler.tick(500.0), FrameDecision::Idle);
        assert_eq!(scheduler.clock().last_time(), 0.0);
    }

    #[test]
    fn test_throttle_gate_at_12_fps() {
        let mut scheduler = FrameScheduler::new(12.0);
        scheduler.start();
        assert_eq!(scheduler.tick(0.0), FrameDecision::Render);
        assert_eq!(scheduler.tick(50.0), FrameDecision::Throttled);
        assert_eq!(scheduler.tick(100.0), FrameDecision::Render);
        assert_eq!(scheduler.clock().last_time(), 100.0);
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_exact_interval_renders() {
        let mut scheduler = FrameScheduler::new(10.0);
        scheduler.start();
        assert_eq!(scheduler.tick(1000.0), FrameDecision::Render);
        assert_eq!(scheduler.tick(1099.0), FrameDecision::Throttled);
        assert_eq!(scheduler.tick(1100.0), FrameDecision::Render);
    }

    #[test]
    fn test_stop_halts_frames_and_restart_is_throttled() {
        let mut scheduler = FrameScheduler::new(12.0);
        scheduler.start();
        assert_eq!(scheduler.tick(0.0), FrameDecision::Render);

        scheduler.stop();
        assert_eq!(scheduler.tick(200.0), FrameDecision::Idle);
        assert_eq!(scheduler.clock().last_time(), 0.0);

        scheduler.start();
        assert_eq!(scheduler.tick(40.0), FrameDecision::Throttled);
        assert_eq!(scheduler.tick(300.0), FrameDecision::Render);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut scheduler = FrameScheduler::new(12.0);
        scheduler.start();
        assert_eq!(scheduler.tick(500.0), FrameDecision::Render);
        assert_eq!(scheduler.tick(100.0), FrameDecision::Throttled);
        assert_eq!(scheduler.tick(f64::NAN), FrameDecision::Throttled);
        assert_eq!(scheduler.clock().last_time(), 500.0);
    }

    #[test]
    fn test_frame_interval() {
        let scheduler = FrameScheduler::new(12.0);
        assert!((scheduler.frame_interval() - 83.333_333).abs() < 1e-3);
    }
}
