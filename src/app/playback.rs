// src/app/playback.rs
//! Time display and seek arithmetic for the playback controls.

use std::time::Duration;

use crate::audio::Visualizer;

/// Format seconds as `m:ss` (minutes unpadded, seconds zero-padded).
/// Negative or non-finite input shows as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Position as a percentage of the duration, in [0, 100].
/// Unknown or zero durations report 0.
pub fn progress_percent(position: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(d) if !d.is_zero() => {
            (position.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Map a 0-100 control value onto a position within `duration`.
pub fn seek_target(percent: f64, duration: Duration) -> Duration {
    let fraction = if percent.is_finite() {
        percent.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    duration.mul_f64(fraction)
}

/// Move `position` by `delta_secs`, staying within `[0, duration]`.
pub fn nudge(position: Duration, delta_secs: f64, duration: Option<Duration>) -> Duration {
    let target = (position.as_secs_f64() + delta_secs).max(0.0);
    let target = match duration {
        Some(d) => target.min(d.as_secs_f64()),
        None => target,
    };
    Duration::from_secs_f64(target)
}

/// Run the frame scheduler only while a track plays unpaused.
///
/// Returns true when the scheduler was started or stopped.
pub fn sync_scheduler(playing: bool, paused: bool, visualizer: &mut Visualizer) -> bool {
    let should_run = playing && !paused;
    if should_run == visualizer.is_running() {
        return false;
    }
    if should_run {
        visualizer.start();
    } else {
        visualizer.stop();
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ringbuf::HeapRb;

    use super::*;
    use crate::audio::visualizer::{FrameDecision, RecordingSurface};
    use crate::audio::Analyser;
    use crate::config::VisualizerConfig;

    fn visualizer() -> Visualizer {
        let analyser = Analyser::new(Arc::new(Mutex::new(HeapRb::<f32>::new(2048))), 2048);
        Visualizer::new(&VisualizerConfig::default(), analyser).unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.99), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.9), "10:00");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_progress_percent() {
        let d = Some(Duration::from_secs(200));
        assert_eq!(progress_percent(Duration::from_secs(50), d), 25.0);
        assert_eq!(progress_percent(Duration::from_secs(400), d), 100.0);
        assert_eq!(progress_percent(Duration::from_secs(50), None), 0.0);
        assert_eq!(progress_percent(Duration::from_secs(50), Some(Duration::ZERO)), 0.0);
    }

    #[test]
    fn test_seek_target() {
        let d = Duration::from_secs(200);
        assert_eq!(seek_target(0.0, d), Duration::ZERO);
        assert_eq!(seek_target(50.0, d), Duration::from_secs(100));
        assert_eq!(seek_target(100.0, d), d);
        assert_eq!(seek_target(150.0, d), d);
        assert_eq!(seek_target(-10.0, d), Duration::ZERO);
        assert_eq!(seek_target(f64::NAN, d), Duration::ZERO);
    }

    #[test]
    fn test_nudge_is_clamped() {
        let d = Some(Duration::from_secs(60));
        assert_eq!(nudge(Duration::from_secs(10), 5.0, d), Duration::from_secs(15));
        assert_eq!(nudge(Duration::from_secs(3), -5.0, d), Duration::ZERO);
        assert_eq!(nudge(Duration::from_secs(58), 5.0, d), Duration::from_secs(60));
        assert_eq!(nudge(Duration::from_secs(58), 5.0, None), Duration::from_secs(63));
    }

    #[test]
    fn test_play_starts_frames() {
        let mut vis = visualizer();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        assert!(sync_scheduler(true, false, &mut vis));
        assert_eq!(vis.on_tick(0.0, &mut surface), FrameDecision::Render);
        // Already running: nothing to do
        assert!(!sync_scheduler(true, false, &mut vis));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut vis = visualizer();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        sync_scheduler(true, false, &mut vis);
        vis.on_tick(0.0, &mut surface);

        assert!(sync_scheduler(true, true, &mut vis));
        assert_eq!(vis.on_tick(500.0, &mut surface), FrameDecision::Idle);
        assert_eq!(surface.clears.len(), 1);

        assert!(sync_scheduler(true, false, &mut vis));
        assert_eq!(vis.on_tick(1000.0, &mut surface), FrameDecision::Render);
        assert_eq!(surface.clears.len(), 2);
    }

    #[test]
    fn test_track_end_stops_frames() {
        let mut vis = visualizer();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        sync_scheduler(true, false, &mut vis);

        assert!(sync_scheduler(false, false, &mut vis));
        assert!(!vis.is_running());
        assert_eq!(vis.on_tick(0.0, &mut surface), FrameDecision::Idle);
        assert!(surface.strokes.is_empty());

        // A finished track stays stopped on later ticks
        assert!(!sync_scheduler(false, false, &mut vis));
    }
}
