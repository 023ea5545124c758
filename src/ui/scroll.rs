//! Timed interpolation behind the lyrics reading mode. A [`ScrollTask`] is
//! an explicit value with a start instant, a total distance, and a duration
//! derived from the reading tempo; the current offset is a pure function of
//! "now". Cancelling is dropping the value. Restarting after a tempo change
//! deliberately begins a fresh interpolation at zero progress, so the view
//! jumps back to the top rather than guessing an equivalent position.

use std::time::{Duration, Instant};

/// Time allotted per row at the reference rate. The duration formula is
/// `distance / (bpm / 6) * ROW_SCALE`, which makes the scroll finish twice
/// as fast when the tempo doubles.
const ROW_SCALE: Duration = Duration::from_millis(8_000);

#[derive(Debug, Clone)]
pub(crate) struct ScrollTask {
    started: Instant,
    distance: u16,
    duration: Duration,
}

impl ScrollTask {
    /// Begin scrolling `distance` rows at `bpm`, measured from `now`. The
    /// caller supplies the clock so tests can probe arbitrary instants.
    pub(crate) fn start(distance: u16, bpm: u16, now: Instant) -> Self {
        let rows_per_second = f64::from(bpm) / 6.0;
        let duration = ROW_SCALE.mul_f64(f64::from(distance) / rows_per_second);
        Self {
            started: now,
            distance,
            duration,
        }
    }

    /// Fresh interpolation over the same distance at a new tempo. Progress
    /// restarts at zero.
    pub(crate) fn restart(&self, bpm: u16, now: Instant) -> Self {
        Self::start(self.distance, bpm, now)
    }

    /// Completion fraction at `now`, capped at 1. A zero-distance task is
    /// immediately complete.
    pub(crate) fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Scroll offset at `now`: the completion fraction applied to the total
    /// distance.
    pub(crate) fn offset_at(&self, now: Instant) -> u16 {
        (self.progress_at(now) * f64::from(self.distance)).round() as u16
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_half_the_distance_at_half_the_duration() {
        let now = Instant::now();
        let task = ScrollTask::start(100, 60, now);
        assert_eq!(task.offset_at(now), 0);
        assert_eq!(task.offset_at(now + task.duration / 2), 50);
        assert_eq!(task.offset_at(now + task.duration), 100);
    }

    #[test]
    fn test_progress_caps_at_one_past_the_end() {
        let now = Instant::now();
        let task = ScrollTask::start(40, 120, now);
        let late = now + task.duration * 3;
        assert_eq!(task.progress_at(late), 1.0);
        assert_eq!(task.offset_at(late), 40);
    }

    #[test]
    fn test_doubling_the_tempo_halves_the_duration() {
        let now = Instant::now();
        let slow = ScrollTask::start(100, 60, now);
        let fast = ScrollTask::start(100, 120, now);
        assert_eq!(slow.duration, fast.duration * 2);
    }

    #[test]
    fn test_restart_resets_progress_to_zero() {
        let now = Instant::now();
        let task = ScrollTask::start(100, 60, now);
        let midway = now + task.duration / 2;
        assert_eq!(task.offset_at(midway), 50);

        let restarted = task.restart(90, midway);
        assert_eq!(restarted.offset_at(midway), 0);
        assert_eq!(restarted.distance, 100);
    }

    #[test]
    fn test_zero_distance_task_is_immediately_complete() {
        let now = Instant::now();
        let task = ScrollTask::start(0, 60, now);
        assert_eq!(task.progress_at(now), 1.0);
        assert_eq!(task.offset_at(now), 0);
    }
}
