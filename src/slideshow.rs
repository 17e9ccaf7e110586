//! Slideshow controller
//!
//! Owns the ordered image list, the cursor into it and the two clocks the
//! sketch page needs:
//! - the countdown baseline, reset on every advance (manual or timed)
//! - the fixed-period advance timer, which manual navigation does not move
//!
//! All operations take `now` explicitly so the UI passes `Instant::now()` and
//! tests drive a synthetic clock.

use crate::error::SketchError;
use crate::interval::Interval;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Visual transform of the displayed image.
///
/// Rendering mirrors horizontally first (when `flipped`), then applies
/// `quarter_turns` clockwise 90° rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub flipped: bool,
    pub quarter_turns: u8,
}

impl Orientation {
    pub fn is_identity(&self) -> bool {
        !self.flipped && self.quarter_turns == 0
    }

    /// Mirror the currently displayed picture horizontally
    pub fn flip(self) -> Self {
        // F . R^k . F^f == R^(-k) . F^(f+1)
        Orientation {
            flipped: !self.flipped,
            quarter_turns: (4 - self.quarter_turns) % 4,
        }
    }

    /// Rotate the currently displayed picture 90° clockwise
    pub fn rotate90(self) -> Self {
        Orientation {
            flipped: self.flipped,
            quarter_turns: (self.quarter_turns + 1) % 4,
        }
    }
}

/// Running timer state, present only while the slideshow is started
#[derive(Debug, Clone, Copy)]
struct Timer {
    period: Duration,
    next_fire: Instant,
}

#[derive(Debug)]
pub struct SlideshowController {
    images: Vec<PathBuf>,
    cursor: Option<usize>,
    interval: Interval,
    timer: Option<Timer>,
    baseline: Instant,
    orientation: Orientation,
}

impl SlideshowController {
    pub fn new(interval: Interval) -> Self {
        SlideshowController {
            images: Vec::new(),
            cursor: None,
            interval,
            timer: None,
            baseline: Instant::now(),
            orientation: Orientation::default(),
        }
    }

    /// Replace the image set. An empty set leaves the slideshow inactive.
    pub fn load(&mut self, images: Vec<PathBuf>) {
        info!("Loaded {} images", images.len());
        self.cursor = if images.is_empty() { None } else { Some(0) };
        self.images = images;
        self.orientation = Orientation::default();
        self.timer = None;
    }

    /// Start the advance timer with the currently configured interval
    pub fn start(&mut self, now: Instant) -> Result<&Path, SketchError> {
        let index = self.cursor.ok_or(SketchError::EmptySelection)?;
        let period = self.interval.duration();
        self.timer = Some(Timer {
            period,
            next_fire: now + period,
        });
        self.baseline = now;
        self.orientation = Orientation::default();
        info!("Slideshow started: {} images, interval {}", self.images.len(), self.interval);
        Ok(self.images[index].as_path())
    }

    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            info!("Slideshow stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Move the cursor one step (wrapping) and return the image to display
    pub fn advance(&mut self, direction: Direction, now: Instant) -> Option<&Path> {
        let len = self.images.len();
        let current = self.cursor?;
        let next = match direction {
            Direction::Forward => (current + 1) % len,
            Direction::Backward => (current + len - 1) % len,
        };
        self.cursor = Some(next);
        self.baseline = now;
        self.orientation = Orientation::default();
        debug!("Advanced {:?} to {}/{}", direction, next + 1, len);
        Some(self.images[next].as_path())
    }

    /// Timer fire: same as advancing forward
    pub fn tick(&mut self, now: Instant) -> Option<&Path> {
        self.advance(Direction::Forward, now)
    }

    /// Fire the timer if its scheduled time has passed.
    ///
    /// Fires at most once per call; periods missed while the UI was busy are
    /// skipped rather than replayed.
    pub fn poll_timer(&mut self, now: Instant) -> Option<&Path> {
        let timer = self.timer.as_mut()?;
        if now < timer.next_fire {
            return None;
        }
        while timer.next_fire <= now {
            timer.next_fire += timer.period;
        }
        self.tick(now)
    }

    /// Change the configured interval. A running timer keeps its period and
    /// its pending fire time; the new value applies on the next `start`.
    pub fn set_interval(&mut self, interval: Interval) {
        info!("Timer interval set to: {} ms", interval.as_millis());
        self.interval = interval;
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn flip(&mut self) {
        if self.cursor.is_some() {
            self.orientation = self.orientation.flip();
        }
    }

    pub fn rotate90(&mut self) {
        if self.cursor.is_some() {
            self.orientation = self.orientation.rotate90();
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Countdown shown on the sketch page: `max(0, period - elapsed)`
    pub fn remaining_time(&self, now: Instant) -> Duration {
        let period = self
            .timer
            .map(|t| t.period)
            .unwrap_or_else(|| self.interval.duration());
        period.saturating_sub(now.saturating_duration_since(self.baseline))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_wrap_around_law() {
        let t0 = Instant::now();
        for n in 1..=5 {
            let names: Vec<String> = (0..n).map(|i| format!("{}.png", i)).collect();
            let mut show = SlideshowController::new(Interval::default());
            show.load(names.iter().map(PathBuf::from).collect());
            show.advance(Direction::Forward, t0);
            let start = show.cursor();
            for _ in 0..n {
                show.advance(Direction::Forward, t0);
            }
            assert_eq!(show.cursor(), start);
        }
    }

    #[test]
    fn test_forward_then_backward_restores_cursor() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::default());
        show.load(paths(&["a.png", "b.png", "c.png", "d.png"]));
        for _ in 0..4 {
            let before = show.cursor();
            show.advance(Direction::Forward, t0);
            show.advance(Direction::Backward, t0);
            assert_eq!(show.cursor(), before);
            show.advance(Direction::Forward, t0);
        }
    }

    #[test]
    fn test_backward_from_first_wraps_to_last() {
        let mut show = SlideshowController::new(Interval::default());
        show.load(paths(&["a.png", "b.png", "c.png"]));
        let shown = show.advance(Direction::Backward, Instant::now());
        assert_eq!(shown, Some(Path::new("c.png")));
        assert_eq!(show.cursor(), Some(2));
    }

    #[test]
    fn test_three_image_scenario() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::default());
        show.load(paths(&["A", "B", "C"]));
        assert_eq!(show.cursor(), Some(0));
        show.advance(Direction::Forward, t0);
        let shown = show.advance(Direction::Forward, t0).map(Path::to_path_buf);
        assert_eq!(show.cursor(), Some(2));
        assert_eq!(shown, Some(PathBuf::from("C")));
        let shown = show.advance(Direction::Forward, t0).map(Path::to_path_buf);
        assert_eq!(show.cursor(), Some(0));
        assert_eq!(shown, Some(PathBuf::from("A")));
    }

    #[test]
    fn test_empty_set_is_inert() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::default());
        show.load(Vec::new());
        assert_eq!(show.cursor(), None);
        assert!(show.advance(Direction::Forward, t0).is_none());
        assert!(show.tick(t0).is_none());
        assert!(matches!(show.start(t0), Err(SketchError::EmptySelection)));
        assert!(!show.is_running());
        show.flip();
        assert!(show.orientation().is_identity());
    }

    #[test]
    fn test_remaining_time_monotonic_and_clamped() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::from_secs(10).unwrap());
        show.load(paths(&["a.png", "b.png"]));
        show.start(t0).unwrap();

        let mut previous = show.remaining_time(t0);
        assert_eq!(previous, secs(10));
        for step in 1..=15 {
            let remaining = show.remaining_time(t0 + secs(step));
            assert!(remaining <= previous);
            previous = remaining;
        }
        assert_eq!(show.remaining_time(t0 + secs(15)), Duration::ZERO);

        show.advance(Direction::Forward, t0 + secs(12));
        assert_eq!(show.remaining_time(t0 + secs(12)), secs(10));
    }

    #[test]
    fn test_poll_timer_fires_once_per_period() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::from_secs(30).unwrap());
        show.load(paths(&["a.png", "b.png", "c.png"]));
        show.start(t0).unwrap();

        assert!(show.poll_timer(t0 + secs(29)).is_none());
        assert_eq!(show.poll_timer(t0 + secs(30)), Some(Path::new("b.png")));
        assert!(show.poll_timer(t0 + secs(31)).is_none());
        assert_eq!(show.poll_timer(t0 + secs(60)), Some(Path::new("c.png")));

        // A stalled UI skips missed periods instead of bursting
        assert_eq!(show.poll_timer(t0 + secs(200)), Some(Path::new("a.png")));
        assert!(show.poll_timer(t0 + secs(205)).is_none());
        assert!(show.poll_timer(t0 + secs(210)).is_some());
    }

    #[test]
    fn test_manual_advance_keeps_timer_schedule() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::from_secs(30).unwrap());
        show.load(paths(&["a.png", "b.png", "c.png"]));
        show.start(t0).unwrap();

        show.advance(Direction::Forward, t0 + secs(20));
        assert_eq!(show.poll_timer(t0 + secs(30)), Some(Path::new("c.png")));
    }

    #[test]
    fn test_set_interval_applies_on_next_start() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::from_secs(30).unwrap());
        show.load(paths(&["a.png", "b.png"]));
        show.start(t0).unwrap();

        show.set_interval(Interval::from_secs(5).unwrap());
        assert!(show.poll_timer(t0 + secs(10)).is_none());
        assert_eq!(show.remaining_time(t0 + secs(10)), secs(20));
        assert!(show.poll_timer(t0 + secs(30)).is_some());

        show.stop();
        assert!(show.poll_timer(t0 + secs(100)).is_none());
        show.start(t0 + secs(100)).unwrap();
        assert!(show.poll_timer(t0 + secs(105)).is_some());
    }

    #[test]
    fn test_flip_is_involution() {
        let start = Orientation::default().rotate90();
        assert_eq!(start.flip().flip(), start);
        assert!(Orientation::default().flip().flip().is_identity());
    }

    #[test]
    fn test_rotate_has_order_four() {
        let mut o = Orientation::default().flip();
        let start = o;
        for _ in 0..4 {
            o = o.rotate90();
        }
        assert_eq!(o, start);
    }

    #[test]
    fn test_transform_resets_on_navigation() {
        let t0 = Instant::now();
        let mut show = SlideshowController::new(Interval::default());
        show.load(paths(&["a.png", "b.png"]));
        show.flip();
        show.rotate90();
        assert!(!show.orientation().is_identity());
        show.advance(Direction::Forward, t0);
        show.advance(Direction::Backward, t0);
        assert!(show.orientation().is_identity());
    }
}
