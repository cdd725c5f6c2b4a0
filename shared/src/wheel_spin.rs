//! Spin animation state machine.
//!
//! A [`Spin`] is a plain value. Every animation frame hands the previous value
//! to [`Spin::tick`] together with the frame timestamp and receives the next
//! value plus a [`SpinTick`] describing what happened on that frame.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::wheel_pointer::resolve;

pub const MIN_SPINS: f64 = 5.0; // Minimum number of full rotations
pub const MAX_SPINS: f64 = 8.0; // Maximum number of full rotations
pub const EASING_EXPONENT: f64 = 2.5;
pub const MIN_DURATION_MS: f64 = 1.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinTiming {
    pub duration_ms: f64,
    pub variance_ms: f64,
}

/// Gentle ease-out, decelerates across the whole spin instead of braking at the end.
pub fn ease_out(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powf(EASING_EXPONENT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    pub start_rotation: f64,
    pub target_delta: f64,
    pub start_timestamp: f64,
    pub duration_ms: f64,
    pub current_rotation: f64,
    pub last_crossed_segment: Option<usize>,
}

impl SpinState {
    pub fn new(start_rotation: f64, target_delta: f64, duration_ms: f64, start_timestamp: f64) -> Self {
        Self {
            start_rotation,
            target_delta,
            start_timestamp,
            duration_ms: duration_ms.max(MIN_DURATION_MS),
            current_rotation: start_rotation,
            last_crossed_segment: None,
        }
    }

    /// Draws a randomized duration and target for a spin starting at `start_rotation`.
    pub fn plan<R: Rng + ?Sized>(start_rotation: f64, timing: SpinTiming, now: f64, rng: &mut R) -> Self {
        let variance = timing.variance_ms.max(0.0);
        let duration_ms = timing.duration_ms + rng.gen_range(-variance..=variance);
        let spins = rng.gen_range(MIN_SPINS..MAX_SPINS);
        let offset = rng.gen_range(0.0..TAU);
        Self::new(start_rotation, spins * TAU + offset, duration_ms, now)
    }

    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.start_timestamp) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn final_rotation(&self) -> f64 {
        self.start_rotation + self.target_delta
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spin {
    Idle { rotation: f64 },
    Spinning(SpinState),
}

impl Default for Spin {
    fn default() -> Self {
        Spin::Idle { rotation: 0.0 }
    }
}

/// What a single animation frame produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpinTick {
    pub rotation: f64,
    pub progress: f64,
    pub segment: usize,
    /// Set when the pointer moved onto a new segment on this frame.
    pub crossed: Option<usize>,
    /// Set exactly once, on the frame that reaches full progress.
    pub completed: Option<usize>,
}

impl SpinTick {
    pub fn is_finished(&self) -> bool {
        self.completed.is_some()
    }
}

impl Spin {
    pub fn rotation(&self) -> f64 {
        match self {
            Spin::Idle { rotation } => *rotation,
            Spin::Spinning(state) => state.current_rotation,
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self, Spin::Spinning(_))
    }

    /// Starts a randomized spin. A request while already spinning is dropped.
    pub fn start<R: Rng + ?Sized>(self, timing: SpinTiming, now: f64, rng: &mut R) -> (Spin, bool) {
        match self {
            Spin::Spinning(_) => (self, false),
            Spin::Idle { rotation } => (Spin::Spinning(SpinState::plan(rotation, timing, now, rng)), true),
        }
    }

    /// Same as [`Spin::start`] with a pre-drawn plan.
    pub fn begin(self, state: SpinState) -> (Spin, bool) {
        match self {
            Spin::Spinning(_) => (self, false),
            Spin::Idle { .. } => (Spin::Spinning(state), true),
        }
    }

    pub fn tick(self, now: f64, segment_count: usize) -> (Spin, SpinTick) {
        let mut state = match self {
            Spin::Idle { rotation } => {
                let tick = SpinTick {
                    rotation,
                    progress: 1.0,
                    segment: resolve(rotation, segment_count),
                    crossed: None,
                    completed: None,
                };
                return (self, tick);
            }
            Spin::Spinning(state) => state,
        };

        let progress = state.progress(now);
        state.current_rotation = state.start_rotation + state.target_delta * ease_out(progress);

        let segment = resolve(state.current_rotation, segment_count);
        let crossed = match state.last_crossed_segment {
            Some(last) if last != segment && progress < 1.0 => Some(segment),
            _ => None,
        };
        state.last_crossed_segment = Some(segment);

        let mut tick = SpinTick {
            rotation: state.current_rotation,
            progress,
            segment,
            crossed,
            completed: None,
        };

        if progress < 1.0 {
            return (Spin::Spinning(state), tick);
        }

        log::info!("Spin finished on segment {} after {:.0}ms", segment, state.duration_ms);
        tick.completed = Some(segment);
        (Spin::Idle { rotation: state.current_rotation }, tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel_pointer::segment_angle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    fn run_to_completion(spin: Spin, segments: usize, steps: u32, duration: f64, start: f64) -> (Spin, Vec<SpinTick>) {
        let mut spin = spin;
        let mut ticks = Vec::new();
        for step in 0..=steps {
            let now = start + duration * step as f64 / steps as f64;
            let (next, tick) = spin.tick(now, segments);
            spin = next;
            ticks.push(tick);
        }
        (spin, ticks)
    }

    #[test]
    fn test_easing_curve() {
        assert!((ease_out(0.0) - 0.0).abs() < EPSILON);
        assert!((ease_out(0.5) - (1.0 - 0.5f64.powf(2.5))).abs() < EPSILON);
        assert!((ease_out(0.5) - 0.823).abs() < 1e-3);
        assert!((ease_out(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotation_samples_follow_easing() {
        let state = SpinState::new(1.0, 10.0, 1000.0, 500.0);
        let (spin, _) = Spin::default().begin(state);

        let (spin, at_start) = spin.tick(500.0, 4);
        assert!((at_start.rotation - 1.0).abs() < EPSILON);

        let (spin, halfway) = spin.tick(1000.0, 4);
        assert!((halfway.rotation - (1.0 + 10.0 * ease_out(0.5))).abs() < EPSILON);

        let (spin, end) = spin.tick(1500.0, 4);
        assert_eq!(end.progress, 1.0);
        assert_eq!(end.rotation, 11.0);
        assert!(!spin.is_spinning());
    }

    #[test]
    fn test_no_click_on_first_tick() {
        let state = SpinState::new(0.3, 20.0, 1000.0, 0.0);
        let (spin, _) = Spin::default().begin(state);
        let (_, first) = spin.tick(0.0, 12);
        assert_eq!(first.crossed, None);
        assert_eq!(first.completed, None);
    }

    #[test]
    fn test_crossings_counted_per_boundary() {
        // Half a turn on a four segment wheel, starting mid segment: two boundaries.
        let n = 4;
        let start = segment_angle(n) / 2.0;
        let state = SpinState::new(start, PI, 1000.0, 0.0);
        let (spin, _) = Spin::default().begin(state);
        let (spin, ticks) = run_to_completion(spin, n, 2000, 1000.0, 0.0);

        let crossings = ticks.iter().filter(|t| t.crossed.is_some()).count();
        assert_eq!(crossings, 2);
        assert!(!spin.is_spinning());
    }

    #[test]
    fn test_crossings_over_many_turns() {
        let n = 8;
        let start = segment_angle(n) / 2.0;
        // Ten and a half turns is 42 segment widths.
        let delta = 10.5 * PI;
        let state = SpinState::new(start, delta, 6000.0, 100.0);
        let (spin, _) = Spin::default().begin(state);
        let (_, ticks) = run_to_completion(spin, n, 20_000, 6000.0, 100.0);

        let crossings = ticks.iter().filter(|t| t.crossed.is_some()).count();
        assert_eq!(crossings, 42);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let state = SpinState::new(0.0, 40.0, 1000.0, 0.0);
        let (mut spin, _) = Spin::default().begin(state);
        let mut completions = Vec::new();
        for now in [0.0, 250.0, 999.0, 1000.0, 1200.0, 5000.0] {
            let (next, tick) = spin.tick(now, 9);
            spin = next;
            if let Some(index) = tick.completed {
                completions.push(index);
            }
        }
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0], resolve(40.0, 9));
    }

    #[test]
    fn test_overshooting_frame_still_finishes_exactly() {
        let state = SpinState::new(2.0, 30.0, 1000.0, 0.0);
        let (spin, _) = Spin::default().begin(state);
        let (spin, tick) = spin.tick(1_000_000.0, 5);
        assert_eq!(tick.rotation, 32.0);
        assert_eq!(tick.completed, Some(resolve(32.0, 5)));
        assert_eq!(spin, Spin::Idle { rotation: 32.0 });
    }

    #[test]
    fn test_no_click_on_final_frame() {
        let state = SpinState::new(0.0, 40.0, 1000.0, 0.0);
        let (spin, _) = Spin::default().begin(state);
        let (spin, _) = spin.tick(0.0, 200);
        // Jumping straight to the end changes segment but only completes.
        let (_, tick) = spin.tick(1000.0, 200);
        assert_eq!(tick.crossed, None);
        assert!(tick.is_finished());
    }

    #[test]
    fn test_spin_request_while_spinning_is_dropped() {
        let mut rng = StdRng::seed_from_u64(7);
        let timing = SpinTiming { duration_ms: 6000.0, variance_ms: 4000.0 };
        let (spin, started) = Spin::default().start(timing, 0.0, &mut rng);
        assert!(started);
        let before = spin;
        let (spin, started_again) = spin.start(timing, 10.0, &mut rng);
        assert!(!started_again);
        assert_eq!(spin, before);
    }

    #[test]
    fn test_plan_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let timing = SpinTiming { duration_ms: 6000.0, variance_ms: 4000.0 };
        for _ in 0..500 {
            let state = SpinState::plan(3.0, timing, 0.0, &mut rng);
            assert!(state.duration_ms >= 2000.0 && state.duration_ms <= 10000.0);
            assert!(state.target_delta >= MIN_SPINS * TAU);
            assert!(state.target_delta < MAX_SPINS * TAU + TAU);
            assert_eq!(state.start_rotation, 3.0);
            assert_eq!(state.last_crossed_segment, None);
        }
    }

    #[test]
    fn test_zero_variance_keeps_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let timing = SpinTiming { duration_ms: 1000.0, variance_ms: 0.0 };
        let state = SpinState::plan(0.0, timing, 0.0, &mut rng);
        assert_eq!(state.duration_ms, 1000.0);
    }

    #[test]
    fn test_rotation_accumulates_across_spins() {
        let (spin, _) = Spin::Idle { rotation: 5.0 }.begin(SpinState::new(5.0, 7.0, 100.0, 0.0));
        let (spin, _) = spin.tick(100.0, 3);
        assert_eq!(spin.rotation(), 12.0);
        let (spin, _) = spin.begin(SpinState::new(spin.rotation(), 3.0, 100.0, 200.0));
        let (spin, _) = spin.tick(300.0, 3);
        assert_eq!(spin.rotation(), 15.0);
    }
}
