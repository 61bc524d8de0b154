//! Fixed-timestep frame clock.
//!
//! Frame times are fed in explicitly, so the headless simulator can run as
//! fast as the CPU allows while effects still see a steady step. Long frames
//! are clamped instead of triggering a burst of catch-up steps.

use tracing::warn;

/// Maximum frame time accepted in one call, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator that turns arbitrary frame times into fixed steps.
#[derive(Clone, Debug)]
pub struct FrameClock {
    step: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameClock {
    /// Clock stepping at `step` seconds. Non-positive steps fall back to 1/60 s.
    pub fn new(step: f64) -> Self {
        let step = if step > 0.0 { step } else { 1.0 / 60.0 };
        Self {
            step,
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Clock stepping at `fps` steps per second.
    pub fn with_rate(fps: u32) -> Self {
        Self::new(1.0 / f64::from(fps.max(1)))
    }

    /// Account for `frame_time` seconds and run as many fixed steps as fit.
    ///
    /// `update_fn(step, elapsed)` receives the step length and the simulated
    /// time at the end of that step. Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        // Tolerate rounding so a frame of exactly one step always runs it.
        while self.accumulator + self.step * 1e-9 >= self.step {
            self.total_sim_time += self.step;
            self.accumulator = (self.accumulator - self.step).max(0.0);
            self.update_count += 1;
            steps += 1;
            update_fn(self.step, self.total_sim_time);
        }

        self.frame_count += 1;
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds covered by the steps run so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_rate(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 1.0 / 60.0;

    #[test]
    fn test_single_step() {
        let mut clock = FrameClock::new(STEP);
        let mut updates = 0u32;
        assert_eq!(clock.advance(STEP, |_, _| updates += 1), 1);
        assert_eq!(updates, 1);
        assert!(clock.alpha().abs() < 1e-6);
    }

    #[test]
    fn test_multiple_steps_report_end_times() {
        let mut clock = FrameClock::new(STEP);
        let mut times = Vec::new();
        clock.advance(3.0 * STEP, |_, elapsed| times.push(elapsed));
        assert_eq!(times.len(), 3);
        for (i, t) in times.iter().enumerate() {
            assert!((t - (i + 1) as f64 * STEP).abs() < 1e-12);
        }
    }

    #[test]
    fn test_partial_frame_carries_over() {
        let mut clock = FrameClock::new(STEP);
        assert_eq!(clock.advance(0.5 * STEP, |_, _| {}), 0);
        assert!((clock.alpha() - 0.5).abs() < 1e-9);
        assert_eq!(clock.advance(0.5 * STEP, |_, _| {}), 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new(STEP);
        let steps = clock.advance(1.0, |_, _| {});
        let max_steps = (MAX_FRAME_TIME / STEP).ceil() as u32;
        assert!(steps > 0 && steps <= max_steps, "{steps} steps");
    }

    #[test]
    fn test_negative_frame_time_runs_nothing() {
        let mut clock = FrameClock::new(STEP);
        assert_eq!(clock.advance(-1.0, |_, _| {}), 0);
        assert_eq!(clock.total_sim_time(), 0.0);
    }

    #[test]
    fn test_steady_frames_match_updates() {
        let mut clock = FrameClock::with_rate(60);
        for _ in 0..600 {
            clock.advance(STEP, |_, _| {});
        }
        assert_eq!(clock.update_count(), 600);
        assert!((clock.total_sim_time() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        assert!((FrameClock::new(0.0).step() - STEP).abs() < 1e-15);
        assert!((FrameClock::with_rate(0).step() - 1.0).abs() < 1e-15);
    }
}
