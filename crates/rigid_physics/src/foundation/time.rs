//! Time management utilities
//!
//! The simulation itself only ever sees a `dt`. These helpers turn wall clock
//! time into that `dt` for drivers that run the scene in real time.

use std::time::Instant;

/// Wall clock frame timer with a clamped delta
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl FrameTimer {
    /// Create a new timer; deltas longer than `max_delta` seconds are clamped
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_time = elapsed.min(self.max_delta);
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the clamped time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total clamped time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Accumulator that converts variable frame time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// `step` is the simulation dt; at most `max_steps` are produced per call to
    /// [`FixedTimestep::advance`], excess time is dropped.
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// The fixed simulation step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `elapsed` seconds and return how many fixed steps are now due
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.step.is_finite() || self.step <= 0.0 || !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.4}s of simulation time (step cap {})",
                self.accumulator,
                self.max_steps
            );
            self.accumulator %= self.step;
        }

        steps
    }

    /// Fraction of a step left over in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut clock = FixedTimestep::new(0.1, 8);
        assert_eq!(clock.advance(0.05), 0);
        assert_eq!(clock.advance(0.06), 1);
        assert_relative_eq!(clock.alpha(), 0.1, epsilon = 1e-4);
        assert_eq!(clock.advance(0.25), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_steps() {
        let mut clock = FixedTimestep::new(0.01, 4);
        assert_eq!(clock.advance(1.0), 4);
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_fixed_timestep_rejects_bad_input() {
        let mut clock = FixedTimestep::new(0.01, 4);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }

    #[test]
    fn test_frame_timer_clamps() {
        let mut timer = FrameTimer::new(0.0);
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(timer.tick(), 0.0);
        assert_eq!(timer.frame_count(), 1);
    }
}
