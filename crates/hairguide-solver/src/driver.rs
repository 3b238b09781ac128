//! Fixed-timestep driver.
//!
//! Frame time is clamped, accumulated, and paid out in fixed substeps with
//! a per-frame cap. Leftover time carries to the next frame.

use hairguide_types::constants::{FIXED_DT, MAX_FRAME_DT, MAX_STEPS_PER_FRAME};

/// Turns variable frame time into fixed substeps.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    accumulator: f32,
    step_dt: f32,
    max_frame_dt: f32,
    max_steps: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FIXED_DT, MAX_FRAME_DT, MAX_STEPS_PER_FRAME)
    }
}

impl FixedTimestep {
    /// A driver paying out `step_dt` substeps, at most `max_steps` per frame.
    pub fn new(step_dt: f32, max_frame_dt: f32, max_steps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step_dt: step_dt.max(1.0e-6),
            max_frame_dt: max_frame_dt.max(0.0),
            max_steps,
        }
    }

    /// Adds one frame's wall-clock time and returns how many substeps of
    /// [`step_dt`](Self::step_dt) to run now.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.step_dt && steps < self.max_steps {
            self.accumulator -= self.step_dt;
            steps += 1;
        }
        steps
    }

    /// Length of one substep (seconds).
    pub fn step_dt(&self) -> f32 {
        self.step_dt
    }

    /// Unspent time carried into the next frame.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Drops any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
