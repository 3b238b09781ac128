//! Collision pass outcome.

/// Summary of one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactResult {
    /// Number of points moved.
    pub resolved_count: u32,
    /// Deepest penetration corrected.
    pub max_penetration: f32,
    /// Sum of all positional corrections.
    pub total_correction: f32,
}

impl ContactResult {
    /// Records one correction of depth `depth`.
    #[inline]
    pub fn record(&mut self, depth: f32) {
        self.resolved_count += 1;
        self.max_penetration = self.max_penetration.max(depth);
        self.total_correction += depth;
    }

    /// Folds another pass's result into this one.
    pub fn merge(&mut self, other: &ContactResult) {
        self.resolved_count += other.resolved_count;
        self.max_penetration = self.max_penetration.max(other.max_penetration);
        self.total_correction += other.total_correction;
    }
}
