use serde::{Deserialize, Serialize};

/// Integer threshold that grows by a fixed percentage per level, floored at every step.
///
/// Flooring happens per step, so `threshold_at(n)` is not `base * factor^n`:
/// 1000 → 1500 → 2250 → 3375 → 5062 → 7593.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdGrowth {
    /// Threshold at step 0.
    pub base: u64,
    /// Growth per step in percent (150 = ×1.5).
    pub percent: u64,
}

impl ThresholdGrowth {
    pub fn new(base: u64, percent: u64) -> Self {
        Self { base, percent }
    }

    /// Threshold that follows `current`. Never smaller than `current`, never zero.
    pub fn next(&self, current: u64) -> u64 {
        let grown = current.saturating_mul(self.percent) / 100;
        grown.max(current).max(1)
    }

    /// Threshold after `steps` successive applications of [`Self::next`].
    pub fn threshold_at(&self, steps: u32) -> u64 {
        (0..steps).fold(self.base.max(1), |threshold, _| self.next(threshold))
    }
}

impl Default for ThresholdGrowth {
    fn default() -> Self {
        Self::new(1000, 150)
    }
}

/// Linear contribution that stops growing at `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CappedLinear {
    /// Amount added per step.
    pub per_step: f32,
    /// Upper bound of the contribution.
    pub cap: f32,
}

impl CappedLinear {
    pub fn new(per_step: f32, cap: f32) -> Self {
        Self { per_step, cap }
    }

    pub fn contribution(&self, steps: u32) -> f32 {
        (self.per_step * steps as f32).min(self.cap).max(0.0)
    }
}
