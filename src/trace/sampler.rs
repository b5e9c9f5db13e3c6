//! Rate based sampling decisions

use rand::Rng;

/// Makes independent keep/drop decisions at a fixed rate.
///
/// Holds no mutable state, so a single sampler can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBasedSampler {
    rate: f64,
}

impl RateBasedSampler {
    /// Create a sampler. `rate` is clamped into `[0, 1]`; NaN samples nothing.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }

    /// Create a sampler from a percentage in `[0, 100]`.
    pub fn from_percent(percent: f64) -> Self {
        Self::new(percent / 100.0)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn sample(&self) -> bool {
        if self.rate <= 0.0 {
            return false;
        }
        if self.rate >= 1.0 {
            return true;
        }
        rand::rng().random::<f64>() <= self.rate
    }
}
