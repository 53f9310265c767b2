//! Exponential moving average

use serde::Serialize;

/// Default smoothing factor
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Exponential moving average seeded at zero
///
/// Every sample moves the average by `alpha` of the distance to the sample:
/// `avg' = avg * (1 - alpha) + sample * alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ema {
    value: f64,
    alpha: f64,
    samples: u64,
}

impl Ema {
    pub fn new(alpha: f64) -> Self {
        Self {
            value: 0.0,
            alpha,
            samples: 0,
        }
    }

    /// Fold a sample into the average and return the new value
    #[inline]
    pub fn update(&mut self, sample: f64) -> f64 {
        self.value = self.value * (1.0 - self.alpha) + sample * self.alpha;
        self.samples += 1;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of samples folded in so far
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.samples = 0;
    }
}

impl Default for Ema {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
