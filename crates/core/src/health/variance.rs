//! Sample window and variance calculation
//!
//! The variance used by the propeller test is deliberately *not* normalized:
//! it returns `sum(x^2) - sum(x)^2 / N`, i.e. N times the population
//! variance. Thresholds are calibrated against this scaling.

use nalgebra::Vector3;

/// Number of accelerometer samples per measurement window
pub const PROPTEST_NBR_OF_VARIANCE_VALUES: usize = 100;

/// One accelerometer reading (body frame, in g)
pub type AccelSample = Vector3<f32>;

/// Unnormalized variance of a sample sequence
///
/// Computes `sum(x_i^2) - (sum(x_i))^2 / N` in a single pass, accumulating
/// the sum and the sum of squares in sample order. An empty slice yields 0.
pub fn variance(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }

    let mut sum = 0.0f32;
    let mut sum_sq = 0.0f32;
    for &x in buffer {
        sum += x;
        sum_sq += x * x;
    }

    sum_sq - (sum * sum) / buffer.len() as f32
}

/// Per-axis variance triple
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisVariance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisVariance {
    /// Horizontal-plane variance (X + Y), the value compared against the threshold
    #[inline]
    pub fn xy(&self) -> f32 {
        self.x + self.y
    }
}

/// Fixed-size window of accelerometer samples, one array per axis
///
/// The window is reused between the noise floor measurement and each motor;
/// only one window of data is live at a time.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    x: [f32; PROPTEST_NBR_OF_VARIANCE_VALUES],
    y: [f32; PROPTEST_NBR_OF_VARIANCE_VALUES],
    z: [f32; PROPTEST_NBR_OF_VARIANCE_VALUES],
}

impl SampleWindow {
    /// Window length
    pub const LEN: usize = PROPTEST_NBR_OF_VARIANCE_VALUES;

    /// Create a zeroed window
    pub const fn new() -> Self {
        Self {
            x: [0.0; PROPTEST_NBR_OF_VARIANCE_VALUES],
            y: [0.0; PROPTEST_NBR_OF_VARIANCE_VALUES],
            z: [0.0; PROPTEST_NBR_OF_VARIANCE_VALUES],
        }
    }

    /// Store a sample at `index`
    ///
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn record(&mut self, index: usize, sample: &AccelSample) {
        if index < Self::LEN {
            self.x[index] = sample.x;
            self.y[index] = sample.y;
            self.z[index] = sample.z;
        }
    }

    /// Variance of each axis over the whole window
    pub fn variance(&self) -> AxisVariance {
        AxisVariance {
            x: variance(&self.x),
            y: variance(&self.y),
            z: variance(&self.z),
        }
    }

    /// Stored X axis samples
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Stored Y axis samples
    pub fn y(&self) -> &[f32] {
        &self.y
    }

    /// Stored Z axis samples
    pub fn z(&self) -> &[f32] {
        &self.z
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}
