//! Axis-aligned box spaces for states, actions and observations.

use crate::error::{check_len, KinematicsError};

/// A box `[low, high]` per dimension. Bounds may be infinite.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoxSpace {
    /// Build a space from matching lower and upper bounds.
    ///
    /// # Errors
    ///
    /// Fails if the bounds differ in length, contain NaN, or `low > high`.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self, KinematicsError> {
        check_len("upper bound", &high, low.len())?;
        for (i, (lo, hi)) in low.iter().zip(&high).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(KinematicsError::Configuration(format!(
                    "bounds of dimension {i} are invalid: [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self { low, high })
    }

    /// Bounds already known to be consistent.
    pub(crate) fn from_parts(low: Vec<f64>, high: Vec<f64>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// `(-inf, +inf)` in each of `dim` dimensions.
    #[must_use]
    pub fn unbounded(dim: usize) -> Self {
        Self {
            low: vec![f64::NEG_INFINITY; dim],
            high: vec![f64::INFINITY; dim],
        }
    }

    /// Concatenate spaces in order.
    #[must_use]
    pub fn concat(parts: &[&BoxSpace]) -> Self {
        let mut low = Vec::new();
        let mut high = Vec::new();
        for part in parts {
            low.extend_from_slice(&part.low);
            high.extend_from_slice(&part.high);
        }
        Self { low, high }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    #[must_use]
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// True when every bound is finite, i.e. the space can be sampled.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.low.iter().chain(&self.high).all(|b| b.is_finite())
    }

    #[must_use]
    pub fn contains(&self, value: &[f64]) -> bool {
        value.len() == self.len()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }

    /// Draw a uniform sample. The space must be bounded.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(lo, hi)| lo + (hi - lo) * rng.f64())
            .collect()
    }

    /// Map a value inside the box linearly onto `[-1, 1]` per dimension.
    ///
    /// # Errors
    ///
    /// Fails if `value` has the wrong dimension.
    pub fn scale_to_unit(&self, value: &[f64]) -> Result<Vec<f64>, KinematicsError> {
        check_len("scaled value", value, self.len())?;
        Ok(value
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .map(|(v, (lo, hi))| 2.0 * (v - lo) / (hi - lo) - 1.0)
            .collect())
    }
}
