//! Pass 2 accumulators
//!
//! Each accumulator is fed the contributors of one attribute group, in raw
//! store order, and yields the fused value or `None` when the contributions
//! cancel out.

use crate::{
    constants::fusion::BEARING_CANCELLATION_EPSILON,
    geo::{normalize_bearing, Cartesian, GeoPoint},
};

/// Fused position and its accuracy radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PositionEstimate {
    pub point: GeoPoint,
    /// `None` only when a single contributor supplied no accuracy
    pub accuracy: Option<f64>,
}

/// Incremental precision-weighted position average
///
/// Scalar form of a Kalman measurement update per axis: every sample pulls the
/// running unit vector towards itself with gain `k = P / (P + r²)`, and the
/// running variance shrinks by `(1 - k)`.
///
/// ```text
/// P₀ = r₀²            x₀ = v₀
/// kᵢ = Pᵢ₋₁ / (Pᵢ₋₁ + rᵢ²)
/// Pᵢ = Pᵢ₋₁ · (1 - kᵢ)
/// xᵢ = xᵢ₋₁ + kᵢ · (vᵢ - xᵢ₋₁)
/// ```
#[derive(Debug, Default)]
pub(crate) struct PositionEstimator {
    vector: Cartesian,
    variance: f64,
    count: usize,
    first: Option<PositionEstimate>,
}

impl PositionEstimator {
    /// Add one contributor
    ///
    /// `radius` is the weighting radius (always ≥ the minimum radius);
    /// `reported_accuracy` is what the source itself supplied.
    pub fn add(&mut self, point: GeoPoint, radius: f64, reported_accuracy: Option<f64>) {
        let sample = point.to_cartesian();
        let sample_variance = radius * radius;

        if self.count == 0 {
            self.vector = sample;
            self.variance = sample_variance;
            self.first = Some(PositionEstimate {
                point,
                accuracy: reported_accuracy,
            });
        } else {
            let k = self.variance / (self.variance + sample_variance);
            self.variance *= 1.0 - k;
            self.vector = self.vector.lerp(sample, k);
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Fused estimate; `None` if nothing was added or the samples cancelled
    pub fn finish(&self) -> Option<PositionEstimate> {
        match self.count {
            0 => None,
            1 => self.first,
            _ => self.vector.to_geo().map(|point| PositionEstimate {
                point,
                accuracy: Some(libm::sqrt(self.variance)),
            }),
        }
    }
}

/// Weighted arithmetic mean, weight = 1 / radius
#[derive(Debug, Default)]
pub(crate) struct WeightedMean {
    sum: f64,
    weight: f64,
    count: usize,
    first: f64,
}

impl WeightedMean {
    pub fn add(&mut self, value: f64, radius: f64) {
        let w = 1.0 / radius;
        if self.count == 0 {
            self.first = value;
        }
        self.sum += w * value;
        self.weight += w;
        self.count += 1;
    }

    pub fn finish(&self) -> Option<f64> {
        match self.count {
            0 => None,
            1 => Some(self.first),
            _ => Some(self.sum / self.weight),
        }
    }
}

/// Weighted mean of angles in degrees
#[derive(Debug, Default)]
pub(crate) struct CircularMean {
    cos_sum: f64,
    sin_sum: f64,
    weight: f64,
    count: usize,
    first: f64,
}

impl CircularMean {
    pub fn add(&mut self, degrees: f64, radius: f64) {
        let w = 1.0 / radius;
        let rad = degrees.to_radians();
        if self.count == 0 {
            self.first = degrees;
        }
        self.cos_sum += w * libm::cos(rad);
        self.sin_sum += w * libm::sin(rad);
        self.weight += w;
        self.count += 1;
    }

    /// Mean bearing in [0, 360); `None` when the directions cancel
    pub fn finish(&self) -> Option<f64> {
        match self.count {
            0 => None,
            1 => Some(self.first),
            _ => {
                let magnitude = libm::hypot(self.cos_sum, self.sin_sum);
                if !(magnitude > self.weight * BEARING_CANCELLATION_EPSILON) {
                    return None;
                }
                Some(normalize_bearing(
                    libm::atan2(self.sin_sum, self.cos_sum).to_degrees(),
                ))
            }
        }
    }
}
