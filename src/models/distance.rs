use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Distance in kilometers
/// Prevents mixing up units with progress fractions and speeds
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub const ZERO: DistanceKm = DistanceKm(0.0);

    /// Get the raw kilometers value
    pub fn as_km(self) -> f64 {
        self.0
    }

    /// Create from raw value without validation (use carefully)
    pub fn from_raw(km: f64) -> Self {
        DistanceKm(km)
    }

    /// The distance, or 1 km when the distance is zero.
    /// Used as a divisor so a degenerate route never divides by zero.
    pub fn or_unit(self) -> f64 {
        if self.0 > 0.0 {
            self.0
        } else {
            1.0
        }
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

impl Add for DistanceKm {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        DistanceKm(self.0 + other.0)
    }
}

impl Sum for DistanceKm {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(DistanceKm::ZERO, Add::add)
    }
}
