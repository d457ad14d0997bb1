//! Cost models for routing.
//!
//! Speeds are in km/h and lengths in km, so a `Time` cost is in hours.

use std::str::FromStr;

use crate::CoreError;

/// Speed in km/h for each speed-limit code `0..=7` in the road file.
/// Code 7 means "no limit" and is treated as 200 km/h.
pub const SPEED_LIMITS: [f64; 8] = [5.0, 20.0, 40.0, 60.0, 80.0, 100.0, 110.0, 200.0];

/// Typical speed (80 km/h) plus typical road class (3): the divisor the
/// time heuristic has historically used to turn distance into hours.
pub const TYPICAL_TRAVEL_RATE: f64 = 80.0 + 3.0;

/// Look up the speed for a speed-limit code.  `None` for codes outside `0..=7`.
#[inline]
pub fn speed_limit_for_code(code: u8) -> Option<f64> {
    SPEED_LIMITS.get(code as usize).copied()
}

/// What a route minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CostMode {
    /// Sum of segment lengths (km).
    #[default]
    Distance,
    /// Sum of `length / (speed_limit + road_class)` (hours).
    Time,
}

impl CostMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CostMode::Distance => "distance",
            CostMode::Time     => "time",
        }
    }
}

impl std::fmt::Display for CostMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "dist" => Ok(CostMode::Distance),
            "time"              => Ok(CostMode::Time),
            other => Err(CoreError::UnknownCostMode(other.to_string())),
        }
    }
}
