//! Planar coordinates.
//!
//! Nodes are placed on a flat kilometre grid centred on the region the data
//! covers rather than on the sphere.  At city/region scale the projection
//! error is far below segment-length rounding in the source files, and it
//! makes the A* distance heuristic a plain Euclidean norm.

use crate::{CoreError, CoreResult};

/// Latitude of the projection origin, degrees.
pub const CENTRE_LAT: f64 = -41.0;
/// Longitude of the projection origin, degrees.
pub const CENTRE_LON: f64 = 174.0;
/// Kilometres per degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 111.0;

/// A point on the projected plane, in kilometres east (`x`) and north (`y`)
/// of the projection origin.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Project a WGS-84 latitude/longitude onto the plane.
    ///
    /// Longitude is scaled by `cos(CENTRE_LAT)` so that one unit is one
    /// kilometre on both axes near the origin.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        let km_per_deg_lon = KM_PER_DEG_LAT * CENTRE_LAT.to_radians().cos();
        Self {
            x: (lon - CENTRE_LON) * km_per_deg_lon,
            y: (lat - CENTRE_LAT) * KM_PER_DEG_LAT,
        }
    }

    /// Like [`from_lat_lon`](Self::from_lat_lon) but rejects non-finite or
    /// out-of-range input.
    pub fn try_from_lat_lon(lat: f64, lon: f64) -> CoreResult<Self> {
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        Ok(Self::from_lat_lon(lat, lon))
    }

    /// Inverse of [`from_lat_lon`](Self::from_lat_lon), returning `(lat, lon)`.
    pub fn to_lat_lon(self) -> (f64, f64) {
        let km_per_deg_lon = KM_PER_DEG_LAT * CENTRE_LAT.to_radians().cos();
        (
            self.y / KM_PER_DEG_LAT + CENTRE_LAT,
            self.x / km_per_deg_lon + CENTRE_LON,
        )
    }

    /// Straight-line distance on the plane.
    #[inline]
    pub fn distance(self, other: Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared distance; cheaper when only ordering matters.
    #[inline]
    pub fn distance_2(self, other: Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
