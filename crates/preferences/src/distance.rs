//! Great-circle distance and distance bands.

use data_loader::Coordinate;
use geo::{Distance, Haversine, Point};
use std::fmt;

/// Upper bound (exclusive) of the `local` band
pub const LOCAL_LIMIT_METERS: f64 = 50_000.0;
/// Upper bound (exclusive) of the `regional` band
pub const REGIONAL_LIMIT_METERS: f64 = 200_000.0;
/// Upper bound (exclusive) of the `national` band
pub const NATIONAL_LIMIT_METERS: f64 = 500_000.0;

/// Great-circle distance between two coordinates, in meters, on a sphere
/// of the mean Earth radius.
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// How far a program is from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceBand {
    Local,
    Regional,
    National,
    Distant,
}

impl DistanceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceBand::Local => "local",
            DistanceBand::Regional => "regional",
            DistanceBand::National => "national",
            DistanceBand::Distant => "distant",
        }
    }
}

impl fmt::Display for DistanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band a distance in meters falls into. NaN is treated as `Distant`.
pub fn categorize_distance(meters: f64) -> DistanceBand {
    if meters < LOCAL_LIMIT_METERS {
        DistanceBand::Local
    } else if meters < REGIONAL_LIMIT_METERS {
        DistanceBand::Regional
    } else if meters < NATIONAL_LIMIT_METERS {
        DistanceBand::National
    } else {
        DistanceBand::Distant
    }
}
