use geo::{Distance, Haversine};

use crate::domain::Coordinate;

/// Great-circle distance in meters
pub fn great_circle_m(a: Coordinate, b: Coordinate) -> f64 {
    Haversine::distance(a.to_point(), b.to_point())
}

/// Absorbs float drift of a haversine round trip (nanometer scale)
const RADIUS_TOLERANCE_M: f64 = 1e-6;

/// Inclusive radius test: a candidate exactly on the radius counts.
pub fn within_radius(center: Coordinate, candidate: Coordinate, radius_m: f64) -> bool {
    great_circle_m(center, candidate) <= radius_m + RADIUS_TOLERANCE_M
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Destination;

    #[test]
    fn test_one_degree_latitude() {
        let d = great_circle_m(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        // ~111.2 km on the mean-radius sphere
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let center = Coordinate::new(59.93, 30.31);
        let candidate = Coordinate::new(59.939, 30.31);
        let exact = great_circle_m(center, candidate);

        assert!((exact - 1000.0).abs() < 5.0);
        assert!(within_radius(center, candidate, exact));
        assert!(!within_radius(center, candidate, exact - 0.001));
    }

    #[test]
    fn test_candidate_at_1000_m_counts_for_every_bearing() {
        for lat in [-60.0, -12.3, 0.0, 45.5, 59.93, 78.2] {
            let center = Coordinate::new(lat, 30.31);
            for bearing in [0.0, 45.0, 90.0, 135.0, 200.0, 300.0, 359.0] {
                let edge = Haversine::destination(center.to_point(), bearing, 1000.0);
                let candidate = Coordinate::from_point(edge);
                assert!(
                    within_radius(center, candidate, 1000.0),
                    "lat={} bearing={} d={}",
                    lat,
                    bearing,
                    great_circle_m(center, candidate)
                );
            }
        }
    }

    #[test]
    fn test_just_outside_radius_is_excluded() {
        let center = Coordinate::new(59.93, 30.31);
        let edge = Haversine::destination(center.to_point(), 90.0, 1000.01);
        assert!(!within_radius(center, Coordinate::from_point(edge), 1000.0));
    }
}
