/// Earth's mean radius in metres
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres between two coordinates (haversine)
pub fn gps_distance(latitude1: f64, longitude1: f64, latitude2: f64, longitude2: f64) -> f64 {
    let phi1 = latitude1.to_radians();
    let phi2 = latitude2.to_radians();
    let delta_phi = (latitude2 - latitude1).to_radians();
    let delta_lambda = (longitude2 - longitude1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(gps_distance(40.714224, -73.961452, 40.714224, -73.961452), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let distance = gps_distance(0.0, 0.0, 1.0, 0.0);
        assert!((distance - 111_195.0).abs() < 1.0, "got {distance}");
    }

    #[test]
    fn nearby_blocks_in_brooklyn() {
        // Roughly 65 m apart
        let distance = gps_distance(40.714224, -73.961452, 40.713795, -73.961983);
        assert!(distance > 60.0 && distance < 80.0, "got {distance}");
    }
}
