//! Planar centroid of a group of points
//!
//! Latitude and longitude are averaged independently as plain numbers. No
//! spherical correction is applied, so the result is only meaningful for
//! groups spanning a small area and never wraps across the antimeridian.

use crate::coord::Coordinates;

/// Arithmetic mean of latitudes and longitudes
///
/// Returns `None` for an empty group.
pub fn centroid(group: &[Coordinates]) -> Option<Coordinates> {
    if group.is_empty() {
        return None;
    }

    let n = group.len() as f64;
    let (lat_sum, lng_sum) = group
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));

    Some(Coordinates::new(lat_sum / n, lng_sum / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_centroid_of_square_and_center() {
        let group = [
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 3.0),
            Coordinates::new(3.0, 0.0),
            Coordinates::new(3.0, 3.0),
            Coordinates::new(1.5, 1.5),
        ];

        let c = centroid(&group).unwrap();
        assert_abs_diff_eq!(c.lat, 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(c.lng, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_centroid_single_point() {
        let p = Coordinates::new(5.6037, -0.187);
        assert_eq!(centroid(&[p]), Some(p));
    }

    #[test]
    fn test_centroid_empty() {
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_centroid_is_planar_across_antimeridian() {
        // A spherical mean would sit near 180; the planar mean sits at 0
        let group = [Coordinates::new(10.0, 179.0), Coordinates::new(10.0, -179.0)];
        let c = centroid(&group).unwrap();
        assert_abs_diff_eq!(c.lng, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_centroid_matches_mean() {
        let group: Vec<Coordinates> = (0..17)
            .map(|i| Coordinates::new(4.0 + i as f64 * 0.37, -2.0 - i as f64 * 0.11))
            .collect();

        let lat_mean = group.iter().map(|p| p.lat).sum::<f64>() / group.len() as f64;
        let lng_mean = group.iter().map(|p| p.lng).sum::<f64>() / group.len() as f64;

        let c = centroid(&group).unwrap();
        assert_abs_diff_eq!(c.lat, lat_mean, epsilon = 1e-9);
        assert_abs_diff_eq!(c.lng, lng_mean, epsilon = 1e-9);
    }
}
