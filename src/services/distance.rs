// src/services/distance.rs
// DOCUMENTATION: Great-circle distance helpers
// PURPOSE: Order places by how close they are to the user's location

use crate::models::Place;
use geo_types::Point;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers
/// DOCUMENTATION: Points are (x = longitude, y = latitude) in degrees
pub fn haversine_km(from: Point<f64>, to: Point<f64>) -> f64 {
    let d_lat = (to.y() - from.y()).to_radians();
    let d_lon = (to.x() - from.x()).to_radians();
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Location of a place as a geo point
pub fn place_point(place: &Place) -> Point<f64> {
    Point::new(place.lon, place.lat)
}

/// Sort places by ascending distance from (lat, lon)
/// DOCUMENTATION: Returns a new vector; the input order is left untouched.
/// Ties keep their catalog order.
pub fn sort_places_by_distance(places: &[Place], lat: f64, lon: f64) -> Vec<Place> {
    let origin = Point::new(lon, lat);

    let mut with_distance: Vec<(f64, &Place)> = places
        .iter()
        .map(|p| (haversine_km(origin, place_point(p)), p))
        .collect();

    with_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    log::debug!(
        "Sorted {} places by distance from {:.4},{:.4}",
        with_distance.len(),
        lat,
        lon
    );

    with_distance.into_iter().map(|(_, p)| p.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceImage;

    fn place(id: &str, lat: f64, lon: f64) -> Place {
        Place {
            id: id.to_string(),
            title: id.to_uppercase(),
            image: PlaceImage {
                src: format!("{}.jpg", id),
                alt: String::new(),
            },
            lat,
            lon,
        }
    }

    #[test]
    fn test_haversine_zero_and_known_distance() {
        let paris = Point::new(2.3522, 48.8566);
        let london = Point::new(-0.1276, 51.5072);

        assert_eq!(haversine_km(paris, paris), 0.0);

        let d = haversine_km(paris, london);
        assert!((d - 344.0).abs() < 5.0, "paris-london was {}", d);
        assert!((haversine_km(london, paris) - d).abs() < 1e-9);
    }

    #[test]
    fn test_sort_places_by_distance() {
        let places = vec![
            place("far", -33.8688, 151.2093),
            place("near", 48.8566, 2.3522),
            place("mid", 40.4168, -3.7038),
        ];

        let sorted = sort_places_by_distance(&places, 48.85, 2.35);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["near", "mid", "far"]);
        // Input is not reordered
        assert_eq!(places[0].id, "far");
    }

    #[test]
    fn test_sort_keeps_ties_in_order() {
        let places = vec![place("a", 10.0, 10.0), place("b", 10.0, 10.0)];
        let sorted = sort_places_by_distance(&places, 0.0, 0.0);
        assert_eq!(sorted[0].id, "a");
        assert_eq!(sorted[1].id, "b");
    }
}
