//! Coordinate and landmark types.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in [-90, 90].
    pub lat: f64,
    /// Longitude in [-180, 180].
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check latitude and longitude are inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A check-in landmark with its geofence radius.
#[derive(Debug, Clone, Serialize)]
pub struct Landmark {
    /// Stable landmark id (kebab-case slug).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Geofence center.
    pub position: GeoPoint,
    /// Geofence radius in meters.
    pub radius_m: f64,
    /// One-line description shown on check-in.
    pub description: String,
}

impl Landmark {
    fn new(id: &str, name: &str, lat: f64, lon: f64, radius_m: f64, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            position: GeoPoint::new(lat, lon),
            radius_m,
            description: description.to_string(),
        }
    }
}

static CHIANG_MAI_LANDMARKS: Lazy<Vec<Landmark>> = Lazy::new(|| {
    vec![
        Landmark::new(
            "tha-phae-gate",
            "Tha Phae Gate",
            18.7877,
            98.9931,
            100.0,
            "Eastern gate of the old city wall, built from fired brick in the 13th century.",
        ),
        Landmark::new(
            "wat-phra-singh",
            "Wat Phra Singh",
            18.7885,
            98.9817,
            120.0,
            "Lanna-style temple housing the revered Phra Singh Buddha image.",
        ),
        Landmark::new(
            "wat-chedi-luang",
            "Wat Chedi Luang",
            18.7870,
            98.9866,
            120.0,
            "Ruined royal chedi that once held the Emerald Buddha.",
        ),
        Landmark::new(
            "chiang-mai-gate-market",
            "Chiang Mai Gate Market",
            18.7813,
            98.9859,
            100.0,
            "Morning market at the southern gate, busiest before 8am.",
        ),
        Landmark::new(
            "nong-buak-haad-park",
            "Nong Buak Haad Park",
            18.7815,
            98.9789,
            150.0,
            "Public park in the old city's southwest corner.",
        ),
        Landmark::new(
            "warorot-market",
            "Warorot Market",
            18.7902,
            99.0003,
            100.0,
            "Multi-storey market by the Ping River, the city's oldest trading hub.",
        ),
    ]
});

/// The built-in Chiang Mai landmark fixture.
pub fn chiang_mai_landmarks() -> &'static [Landmark] {
    &CHIANG_MAI_LANDMARKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geopoint_validity_ranges() {
        assert!(GeoPoint::new(18.79, 98.99).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn fixture_has_six_landmarks_with_unique_ids() {
        let landmarks = chiang_mai_landmarks();
        assert_eq!(landmarks.len(), 6);

        let mut ids: Vec<&str> = landmarks.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn fixture_positions_are_valid() {
        for landmark in chiang_mai_landmarks() {
            assert!(landmark.position.is_valid(), "{} invalid", landmark.id);
            assert!(landmark.radius_m > 0.0);
        }
    }
}
