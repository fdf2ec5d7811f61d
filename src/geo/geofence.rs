//! Landmark geofence lookups.

use tracing::debug;

use super::distance::haversine_m;
use super::types::{chiang_mai_landmarks, GeoPoint, Landmark};
use crate::error::GeoError;

/// A set of landmarks queried by position.
#[derive(Debug, Clone)]
pub struct Geofence {
    landmarks: Vec<Landmark>,
}

impl Geofence {
    /// Geofence over the built-in Chiang Mai landmark fixture.
    pub fn chiang_mai() -> Self {
        Self {
            landmarks: chiang_mai_landmarks().to_vec(),
        }
    }

    /// Geofence over an explicit landmark set.
    pub fn with_landmarks(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// All landmarks in this geofence.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Look up a landmark by id.
    pub fn get(&self, id: &str) -> Result<&Landmark, GeoError> {
        self.landmarks
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| GeoError::UnknownLandmark(id.to_string()))
    }

    /// Landmark whose geofence contains the point, with the distance to its
    /// center. When radii overlap the closest center wins.
    pub fn locate(&self, point: GeoPoint) -> Option<(&Landmark, f64)> {
        self.landmarks
            .iter()
            .map(|l| (l, haversine_m(l.position, point)))
            .filter(|(l, d)| *d <= l.radius_m)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Nearest landmark regardless of containment.
    pub fn nearest(&self, point: GeoPoint) -> Option<(&Landmark, f64)> {
        let nearest = self
            .landmarks
            .iter()
            .map(|l| (l, haversine_m(l.position, point)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        if let Some((l, d)) = &nearest {
            debug!(landmark = %l.id, distance_m = d, "nearest landmark");
        }

        nearest
    }

    /// Distance from a point to a landmark's center, in meters.
    pub fn distance_to(&self, id: &str, point: GeoPoint) -> Result<f64, GeoError> {
        let landmark = self.get(id)?;
        Ok(haversine_m(landmark.position, point))
    }
}
