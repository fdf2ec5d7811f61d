//! Geographic math and landmark geofencing.
//!
//! This module handles:
//! - Coordinate and landmark types
//! - Great-circle distance and bearing
//! - Geofence containment lookups

pub mod distance;
pub mod geofence;
pub mod types;

pub use distance::{bearing_deg, haversine_km, haversine_m};
pub use geofence::Geofence;
pub use types::{chiang_mai_landmarks, GeoPoint, Landmark};
