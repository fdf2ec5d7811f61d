//! Route comparison types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::geo::GeoPoint;

/// Travel mode for a route candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TravelMode {
    /// On foot.
    #[default]
    Walk,
    /// Bicycle (rental or own).
    Bicycle,
    /// Shared red truck taxi.
    Songthaew,
    /// Private car.
    Car,
}

impl TravelMode {
    /// Every mode, in preference order for tie-breaking.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Walk,
        TravelMode::Bicycle,
        TravelMode::Songthaew,
        TravelMode::Car,
    ];

    /// Tie-break rank: greener modes sort first.
    pub fn rank(&self) -> u8 {
        match self {
            TravelMode::Walk => 0,
            TravelMode::Bicycle => 1,
            TravelMode::Songthaew => 2,
            TravelMode::Car => 3,
        }
    }
}

/// One end of a route comparison.
#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    /// Landmark id when the endpoint is a known landmark.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Position.
    pub position: GeoPoint,
}

impl Waypoint {
    /// Waypoint for a known landmark.
    pub fn landmark(id: impl Into<String>, name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            position,
        }
    }

    /// Waypoint for a raw coordinate.
    pub fn point(position: GeoPoint) -> Self {
        Self {
            id: None,
            name: format!("{:.4},{:.4}", position.lat, position.lon),
            position,
        }
    }
}

/// Distance and duration for one mode over a corridor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Travel mode.
    pub mode: TravelMode,
    /// Route distance in kilometers.
    pub distance_km: Decimal,
    /// Door-to-door duration in minutes.
    pub duration_min: Decimal,
}

/// A scored route candidate.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEstimate {
    /// Travel mode.
    pub mode: TravelMode,
    /// Route distance in kilometers.
    pub distance_km: Decimal,
    /// Door-to-door duration in minutes.
    pub duration_min: Decimal,
    /// Estimated emissions for this route in kg CO2.
    pub co2_kg: Decimal,
    /// Emissions saved versus driving the same corridor.
    pub co2_saved_kg: Decimal,
    /// Green Miles earned by completing this route.
    pub miles_earned: Decimal,
    /// Weighted score; lower is better.
    pub score: Decimal,
}

/// Result of comparing all modes over one corridor.
#[derive(Debug, Clone, Serialize)]
pub struct RouteComparison {
    /// Origin endpoint.
    pub origin: Waypoint,
    /// Destination endpoint.
    pub destination: Waypoint,
    /// Scored candidates, one per mode.
    pub routes: Vec<RouteEstimate>,
    /// Mode of the lowest-scoring candidate.
    pub recommended: TravelMode,
    /// When the comparison was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

impl RouteComparison {
    /// The recommended candidate.
    pub fn recommended_route(&self) -> Option<&RouteEstimate> {
        self.routes.iter().find(|r| r.mode == self.recommended)
    }

    /// Compact per-mode score listing for logs.
    pub fn summarize(&self) -> String {
        let scores: Vec<String> = self
            .routes
            .iter()
            .map(|r| format!("{}={}", r.mode, r.score))
            .collect();
        format!("{} -> {}", scores.join(" "), self.recommended)
    }
}
