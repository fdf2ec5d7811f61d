//! Geofenced check-in flow: locate, dedupe, award.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::error::{CheckInError, GeoError};
use crate::geo::{Geofence, GeoPoint};
use crate::rewards::MilesLedger;

/// A client-reported check-in attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    /// Account checking in.
    pub user_id: String,
    /// Display name for first-touch account creation.
    pub display_name: Option<String>,
    /// Reported latitude.
    pub lat: f64,
    /// Reported longitude.
    pub lon: f64,
    /// Landmark the client believes it is at. Optional; when present it
    /// must match the landmark the position resolves to.
    pub landmark_id: Option<String>,
}

/// A successful check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInReceipt {
    /// Account that checked in.
    pub user_id: String,
    /// Landmark checked in at.
    pub landmark_id: String,
    /// Landmark display name.
    pub landmark_name: String,
    /// Distance from the landmark center in meters.
    pub distance_m: f64,
    /// Bonus miles awarded.
    pub miles_awarded: Decimal,
    /// Balance after the award.
    pub balance: Decimal,
    /// When the check-in was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub checked_at: OffsetDateTime,
}

/// Verify a reported position against the geofence set and award the
/// check-in bonus, once per user per landmark.
#[instrument(skip(geofence, ledger, req), fields(user = %req.user_id))]
pub fn check_in(
    geofence: &Geofence,
    ledger: &MilesLedger,
    req: &CheckInRequest,
    bonus_miles: Decimal,
) -> Result<CheckInReceipt, CheckInError> {
    let point = GeoPoint::new(req.lat, req.lon);
    if !point.is_valid() {
        return Err(GeoError::InvalidCoordinate {
            lat: req.lat,
            lon: req.lon,
        }
        .into());
    }

    // A claimed landmark must at least exist before we compare it.
    if let Some(claimed) = &req.landmark_id {
        geofence.get(claimed)?;
    }

    let (landmark, distance_m) = match geofence.locate(point) {
        Some(hit) => hit,
        None => {
            let (nearest, distance_m) = geofence
                .nearest(point)
                .map(|(l, d)| (l.id.clone(), d))
                .unwrap_or_else(|| ("<none>".to_string(), f64::INFINITY));

            warn!(nearest = %nearest, distance_m, "check-in outside every geofence");
            return Err(CheckInError::OutsideGeofence { nearest, distance_m });
        }
    };

    if let Some(claimed) = &req.landmark_id {
        if claimed != &landmark.id {
            return Err(CheckInError::LandmarkMismatch {
                claimed: claimed.clone(),
                located: landmark.id.clone(),
            });
        }
    }

    let balance = ledger
        .checkin_award(
            &req.user_id,
            req.display_name.as_deref(),
            &landmark.id,
            bonus_miles,
            Some(landmark.name.clone()),
        )
        .ok_or_else(|| CheckInError::AlreadyCheckedIn {
            landmark_id: landmark.id.clone(),
        })?;

    info!(
        landmark = %landmark.id,
        distance_m,
        miles = %bonus_miles,
        "check-in accepted"
    );

    Ok(CheckInReceipt {
        user_id: req.user_id.clone(),
        landmark_id: landmark.id.clone(),
        landmark_name: landmark.name.clone(),
        distance_m,
        miles_awarded: bonus_miles,
        balance,
        checked_at: OffsetDateTime::now_utc(),
    })
}
