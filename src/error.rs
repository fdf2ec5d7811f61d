//! Unified error types for the greenmiles service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

/// Unified error type for the greenmiles service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request failed field-level validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Coordinate or landmark error.
    #[error("geo error: {0}")]
    Geo(#[from] GeoError),

    /// Route comparison error.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// Reward ledger or redemption error.
    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    /// Check-in error.
    #[error("check-in error: {0}")]
    CheckIn(#[from] CheckInError),

    /// Story content error.
    #[error("story error: {0}")]
    Story(#[from] StoryError),

    /// Forecast error.
    #[error("forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coordinate validation and landmark lookup errors.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Latitude or longitude outside valid ranges.
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate {
        /// Reported latitude.
        lat: f64,
        /// Reported longitude.
        lon: f64,
    },

    /// Landmark id not in the catalog.
    #[error("unknown landmark: {0}")]
    UnknownLandmark(String),
}

/// Route comparison and scoring errors.
#[derive(Error, Debug)]
pub enum RouteError {
    /// Scoring was asked to pick from zero candidates.
    #[error("no route candidates to compare")]
    EmptyComparison,

    /// Origin or destination could not be resolved from the request.
    #[error("unresolved endpoint: {0}")]
    UnresolvedEndpoint(String),
}

/// Reward ledger and redemption errors.
#[derive(Error, Debug)]
pub enum RewardError {
    /// No account exists for the user.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Offer id not in the catalog.
    #[error("unknown offer: {0}")]
    UnknownOffer(String),

    /// Offer exists but cannot currently be redeemed.
    #[error("offer unavailable: {0}")]
    OfferUnavailable(String),

    /// Balance does not cover the requested debit.
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        /// Miles required.
        required: Decimal,
        /// Miles available.
        available: Decimal,
    },

    /// Negative earn outside an adjustment.
    #[error("negative earn of {0} requires an adjustment")]
    NegativeEarn(Decimal),

    /// Code does not match the issued-code format.
    #[error("malformed redemption code: {0}")]
    MalformedCode(String),

    /// Code was never issued.
    #[error("unknown redemption code: {0}")]
    UnknownCode(String),

    /// Code was already consumed.
    #[error("redemption code already used: {0}")]
    CodeAlreadyUsed(String),

    /// Code was cancelled and refunded.
    #[error("redemption code cancelled: {0}")]
    CodeCancelled(String),
}

/// Geofenced check-in errors.
#[derive(Error, Debug)]
pub enum CheckInError {
    /// Position failed coordinate validation.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Position is not inside any landmark geofence.
    #[error("position is outside every geofence (nearest: {nearest}, {distance_m:.0}m away)")]
    OutsideGeofence {
        /// Nearest landmark id.
        nearest: String,
        /// Distance to that landmark's center in meters.
        distance_m: f64,
    },

    /// Claimed landmark differs from the one the position falls in.
    #[error("claimed landmark {claimed} but position is at {located}")]
    LandmarkMismatch {
        /// Landmark id the client claimed.
        claimed: String,
        /// Landmark id the position resolves to.
        located: String,
    },

    /// User already checked in at this landmark.
    #[error("already checked in at {landmark_id}")]
    AlreadyCheckedIn {
        /// The repeated landmark.
        landmark_id: String,
    },
}

/// Story lookup errors.
#[derive(Error, Debug)]
pub enum StoryError {
    /// No story content for the landmark.
    #[error("no story for landmark: {0}")]
    NotFound(String),
}

/// Forecast request errors.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Start date failed to parse as YYYY-MM-DD.
    #[error("invalid start date: {0}")]
    InvalidDate(String),
}

impl AppError {
    /// HTTP status this error maps to.
    ///
    /// Validation failures are 400, missing entities 404, state conflicts
    /// 409, everything unexpected 500.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Geo(GeoError::InvalidCoordinate { .. }) => StatusCode::BAD_REQUEST,
            AppError::Geo(GeoError::UnknownLandmark(_)) => StatusCode::NOT_FOUND,
            AppError::Route(RouteError::UnresolvedEndpoint(_)) => StatusCode::BAD_REQUEST,
            AppError::Route(RouteError::EmptyComparison) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Reward(e) => match e {
                RewardError::UnknownUser(_)
                | RewardError::UnknownOffer(_)
                | RewardError::UnknownCode(_) => StatusCode::NOT_FOUND,
                RewardError::OfferUnavailable(_)
                | RewardError::CodeAlreadyUsed(_)
                | RewardError::CodeCancelled(_) => StatusCode::CONFLICT,
                RewardError::InsufficientBalance { .. }
                | RewardError::NegativeEarn(_)
                | RewardError::MalformedCode(_) => StatusCode::BAD_REQUEST,
            },
            AppError::CheckIn(e) => match e {
                CheckInError::Geo(GeoError::InvalidCoordinate { .. }) => StatusCode::BAD_REQUEST,
                CheckInError::Geo(GeoError::UnknownLandmark(_)) => StatusCode::NOT_FOUND,
                CheckInError::OutsideGeofence { .. } | CheckInError::LandmarkMismatch { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CheckInError::AlreadyCheckedIn { .. } => StatusCode::CONFLICT,
            },
            AppError::Story(StoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Forecast(ForecastError::InvalidDate(_)) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Json(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx details stay in the logs, not in the response body.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
