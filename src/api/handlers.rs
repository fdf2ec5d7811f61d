//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::checkin::{check_in, CheckInReceipt, CheckInRequest};
use crate::config::Config;
use crate::error::{AppError, ForecastError, GeoError, RouteError};
use crate::forecast::{seven_day, ForecastDay};
use crate::geo::{Geofence, GeoPoint, Landmark};
use crate::metrics;
use crate::rewards::{
    offers, EarnReason, LeaderboardRow, LedgerEntry, Level, MilesLedger, Redemption,
    RedemptionBook, RewardOffer, UserProfile,
};
use crate::routing::{build_comparison, emissions, RouteComparison, TravelMode, Waypoint};
use crate::stories::{story_for, story_summaries, Story, StorySummary};

/// Tunables handlers read from the config.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Green Miles per kg CO2 saved.
    pub miles_per_kg_co2: Decimal,
    /// Bonus for a geofenced check-in.
    pub checkin_bonus_miles: Decimal,
    /// Ledger entries returned with a green-miles lookup.
    pub ledger_tail: usize,
    /// Upper bound for the leaderboard `limit` parameter.
    pub leaderboard_max: usize,
}

impl From<&Config> for RuntimeSettings {
    fn from(config: &Config) -> Self {
        Self {
            miles_per_kg_co2: config.miles_per_kg_co2,
            checkin_bonus_miles: config.checkin_bonus_miles,
            ledger_tail: config.ledger_tail,
            leaderboard_max: config.leaderboard_max,
        }
    }
}

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the service is ready to serve traffic.
    pub ready: Arc<AtomicBool>,
    /// Landmark geofences.
    pub geofence: Arc<Geofence>,
    /// Green Miles accounts and ledger.
    pub ledger: Arc<MilesLedger>,
    /// Issued redemption codes.
    pub redemptions: Arc<RedemptionBook>,
    /// Config-derived tunables.
    pub settings: Arc<RuntimeSettings>,
    /// Prometheus render handle, when the recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// App state with default settings and the Chiang Mai fixtures.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// App state from a loaded config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            geofence: Arc::new(Geofence::chiang_mai()),
            ledger: Arc::new(MilesLedger::new()),
            redemptions: Arc::new(RedemptionBook::new()),
            settings: Arc::new(RuntimeSettings::from(config)),
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle for the /metrics endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the service is ready.
    pub ready: bool,
    /// Number of landmark geofences loaded.
    pub landmarks: usize,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();

    let response = ReadyResponse {
        ready: is_ready,
        landmarks: state.geofence.landmarks().len(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus exposition handler.
pub async fn metrics_text(State(state): State<AppState>) -> String {
    match &state.prometheus {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}

/// Query parameters for a route comparison.
///
/// Each endpoint is either a landmark id (`from`/`to`) or a raw coordinate
/// pair (`from_lat`/`from_lon`, `to_lat`/`to_lon`).
#[derive(Debug, Deserialize)]
pub struct TravelDataQuery {
    /// Origin landmark id.
    pub from: Option<String>,
    /// Destination landmark id.
    pub to: Option<String>,
    /// Origin latitude.
    pub from_lat: Option<f64>,
    /// Origin longitude.
    pub from_lon: Option<f64>,
    /// Destination latitude.
    pub to_lat: Option<f64>,
    /// Destination longitude.
    pub to_lon: Option<f64>,
}

fn resolve_waypoint(
    geofence: &Geofence,
    id: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
    which: &str,
) -> Result<Waypoint, AppError> {
    if let Some(id) = id {
        let landmark = geofence.get(id)?;
        return Ok(Waypoint::landmark(
            landmark.id.clone(),
            landmark.name.clone(),
            landmark.position,
        ));
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let point = GeoPoint::new(lat, lon);
            if !point.is_valid() {
                return Err(GeoError::InvalidCoordinate { lat, lon }.into());
            }
            Ok(Waypoint::point(point))
        }
        _ => Err(RouteError::UnresolvedEndpoint(format!(
            "{which} needs a landmark id or a lat/lon pair"
        ))
        .into()),
    }
}

/// Route comparison handler.
pub async fn travel_data(
    State(state): State<AppState>,
    Query(query): Query<TravelDataQuery>,
) -> Result<Json<RouteComparison>, AppError> {
    let origin = resolve_waypoint(
        &state.geofence,
        query.from.as_deref(),
        query.from_lat,
        query.from_lon,
        "origin",
    )?;
    let destination = resolve_waypoint(
        &state.geofence,
        query.to.as_deref(),
        query.to_lat,
        query.to_lon,
        "destination",
    )?;

    let _timer = metrics::timer_comparison();
    let comparison = build_comparison(origin, destination, state.settings.miles_per_kg_co2)?;
    metrics::inc_comparisons();

    Ok(Json(comparison))
}

/// Request to credit miles for a completed eco route.
///
/// Miles are computed server-side from the mode and distance; clients never
/// self-report a mile count.
#[derive(Debug, Deserialize)]
pub struct EarnRequest {
    /// Account to credit.
    pub user_id: String,
    /// Display name for first-touch account creation.
    pub display_name: Option<String>,
    /// Mode the route was completed with.
    pub mode: TravelMode,
    /// Route distance in kilometers.
    pub distance_km: Decimal,
    /// Free-form context for the ledger.
    pub note: Option<String>,
}

/// Result of an earn request.
#[derive(Debug, Serialize)]
pub struct EarnResponse {
    /// Credited account.
    pub user_id: String,
    /// Mode the award was computed for.
    pub mode: TravelMode,
    /// CO2 saved versus driving, in kg.
    pub co2_saved_kg: Decimal,
    /// Miles credited.
    pub miles_earned: Decimal,
    /// Balance after the credit.
    pub balance: Decimal,
}

/// Earn handler: convert a completed route into Green Miles.
pub async fn earn_miles(
    State(state): State<AppState>,
    Json(req): Json<EarnRequest>,
) -> Result<Json<EarnResponse>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("user_id is required".to_string()));
    }
    if req.distance_km < Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "distance_km must not be negative".to_string(),
        ));
    }

    let co2_saved_kg = emissions::co2_saved_vs_car(req.mode, req.distance_km);
    let miles_earned = emissions::miles_for_saving(co2_saved_kg, state.settings.miles_per_kg_co2);

    let note = req
        .note
        .clone()
        .or_else(|| Some(format!("{} {}km", req.mode, req.distance_km)));

    let balance = state.ledger.earn(
        &req.user_id,
        req.display_name.as_deref(),
        miles_earned,
        EarnReason::EcoRoute,
        note,
    )?;

    metrics::record_miles_awarded(miles_earned.to_f64().unwrap_or(0.0));

    Ok(Json(EarnResponse {
        user_id: req.user_id,
        mode: req.mode,
        co2_saved_kg,
        miles_earned,
        balance,
    }))
}

/// Balance plus recent ledger activity.
#[derive(Debug, Serialize)]
pub struct GreenMilesResponse {
    /// Account id.
    pub user_id: String,
    /// Spendable miles.
    pub balance: Decimal,
    /// All miles ever earned.
    pub lifetime_miles: Decimal,
    /// Account level.
    pub level: Level,
    /// Most recent ledger entries, newest last.
    pub ledger: Vec<LedgerEntry>,
}

/// Green Miles lookup handler.
pub async fn green_miles(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GreenMilesResponse>, AppError> {
    let profile = state.ledger.profile(&user_id)?;
    let ledger = state
        .ledger
        .ledger_tail(&user_id, state.settings.ledger_tail);

    Ok(Json(GreenMilesResponse {
        user_id: profile.user_id,
        balance: profile.balance,
        lifetime_miles: profile.lifetime_miles,
        level: profile.level,
        ledger,
    }))
}

/// Request to redeem an offer.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// Account redeeming.
    pub user_id: String,
    /// Offer to redeem.
    pub offer_id: String,
}

/// Redeem handler: debit miles, issue a code.
pub async fn redeem(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<Redemption>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("user_id is required".to_string()));
    }

    let redemption = state
        .redemptions
        .issue(&state.ledger, &req.user_id, &req.offer_id)?;
    metrics::inc_redemptions_issued();

    Ok(Json(redemption))
}

/// A bare redemption code.
#[derive(Debug, Deserialize)]
pub struct CodeRequest {
    /// Code in `GM-XXXX-XXXX` form.
    pub code: String,
}

/// Validate handler: look up a code in any state.
pub async fn validate_code(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<Redemption>, AppError> {
    let redemption = state.redemptions.validate(&req.code)?;
    Ok(Json(redemption))
}

/// Consume handler: spend an issued code.
pub async fn consume_code(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<Redemption>, AppError> {
    let redemption = state.redemptions.consume(&req.code)?;
    metrics::inc_redemptions_consumed();
    Ok(Json(redemption))
}

/// Cancel handler: void an issued code and refund its miles.
pub async fn cancel_code(
    State(state): State<AppState>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<Redemption>, AppError> {
    let redemption = state.redemptions.cancel(&state.ledger, &req.code)?;
    Ok(Json(redemption))
}

/// Offer catalog handler.
pub async fn offers_index() -> Json<Vec<RewardOffer>> {
    Json(offers().to_vec())
}

/// Profile handler.
pub async fn user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.ledger.profile(&user_id)?))
}

/// Check-in handler.
pub async fn check_in_handler(
    State(state): State<AppState>,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<CheckInReceipt>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("user_id is required".to_string()));
    }

    match check_in(
        &state.geofence,
        &state.ledger,
        &req,
        state.settings.checkin_bonus_miles,
    ) {
        Ok(receipt) => {
            metrics::inc_checkins_accepted();
            Ok(Json(receipt))
        }
        Err(e) => {
            metrics::inc_checkins_rejected();
            Err(e.into())
        }
    }
}

/// Landmark fixture handler.
pub async fn landmarks_index(State(state): State<AppState>) -> Json<Vec<Landmark>> {
    Json(state.geofence.landmarks().to_vec())
}

/// Story listing handler.
pub async fn stories_index() -> Json<Vec<StorySummary>> {
    Json(story_summaries())
}

/// Full story handler.
pub async fn story_detail(Path(landmark_id): Path<String>) -> Result<Json<Story>, AppError> {
    Ok(Json(story_for(&landmark_id)?.clone()))
}

/// Query parameters for the forecast.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// First day of the outlook (`YYYY-MM-DD`); defaults to today.
    pub start: Option<String>,
}

/// Forecast handler.
pub async fn forecast_week(
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Vec<ForecastDay>>, AppError> {
    let start = match query.start {
        Some(s) => Date::parse(&s, format_description!("[year]-[month]-[day]"))
            .map_err(|_| ForecastError::InvalidDate(s.clone()))?,
        None => OffsetDateTime::now_utc().date(),
    };

    Ok(Json(seven_day(start)))
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Rows to return; defaults to 10, capped by config.
    pub limit: Option<usize>,
}

/// Leaderboard handler.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardRow>> {
    let limit = query
        .limit
        .unwrap_or(10)
        .min(state.settings.leaderboard_max);

    Json(state.ledger.leaderboard(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new();
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn runtime_settings_follow_config() {
        let config = Config {
            ledger_tail: 7,
            leaderboard_max: 3,
            ..Config::default()
        };

        let settings = RuntimeSettings::from(&config);
        assert_eq!(settings.ledger_tail, 7);
        assert_eq!(settings.leaderboard_max, 3);
    }

    #[test]
    fn resolve_waypoint_prefers_landmark_id() {
        let geofence = Geofence::chiang_mai();

        let wp = resolve_waypoint(&geofence, Some("tha-phae-gate"), None, None, "origin").unwrap();
        assert_eq!(wp.id.as_deref(), Some("tha-phae-gate"));

        let err = resolve_waypoint(&geofence, Some("atlantis"), None, None, "origin");
        assert!(err.is_err());
    }

    #[test]
    fn resolve_waypoint_requires_full_coordinate_pair() {
        let geofence = Geofence::chiang_mai();

        let err = resolve_waypoint(&geofence, None, Some(18.78), None, "origin");
        assert!(err.is_err());

        let wp = resolve_waypoint(&geofence, None, Some(18.78), Some(98.99), "origin").unwrap();
        assert!(wp.id.is_none());
    }
}
