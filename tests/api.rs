//! Endpoint contract tests driven through the router, no network.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use greenmiles::api::{create_router, AppState};
use greenmiles::rewards::EarnReason;

fn test_app() -> (AppState, Router) {
    let state = AppState::new();
    state.set_ready(true);
    let router = create_router(state.clone());
    (state, router)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

// === Travel data ===

#[tokio::test]
async fn travel_data_between_landmarks_recommends_a_green_mode() {
    let (_state, router) = test_app();

    let (status, body) = send(
        &router,
        get("/api/v1/travel-data?from=tha-phae-gate&to=wat-phra-singh"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommended"], json!("bicycle"));
    assert_eq!(body["routes"].as_array().unwrap().len(), 4);
    assert_eq!(body["origin"]["id"], json!("tha-phae-gate"));

    // Car earns no miles on this corridor.
    let car = body["routes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["mode"] == json!("car"))
        .unwrap();
    assert_eq!(car["miles_earned"], json!("0"));
}

#[tokio::test]
async fn travel_data_is_deterministic() {
    let (_state, router) = test_app();
    let uri = "/api/v1/travel-data?from=tha-phae-gate&to=warorot-market";

    let (_, first) = send(&router, get(uri)).await;
    let (_, second) = send(&router, get(uri)).await;

    assert_eq!(first["recommended"], second["recommended"]);
    assert_eq!(first["routes"], second["routes"]);
}

#[tokio::test]
async fn travel_data_with_raw_coordinates_synthesizes_routes() {
    let (_state, router) = test_app();

    let (status, body) = send(
        &router,
        get("/api/v1/travel-data?from_lat=18.7877&from_lon=98.9931&to_lat=18.7960&to_lon=98.9680"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["routes"].as_array().unwrap().len(), 4);
    assert!(body["recommended"] != json!("car"));
}

#[tokio::test]
async fn travel_data_unknown_landmark_is_404() {
    let (_state, router) = test_app();

    let (status, body) = send(&router, get("/api/v1/travel-data?from=atlantis&to=tha-phae-gate")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("atlantis"));
}

#[tokio::test]
async fn travel_data_without_endpoints_is_400() {
    let (_state, router) = test_app();

    let (status, _) = send(&router, get("/api/v1/travel-data")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A lone latitude is not enough.
    let (status, _) = send(&router, get("/api/v1/travel-data?from_lat=18.78&to=tha-phae-gate")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn travel_data_rejects_out_of_range_coordinates() {
    let (_state, router) = test_app();

    let (status, _) = send(
        &router,
        get("/api/v1/travel-data?from_lat=91.0&from_lon=98.99&to=tha-phae-gate"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// === Green Miles ===

#[tokio::test]
async fn earn_credits_miles_computed_from_the_route() {
    let (_state, router) = test_app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/v1/green-miles/earn",
            json!({
                "user_id": "nok",
                "display_name": "Nok",
                "mode": "songthaew",
                "distance_km": 4
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // (0.192 - 0.089) * 4 = 0.412 kg saved -> 4 miles at the default rate.
    assert_eq!(body["co2_saved_kg"], json!("0.412"));
    assert_eq!(body["miles_earned"], json!("4"));
    assert_eq!(body["balance"], json!("4"));

    let (status, profile) = send(&router, get("/api/v1/user/nok")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["display_name"], json!("Nok"));
    assert_eq!(profile["balance"], json!("4"));
    assert_eq!(profile["level"], json!("seedling"));

    let (status, miles) = send(&router, get("/api/v1/green-miles/nok")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(miles["ledger"].as_array().unwrap().len(), 1);
    assert_eq!(miles["ledger"][0]["reason"], json!("eco_route"));
}

#[tokio::test]
async fn earn_with_car_credits_zero_miles() {
    let (_state, router) = test_app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/v1/green-miles/earn",
            json!({ "user_id": "nok", "mode": "car", "distance_km": 10 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["miles_earned"], json!("0"));
}

#[tokio::test]
async fn earn_validation_failures_are_400() {
    let (_state, router) = test_app();

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/green-miles/earn",
            json!({ "user_id": "", "mode": "walk", "distance_km": 2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/green-miles/earn",
            json!({ "user_id": "nok", "mode": "walk", "distance_km": -2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_lookups_are_404() {
    let (_state, router) = test_app();

    let (status, _) = send(&router, get("/api/v1/user/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, get("/api/v1/green-miles/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Redemption ===

#[tokio::test]
async fn redeem_issue_validate_consume_flow() {
    let (state, router) = test_app();
    state
        .ledger
        .earn("mai", None, dec!(500), EarnReason::EcoRoute, None)
        .unwrap();

    let (status, redemption) = send(
        &router,
        post_json(
            "/api/v1/redeem",
            json!({ "user_id": "mai", "offer_id": "free-coffee" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let code = redemption["code"].as_str().unwrap().to_string();
    assert!(code.starts_with("GM-"), "unexpected code {code}");
    assert_eq!(redemption["state"], json!("issued"));

    // Balance was debited.
    let (_, profile) = send(&router, get("/api/v1/user/mai")).await;
    assert_eq!(profile["balance"], json!("380"));
    assert_eq!(profile["lifetime_miles"], json!("500"));

    // Validate leaves the code issued; consume flips it to used.
    let (status, validated) = send(
        &router,
        post_json("/api/v1/redeem/validate", json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(validated["state"], json!("issued"));

    let (status, consumed) = send(
        &router,
        post_json("/api/v1/redeem/consume", json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(consumed["state"], json!("used"));

    // Second consume conflicts.
    let (status, _) = send(
        &router,
        post_json("/api/v1/redeem/consume", json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_refunds_and_blocks_consume() {
    let (state, router) = test_app();
    state
        .ledger
        .earn("mai", None, dec!(500), EarnReason::EcoRoute, None)
        .unwrap();

    let (_, redemption) = send(
        &router,
        post_json(
            "/api/v1/redeem",
            json!({ "user_id": "mai", "offer_id": "songthaew-day-pass" }),
        ),
    )
    .await;
    let code = redemption["code"].as_str().unwrap().to_string();

    let (_, profile) = send(&router, get("/api/v1/user/mai")).await;
    assert_eq!(profile["balance"], json!("300"));

    let (status, cancelled) = send(
        &router,
        post_json("/api/v1/redeem/cancel", json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["state"], json!("cancelled"));

    // Miles are back; the code is dead.
    let (_, profile) = send(&router, get("/api/v1/user/mai")).await;
    assert_eq!(profile["balance"], json!("500"));

    let (status, _) = send(
        &router,
        post_json("/api/v1/redeem/consume", json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn redeem_with_insufficient_balance_is_400() {
    let (state, router) = test_app();
    state
        .ledger
        .earn("mai", None, dec!(10), EarnReason::EcoRoute, None)
        .unwrap();

    let (status, body) = send(
        &router,
        post_json(
            "/api/v1/redeem",
            json!({ "user_id": "mai", "offer_id": "free-coffee" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("insufficient"));
}

#[tokio::test]
async fn redeem_unknown_offer_is_404_and_unavailable_is_409() {
    let (state, router) = test_app();
    state
        .ledger
        .earn("mai", None, dec!(1000), EarnReason::EcoRoute, None)
        .unwrap();

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/redeem",
            json!({ "user_id": "mai", "offer_id": "solid-gold-elephant" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/redeem",
            json!({ "user_id": "mai", "offer_id": "museum-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn validate_rejects_malformed_and_unknown_codes() {
    let (_state, router) = test_app();

    let (status, _) = send(
        &router,
        post_json("/api/v1/redeem/validate", json!({ "code": "not-a-code" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        post_json("/api/v1/redeem/validate", json!({ "code": "GM-AAAA-BBBB" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn offers_listing_includes_unavailable_offers() {
    let (_state, router) = test_app();

    let (status, body) = send(&router, get("/api/v1/offers")).await;

    assert_eq!(status, StatusCode::OK);
    let offers = body.as_array().unwrap();
    assert_eq!(offers.len(), 5);
    assert!(offers.iter().any(|o| o["available"] == json!(false)));
}

// === Check-ins ===

#[tokio::test]
async fn checkin_inside_geofence_awards_bonus_once() {
    let (_state, router) = test_app();
    let request = json!({ "user_id": "nok", "lat": 18.7877, "lon": 98.9934 });

    let (status, receipt) = send(&router, post_json("/api/v1/checkin", request.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["landmark_id"], json!("tha-phae-gate"));
    assert_eq!(receipt["miles_awarded"], json!("25"));
    assert_eq!(receipt["balance"], json!("25"));

    // Repeat is a conflict and does not double-award.
    let (status, _) = send(&router, post_json("/api/v1/checkin", request)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, profile) = send(&router, get("/api/v1/user/nok")).await;
    assert_eq!(profile["balance"], json!("25"));
    assert_eq!(
        profile["checked_in_landmarks"],
        json!(["tha-phae-gate"])
    );
}

#[tokio::test]
async fn checkin_outside_every_geofence_is_400() {
    let (_state, router) = test_app();

    let (status, body) = send(
        &router,
        post_json(
            "/api/v1/checkin",
            json!({ "user_id": "nok", "lat": 18.8048, "lon": 98.9216 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("outside"));
}

#[tokio::test]
async fn checkin_with_invalid_coordinates_is_400() {
    let (_state, router) = test_app();

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/checkin",
            json!({ "user_id": "nok", "lat": 123.0, "lon": 98.99 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkin_claimed_landmark_must_match() {
    let (_state, router) = test_app();

    let (status, _) = send(
        &router,
        post_json(
            "/api/v1/checkin",
            json!({
                "user_id": "nok",
                "lat": 18.7877,
                "lon": 98.9934,
                "landmark_id": "warorot-market"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn landmarks_listing_returns_the_fixture() {
    let (_state, router) = test_app();

    let (status, body) = send(&router, get("/api/v1/landmarks")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);
}

// === Stories ===

#[tokio::test]
async fn stories_listing_and_detail() {
    let (_state, router) = test_app();

    let (status, listing) = send(&router, get("/api/v1/stories")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!listing.as_array().unwrap().is_empty());

    let (status, story) = send(&router, get("/api/v1/stories/wat-phra-singh")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(story["chapters"].as_array().unwrap().len(), 3);
    assert_eq!(story["chapters"][0]["seq"], json!(1));
}

#[tokio::test]
async fn story_for_landmark_without_content_is_404() {
    let (_state, router) = test_app();

    let (status, _) = send(&router, get("/api/v1/stories/nong-buak-haad-park")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Forecast ===

#[tokio::test]
async fn forecast_returns_seven_days_from_start() {
    let (_state, router) = test_app();

    let (status, body) = send(&router, get("/api/v1/forecast?start=2026-08-06")).await;

    assert_eq!(status, StatusCode::OK);
    let days = body.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], json!("2026-08-06"));
    assert!(days.iter().all(|d| !d["advice"].as_str().unwrap().is_empty()));
}

#[tokio::test]
async fn forecast_with_invalid_start_is_400() {
    let (_state, router) = test_app();

    let (status, _) = send(&router, get("/api/v1/forecast?start=tomorrow")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// === Leaderboard ===

#[tokio::test]
async fn leaderboard_orders_and_limits() {
    let (state, router) = test_app();
    state
        .ledger
        .earn("a", None, dec!(300), EarnReason::EcoRoute, None)
        .unwrap();
    state
        .ledger
        .earn("b", None, dec!(700), EarnReason::EcoRoute, None)
        .unwrap();
    state
        .ledger
        .earn("c", None, dec!(100), EarnReason::EcoRoute, None)
        .unwrap();

    let (status, body) = send(&router, get("/api/v1/leaderboard?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["user_id"], json!("b"));
    assert_eq!(rows[0]["rank"], json!(1));
    assert_eq!(rows[0]["level"], json!("tree"));
    assert_eq!(rows[1]["user_id"], json!("a"));
}
