//! HTTP API route definitions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    cancel_code, check_in_handler, consume_code, earn_miles, forecast_week, green_miles, health,
    landmarks_index, leaderboard, metrics_text, offers_index, ready, redeem, stories_index,
    story_detail, travel_data, user_profile, validate_code, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_text))
        // Route comparison
        .route("/api/v1/travel-data", get(travel_data))
        // Green Miles
        .route("/api/v1/green-miles/earn", post(earn_miles))
        .route("/api/v1/green-miles/:user_id", get(green_miles))
        .route("/api/v1/user/:user_id", get(user_profile))
        .route("/api/v1/leaderboard", get(leaderboard))
        // Redemption
        .route("/api/v1/offers", get(offers_index))
        .route("/api/v1/redeem", post(redeem))
        .route("/api/v1/redeem/validate", post(validate_code))
        .route("/api/v1/redeem/consume", post(consume_code))
        .route("/api/v1/redeem/cancel", post(cancel_code))
        // Check-ins and content
        .route("/api/v1/checkin", post(check_in_handler))
        .route("/api/v1/landmarks", get(landmarks_index))
        .route("/api/v1/stories", get(stories_index))
        .route("/api/v1/stories/:landmark_id", get(story_detail))
        .route("/api/v1/forecast", get(forecast_week))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create a minimal health-only router (for startup).
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let state = AppState::new();
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_when_not_ready() {
        let state = AppState::new();
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_when_ready() {
        let state = AppState::new();
        state.set_ready(true);
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_empty_without_recorder() {
        let state = AppState::new();
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
