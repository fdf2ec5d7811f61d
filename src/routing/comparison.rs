//! Route comparison assembly: catalog legs, emissions, scores.

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::catalog::legs_between;
use super::emissions::estimate;
use super::scorer::score_candidates;
use super::types::{RouteComparison, Waypoint};
use crate::error::RouteError;

/// Build a scored comparison over every travel mode for one corridor.
#[instrument(skip_all, fields(from = %origin.name, to = %destination.name))]
pub fn build_comparison(
    origin: Waypoint,
    destination: Waypoint,
    miles_per_kg: Decimal,
) -> Result<RouteComparison, RouteError> {
    let legs = legs_between(&origin, &destination);

    let mut routes: Vec<_> = legs.iter().map(|leg| estimate(leg, miles_per_kg)).collect();
    let recommended = score_candidates(&mut routes)?;

    let comparison = RouteComparison {
        origin,
        destination,
        routes,
        recommended,
        generated_at: OffsetDateTime::now_utc(),
    };

    info!(
        recommended = %comparison.recommended,
        scores = %comparison.summarize(),
        "route comparison built"
    );

    Ok(comparison)
}
