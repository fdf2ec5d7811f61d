//! Weighted route scoring and recommendation.

use rust_decimal::Decimal;

use super::types::{RouteEstimate, TravelMode};
use crate::error::RouteError;

/// Weight for the emissions term.
const W_CO2: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5
/// Weight for the duration term.
const W_TIME: Decimal = Decimal::from_parts(3, 0, 0, false, 1); // 0.3
/// Weight for the distance term.
const W_DIST: Decimal = Decimal::from_parts(2, 0, 0, false, 1); // 0.2

fn normalized(value: Decimal, worst: Decimal) -> Decimal {
    if worst.is_zero() {
        Decimal::ZERO
    } else {
        value / worst
    }
}

/// Score candidates in place and return the recommended mode.
///
/// Each term is normalized against the worst candidate in the set, so scores
/// fall in [0, 1] and only compare within one candidate list. Lower is
/// better; ties go to the greener mode.
pub fn score_candidates(candidates: &mut [RouteEstimate]) -> Result<TravelMode, RouteError> {
    if candidates.is_empty() {
        return Err(RouteError::EmptyComparison);
    }

    let worst_co2 = candidates.iter().map(|r| r.co2_kg).max().unwrap_or_default();
    let worst_time = candidates
        .iter()
        .map(|r| r.duration_min)
        .max()
        .unwrap_or_default();
    let worst_dist = candidates
        .iter()
        .map(|r| r.distance_km)
        .max()
        .unwrap_or_default();

    for candidate in candidates.iter_mut() {
        let co2_norm = normalized(candidate.co2_kg, worst_co2);
        let time_norm = normalized(candidate.duration_min, worst_time);
        let dist_norm = normalized(candidate.distance_km, worst_dist);

        candidate.score =
            (W_CO2 * co2_norm + W_TIME * time_norm + W_DIST * dist_norm).round_dp(4);
    }

    let recommended = candidates
        .iter()
        .min_by(|a, b| a.score.cmp(&b.score).then(a.mode.rank().cmp(&b.mode.rank())))
        .map(|r| r.mode)
        .ok_or(RouteError::EmptyComparison)?;

    Ok(recommended)
}
