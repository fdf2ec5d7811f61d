//! Per-mode CO2 estimates and Green Miles conversion.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{RouteEstimate, RouteLeg, TravelMode};

/// Emission factor in kg CO2 per passenger-kilometer.
///
/// Songthaew rides are shared, so the per-passenger factor is well below a
/// private car's.
pub fn emission_factor_kg_per_km(mode: TravelMode) -> Decimal {
    match mode {
        TravelMode::Walk | TravelMode::Bicycle => Decimal::ZERO,
        TravelMode::Songthaew => Decimal::new(89, 3), // 0.089
        TravelMode::Car => Decimal::new(192, 3),      // 0.192
    }
}

/// Estimated emissions for a distance at a mode, in kg CO2.
pub fn co2_kg(mode: TravelMode, distance_km: Decimal) -> Decimal {
    (emission_factor_kg_per_km(mode) * distance_km).round_dp(3)
}

/// Emissions saved versus driving the same corridor, floored at zero.
pub fn co2_saved_vs_car(mode: TravelMode, distance_km: Decimal) -> Decimal {
    let saved = co2_kg(TravelMode::Car, distance_km) - co2_kg(mode, distance_km);
    saved.max(Decimal::ZERO)
}

/// Whole Green Miles for a CO2 saving at the configured multiplier.
pub fn miles_for_saving(co2_saved_kg: Decimal, miles_per_kg: Decimal) -> Decimal {
    (co2_saved_kg * miles_per_kg).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Expand a catalog leg into an unscored route candidate.
pub fn estimate(leg: &RouteLeg, miles_per_kg: Decimal) -> RouteEstimate {
    let co2 = co2_kg(leg.mode, leg.distance_km);
    let saved = co2_saved_vs_car(leg.mode, leg.distance_km);

    RouteEstimate {
        mode: leg.mode,
        distance_km: leg.distance_km,
        duration_min: leg.duration_min,
        co2_kg: co2,
        co2_saved_kg: saved,
        miles_earned: miles_for_saving(saved, miles_per_kg),
        score: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_emission_modes_save_full_car_footprint() {
        let saved = co2_saved_vs_car(TravelMode::Walk, dec!(2));
        assert_eq!(saved, dec!(0.384)); // 2km * 0.192

        let saved = co2_saved_vs_car(TravelMode::Bicycle, dec!(2));
        assert_eq!(saved, dec!(0.384));
    }

    #[test]
    fn car_saves_nothing() {
        assert_eq!(co2_saved_vs_car(TravelMode::Car, dec!(5)), Decimal::ZERO);
    }

    #[test]
    fn songthaew_saves_the_difference() {
        // (0.192 - 0.089) * 2 = 0.206
        assert_eq!(co2_saved_vs_car(TravelMode::Songthaew, dec!(2)), dec!(0.206));
    }

    #[test]
    fn miles_round_to_whole_numbers() {
        assert_eq!(miles_for_saving(dec!(0.384), dec!(10)), dec!(4));
        assert_eq!(miles_for_saving(dec!(0.34), dec!(10)), dec!(3));
        assert_eq!(miles_for_saving(dec!(0.35), dec!(10)), dec!(4));
        assert_eq!(miles_for_saving(Decimal::ZERO, dec!(10)), Decimal::ZERO);
    }

    #[test]
    fn estimate_fills_all_fields() {
        let leg = RouteLeg {
            mode: TravelMode::Walk,
            distance_km: dec!(1.5),
            duration_min: dec!(20),
        };

        let est = estimate(&leg, dec!(10));

        assert_eq!(est.co2_kg, Decimal::ZERO);
        assert_eq!(est.co2_saved_kg, dec!(0.288)); // 1.5 * 0.192
        assert_eq!(est.miles_earned, dec!(3));
        assert_eq!(est.score, Decimal::ZERO);
    }
}
