//! Eco-route comparison engine.
//!
//! This module handles:
//! - The curated corridor catalog and Haversine fallback
//! - Per-mode CO2 estimates and Green Miles conversion
//! - Weighted distance/CO2/time scoring and recommendation

pub mod catalog;
pub mod comparison;
pub mod emissions;
pub mod scorer;
pub mod types;

pub use comparison::build_comparison;
pub use emissions::{co2_saved_vs_car, estimate, miles_for_saving};
pub use scorer::score_candidates;
pub use types::{RouteComparison, RouteEstimate, RouteLeg, TravelMode, Waypoint};
