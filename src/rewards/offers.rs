//! Reward offer catalog.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A partner reward that miles can be exchanged for.
#[derive(Debug, Clone, Serialize)]
pub struct RewardOffer {
    /// Stable offer id.
    pub id: String,
    /// Offer title.
    pub title: String,
    /// Miles debited on redemption.
    pub cost_miles: Decimal,
    /// Partner fulfilling the offer.
    pub partner: String,
    /// Whether the offer can currently be redeemed.
    pub available: bool,
}

fn offer(id: &str, title: &str, cost_miles: Decimal, partner: &str, available: bool) -> RewardOffer {
    RewardOffer {
        id: id.to_string(),
        title: title.to_string(),
        cost_miles,
        partner: partner.to_string(),
        available,
    }
}

static OFFERS: Lazy<Vec<RewardOffer>> = Lazy::new(|| {
    vec![
        offer(
            "free-coffee",
            "Free drip coffee",
            dec!(120),
            "Akha Ama Coffee",
            true,
        ),
        offer(
            "songthaew-day-pass",
            "Songthaew day pass",
            dec!(200),
            "Red Truck Co-op",
            true,
        ),
        offer(
            "craft-workshop",
            "20% off a craft workshop",
            dec!(350),
            "Baan Kang Wat",
            true,
        ),
        offer(
            "tree-planting",
            "Plant a tree on Doi Suthep",
            dec!(500),
            "Mae Sa Reforestation",
            true,
        ),
        offer(
            "museum-pass",
            "Lanna Folklife Museum pass",
            dec!(150),
            "City Museums",
            false, // out of stock this season
        ),
    ]
});

/// All offers, redeemable or not.
pub fn offers() -> &'static [RewardOffer] {
    &OFFERS
}

/// Offer lookup by id.
pub fn find_offer(id: &str) -> Option<&'static RewardOffer> {
    OFFERS.iter().find(|o| o.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_ids_are_unique() {
        let mut ids: Vec<&str> = offers().iter().map(|o| o.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), offers().len());
    }

    #[test]
    fn find_offer_resolves_known_ids() {
        let coffee = find_offer("free-coffee").unwrap();
        assert!(coffee.available);
        assert!(coffee.cost_miles > Decimal::ZERO);

        assert!(find_offer("solid-gold-elephant").is_none());
    }

    #[test]
    fn fixture_includes_an_unavailable_offer() {
        assert!(offers().iter().any(|o| !o.available));
    }
}
