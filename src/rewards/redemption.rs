//! Redemption codes: issue, validate, consume, cancel.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use strum::{Display, EnumString};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::ledger::{EarnReason, MilesLedger};
use super::offers::find_offer;
use crate::error::RewardError;

/// Code alphabet without lookalike characters (I, L, O, 0, 1).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

static CODE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^GM-[A-HJKMNP-Z2-9]{4}-[A-HJKMNP-Z2-9]{4}$").expect("static regex")
});

/// Lifecycle state of a redemption code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RedemptionState {
    /// Issued and spendable.
    Issued,
    /// Consumed at a partner.
    Used,
    /// Cancelled and refunded.
    Cancelled,
}

/// An issued redemption.
#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    /// Single-use code in `GM-XXXX-XXXX` form.
    pub code: String,
    /// Account the code was issued to.
    pub user_id: String,
    /// Offer the code redeems.
    pub offer_id: String,
    /// Miles debited at issue time.
    pub cost_miles: Decimal,
    /// Current lifecycle state.
    pub state: RedemptionState,
    /// Issue time.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
}

fn generate_code() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let mut chars = bytes
        .iter()
        .map(|b| CODE_ALPHABET[*b as usize % CODE_ALPHABET.len()] as char);

    let head: String = chars.by_ref().take(4).collect();
    let tail: String = chars.take(4).collect();
    format!("GM-{head}-{tail}")
}

/// Concurrent in-memory store of issued codes.
#[derive(Debug, Default)]
pub struct RedemptionBook {
    codes: DashMap<String, Redemption>,
}

impl RedemptionBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Redeem an offer: debit the ledger and issue a fresh code.
    pub fn issue(
        &self,
        ledger: &MilesLedger,
        user_id: &str,
        offer_id: &str,
    ) -> Result<Redemption, RewardError> {
        let offer =
            find_offer(offer_id).ok_or_else(|| RewardError::UnknownOffer(offer_id.to_string()))?;

        if !offer.available {
            return Err(RewardError::OfferUnavailable(offer.id.clone()));
        }

        ledger.debit(
            user_id,
            offer.cost_miles,
            Some(format!("redeemed {}", offer.id)),
        )?;

        // Collisions are vanishingly rare but cheap to re-roll.
        let redemption = loop {
            let code = generate_code();
            let entry = self.codes.entry(code.clone());
            if let dashmap::mapref::entry::Entry::Vacant(vacant) = entry {
                let redemption = Redemption {
                    code,
                    user_id: user_id.to_string(),
                    offer_id: offer.id.clone(),
                    cost_miles: offer.cost_miles,
                    state: RedemptionState::Issued,
                    issued_at: OffsetDateTime::now_utc(),
                };
                vacant.insert(redemption.clone());
                break redemption;
            }
        };

        info!(user = user_id, offer = offer_id, code = %redemption.code, "redemption issued");
        Ok(redemption)
    }

    /// Look up a code in any state.
    pub fn validate(&self, code: &str) -> Result<Redemption, RewardError> {
        if !CODE_FORMAT.is_match(code) {
            return Err(RewardError::MalformedCode(code.to_string()));
        }

        self.codes
            .get(code)
            .map(|r| r.clone())
            .ok_or_else(|| RewardError::UnknownCode(code.to_string()))
    }

    /// Consume an issued code at a partner.
    pub fn consume(&self, code: &str) -> Result<Redemption, RewardError> {
        if !CODE_FORMAT.is_match(code) {
            return Err(RewardError::MalformedCode(code.to_string()));
        }

        let mut entry = self
            .codes
            .get_mut(code)
            .ok_or_else(|| RewardError::UnknownCode(code.to_string()))?;

        match entry.state {
            RedemptionState::Issued => {
                entry.state = RedemptionState::Used;
                Ok(entry.clone())
            }
            RedemptionState::Used => Err(RewardError::CodeAlreadyUsed(code.to_string())),
            RedemptionState::Cancelled => Err(RewardError::CodeCancelled(code.to_string())),
        }
    }

    /// Cancel an issued code and refund its miles.
    pub fn cancel(&self, ledger: &MilesLedger, code: &str) -> Result<Redemption, RewardError> {
        if !CODE_FORMAT.is_match(code) {
            return Err(RewardError::MalformedCode(code.to_string()));
        }

        let refunded = {
            let mut entry = self
                .codes
                .get_mut(code)
                .ok_or_else(|| RewardError::UnknownCode(code.to_string()))?;

            match entry.state {
                RedemptionState::Issued => {
                    entry.state = RedemptionState::Cancelled;
                    entry.clone()
                }
                RedemptionState::Used => {
                    return Err(RewardError::CodeAlreadyUsed(code.to_string()))
                }
                RedemptionState::Cancelled => {
                    return Err(RewardError::CodeCancelled(code.to_string()))
                }
            }
        };

        ledger.earn(
            &refunded.user_id,
            None,
            refunded.cost_miles,
            EarnReason::Adjustment,
            Some(format!("refund {}", refunded.code)),
        )?;

        Ok(refunded)
    }
}
