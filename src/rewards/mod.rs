//! Green Miles rewards: ledger, offers, redemption codes.
//!
//! This module handles:
//! - Concurrent in-memory accounts and the miles ledger
//! - The reward offer catalog
//! - Redemption code issue/validate/consume/cancel

pub mod ledger;
pub mod offers;
pub mod redemption;

pub use ledger::{EarnReason, LeaderboardRow, LedgerEntry, Level, MilesLedger, UserProfile};
pub use offers::{find_offer, offers, RewardOffer};
pub use redemption::{Redemption, RedemptionBook, RedemptionState};
