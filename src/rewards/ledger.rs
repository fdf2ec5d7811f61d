//! Green Miles accounts and ledger.

use std::collections::BTreeSet;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::error::RewardError;

/// Why miles were credited or debited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EarnReason {
    /// Completed an eco-friendly route.
    EcoRoute,
    /// Geofenced landmark check-in.
    CheckIn,
    /// Manual correction, redemption debit, or refund.
    Adjustment,
}

/// One ledger line.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    /// Account the entry belongs to.
    pub user_id: String,
    /// Signed miles delta.
    pub delta: Decimal,
    /// Why the delta happened.
    pub reason: EarnReason,
    /// Free-form context.
    pub note: Option<String>,
    /// When the entry was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// Account level derived from lifetime miles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    /// Under 100 lifetime miles.
    Seedling,
    /// Under 500.
    Sprout,
    /// Under 2000.
    Tree,
    /// 2000 and beyond.
    Forest,
}

impl Level {
    /// Level for a lifetime miles total.
    pub fn for_miles(lifetime: Decimal) -> Self {
        if lifetime < Decimal::new(100, 0) {
            Level::Seedling
        } else if lifetime < Decimal::new(500, 0) {
            Level::Sprout
        } else if lifetime < Decimal::new(2000, 0) {
            Level::Tree
        } else {
            Level::Forest
        }
    }
}

/// Public profile view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// Account id.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Spendable miles.
    pub balance: Decimal,
    /// All miles ever earned (redemptions do not reduce this).
    pub lifetime_miles: Decimal,
    /// Level derived from lifetime miles.
    pub level: Level,
    /// Landmarks the user has checked in at, sorted.
    pub checked_in_landmarks: Vec<String>,
    /// Account creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    /// 1-based rank.
    pub rank: usize,
    /// Account id.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Lifetime miles.
    pub lifetime_miles: Decimal,
    /// Level.
    pub level: Level,
}

#[derive(Debug, Clone)]
struct Account {
    display_name: String,
    balance: Decimal,
    lifetime_miles: Decimal,
    checked_in: BTreeSet<String>,
    created_at: OffsetDateTime,
}

impl Account {
    fn new(user_id: &str, display_name: Option<&str>) -> Self {
        Self {
            display_name: display_name.unwrap_or(user_id).to_string(),
            balance: Decimal::ZERO,
            lifetime_miles: Decimal::ZERO,
            checked_in: BTreeSet::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Concurrent in-memory Green Miles store.
#[derive(Debug, Default)]
pub struct MilesLedger {
    accounts: DashMap<String, Account>,
    entries: DashMap<String, Vec<LedgerEntry>>,
}

impl MilesLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn append_entry(&self, user_id: &str, delta: Decimal, reason: EarnReason, note: Option<String>) {
        self.entries
            .entry(user_id.to_string())
            .or_default()
            .push(LedgerEntry {
                user_id: user_id.to_string(),
                delta,
                reason,
                note,
                at: OffsetDateTime::now_utc(),
            });
    }

    /// Credit (or, for adjustments, debit) miles. Creates the account on
    /// first touch and returns the new balance.
    pub fn earn(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        delta: Decimal,
        reason: EarnReason,
        note: Option<String>,
    ) -> Result<Decimal, RewardError> {
        if delta < Decimal::ZERO && reason != EarnReason::Adjustment {
            return Err(RewardError::NegativeEarn(delta));
        }

        let balance = {
            let mut account = self
                .accounts
                .entry(user_id.to_string())
                .or_insert_with(|| Account::new(user_id, display_name));

            if account.balance + delta < Decimal::ZERO {
                return Err(RewardError::InsufficientBalance {
                    required: -delta,
                    available: account.balance,
                });
            }

            account.balance += delta;
            account.lifetime_miles += delta.max(Decimal::ZERO);
            account.balance
        };

        self.append_entry(user_id, delta, reason, note);
        Ok(balance)
    }

    /// Debit miles from an existing account.
    pub fn debit(
        &self,
        user_id: &str,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<Decimal, RewardError> {
        let balance = {
            let mut account = self
                .accounts
                .get_mut(user_id)
                .ok_or_else(|| RewardError::UnknownUser(user_id.to_string()))?;

            if account.balance < amount {
                return Err(RewardError::InsufficientBalance {
                    required: amount,
                    available: account.balance,
                });
            }

            account.balance -= amount;
            account.balance
        };

        self.append_entry(user_id, -amount, EarnReason::Adjustment, note);
        Ok(balance)
    }

    /// Award a check-in bonus, once per user per landmark.
    ///
    /// Returns the new balance, or None when the user already checked in at
    /// the landmark. The dedupe check and the credit happen under one
    /// account guard.
    pub fn checkin_award(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        landmark_id: &str,
        bonus: Decimal,
        note: Option<String>,
    ) -> Option<Decimal> {
        let balance = {
            let mut account = self
                .accounts
                .entry(user_id.to_string())
                .or_insert_with(|| Account::new(user_id, display_name));

            if !account.checked_in.insert(landmark_id.to_string()) {
                return None;
            }

            account.balance += bonus;
            account.lifetime_miles += bonus;
            account.balance
        };

        self.append_entry(user_id, bonus, EarnReason::CheckIn, note);
        Some(balance)
    }

    /// Profile view of an account.
    pub fn profile(&self, user_id: &str) -> Result<UserProfile, RewardError> {
        let account = self
            .accounts
            .get(user_id)
            .ok_or_else(|| RewardError::UnknownUser(user_id.to_string()))?;

        Ok(UserProfile {
            user_id: user_id.to_string(),
            display_name: account.display_name.clone(),
            balance: account.balance,
            lifetime_miles: account.lifetime_miles,
            level: Level::for_miles(account.lifetime_miles),
            checked_in_landmarks: account.checked_in.iter().cloned().collect(),
            created_at: account.created_at,
        })
    }

    /// Most recent ledger entries for a user, newest last.
    pub fn ledger_tail(&self, user_id: &str, limit: usize) -> Vec<LedgerEntry> {
        self.entries
            .get(user_id)
            .map(|entries| {
                let start = entries.len().saturating_sub(limit);
                entries[start..].to_vec()
            })
            .unwrap_or_default()
    }

    /// Top accounts by lifetime miles; ties break on user id for stable
    /// output.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardRow> {
        let mut rows: Vec<(String, String, Decimal)> = self
            .accounts
            .iter()
            .map(|e| (e.key().clone(), e.display_name.clone(), e.lifetime_miles))
            .collect();

        rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(limit);

        rows.into_iter()
            .enumerate()
            .map(|(i, (user_id, display_name, lifetime_miles))| LeaderboardRow {
                rank: i + 1,
                user_id,
                display_name,
                lifetime_miles,
                level: Level::for_miles(lifetime_miles),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn earn_creates_account_and_accumulates() {
        let ledger = MilesLedger::new();

        let balance = ledger
            .earn("nok", Some("Nok"), dec!(40), EarnReason::EcoRoute, None)
            .unwrap();
        assert_eq!(balance, dec!(40));

        let balance = ledger
            .earn("nok", None, dec!(25), EarnReason::CheckIn, None)
            .unwrap();
        assert_eq!(balance, dec!(65));

        let profile = ledger.profile("nok").unwrap();
        assert_eq!(profile.display_name, "Nok");
        assert_eq!(profile.lifetime_miles, dec!(65));
    }

    #[test]
    fn zero_mile_earn_is_recorded() {
        let ledger = MilesLedger::new();
        ledger
            .earn("nok", None, Decimal::ZERO, EarnReason::EcoRoute, None)
            .unwrap();

        assert_eq!(ledger.ledger_tail("nok", 10).len(), 1);
        assert_eq!(ledger.profile("nok").unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn negative_earn_requires_adjustment() {
        let ledger = MilesLedger::new();
        ledger
            .earn("nok", None, dec!(50), EarnReason::EcoRoute, None)
            .unwrap();

        let err = ledger.earn("nok", None, dec!(-10), EarnReason::EcoRoute, None);
        assert!(matches!(err, Err(RewardError::NegativeEarn(_))));

        let balance = ledger
            .earn("nok", None, dec!(-10), EarnReason::Adjustment, None)
            .unwrap();
        assert_eq!(balance, dec!(40));
    }

    #[test]
    fn balance_never_goes_negative() {
        let ledger = MilesLedger::new();
        ledger
            .earn("nok", None, dec!(5), EarnReason::EcoRoute, None)
            .unwrap();

        let err = ledger.earn("nok", None, dec!(-10), EarnReason::Adjustment, None);
        assert!(matches!(
            err,
            Err(RewardError::InsufficientBalance { .. })
        ));

        let err = ledger.debit("nok", dec!(10), None);
        assert!(matches!(
            err,
            Err(RewardError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn debit_preserves_lifetime_miles() {
        let ledger = MilesLedger::new();
        ledger
            .earn("nok", None, dec!(200), EarnReason::EcoRoute, None)
            .unwrap();
        ledger.debit("nok", dec!(120), None).unwrap();

        let profile = ledger.profile("nok").unwrap();
        assert_eq!(profile.balance, dec!(80));
        assert_eq!(profile.lifetime_miles, dec!(200));
    }

    #[test]
    fn debit_unknown_user_errors() {
        let ledger = MilesLedger::new();
        assert!(matches!(
            ledger.debit("ghost", dec!(1), None),
            Err(RewardError::UnknownUser(_))
        ));
    }

    #[test]
    fn checkin_award_dedupes_per_landmark() {
        let ledger = MilesLedger::new();

        let first = ledger.checkin_award("nok", None, "tha-phae-gate", dec!(25), None);
        assert_eq!(first, Some(dec!(25)));

        let repeat = ledger.checkin_award("nok", None, "tha-phae-gate", dec!(25), None);
        assert_eq!(repeat, None);

        let other = ledger.checkin_award("nok", None, "warorot-market", dec!(25), None);
        assert_eq!(other, Some(dec!(50)));

        let profile = ledger.profile("nok").unwrap();
        assert_eq!(
            profile.checked_in_landmarks,
            vec!["tha-phae-gate".to_string(), "warorot-market".to_string()]
        );
    }

    #[test]
    fn levels_follow_lifetime_thresholds() {
        assert_eq!(Level::for_miles(dec!(0)), Level::Seedling);
        assert_eq!(Level::for_miles(dec!(99)), Level::Seedling);
        assert_eq!(Level::for_miles(dec!(100)), Level::Sprout);
        assert_eq!(Level::for_miles(dec!(499)), Level::Sprout);
        assert_eq!(Level::for_miles(dec!(500)), Level::Tree);
        assert_eq!(Level::for_miles(dec!(2000)), Level::Forest);
    }

    #[test]
    fn leaderboard_orders_by_lifetime_then_user_id() {
        let ledger = MilesLedger::new();
        ledger.earn("b", None, dec!(300), EarnReason::EcoRoute, None).unwrap();
        ledger.earn("a", None, dec!(300), EarnReason::EcoRoute, None).unwrap();
        ledger.earn("c", None, dec!(500), EarnReason::EcoRoute, None).unwrap();

        let rows = ledger.leaderboard(10);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].user_id, "c");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].user_id, "a");
        assert_eq!(rows[2].user_id, "b");
    }

    #[test]
    fn leaderboard_respects_limit() {
        let ledger = MilesLedger::new();
        for (i, user) in ["u1", "u2", "u3"].iter().enumerate() {
            ledger
                .earn(user, None, Decimal::new((i as i64 + 1) * 10, 0), EarnReason::EcoRoute, None)
                .unwrap();
        }

        assert_eq!(ledger.leaderboard(2).len(), 2);
    }

    #[test]
    fn ledger_tail_returns_newest_entries() {
        let ledger = MilesLedger::new();
        for i in 0..5 {
            ledger
                .earn("nok", None, Decimal::new(i, 0), EarnReason::EcoRoute, Some(format!("trip {i}")))
                .unwrap();
        }

        let tail = ledger.ledger_tail("nok", 2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].note.as_deref(), Some("trip 3"));
        assert_eq!(tail[1].note.as_deref(), Some("trip 4"));
    }
}
