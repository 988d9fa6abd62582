//! Fungible-asset ledger interface and an in-memory reference implementation.
//!
//! The treasury never does its own fund accounting: balances, transfers and
//! allowances all live behind [`AssetLedger`]. [`InMemoryAsset`] implements
//! the same surface for tests and the demo CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type AccountId = String;
pub type Amount = u64;

/// The empty string is the reserved null identity, the ledger-level analog
/// of a zero address.
pub fn is_zero_identity(id: &str) -> bool {
    id.is_empty()
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("insufficient balance in account {account}")]
    InsufficientBalance { account: AccountId },
    #[error("insufficient allowance granted by {owner} to {spender}")]
    InsufficientAllowance { owner: AccountId, spender: AccountId },
}

/// Observable ledger log, consumed by external auditors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetEvent {
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    },
}

/// External fungible-asset ledger capability.
///
/// `approve` sets an absolute allowance; derived increase/decrease arithmetic
/// is the caller's concern. `transfer_from` checks the spender's allowance
/// before the owner's balance.
pub trait AssetLedger {
    fn balance_of(&self, account: &AccountId) -> Amount;

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError>;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount;

    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError>;

    fn transfer_from(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError>;
}

/// In-memory asset ledger.
///
/// Balances and allowances live in ordered maps so serialization and the
/// state digest are deterministic.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InMemoryAsset {
    pub symbol: String,
    pub total_supply: Amount,
    balances: BTreeMap<AccountId, Amount>,
    // owner -> spender -> amount
    allowances: BTreeMap<AccountId, BTreeMap<AccountId, Amount>>,
    events: Vec<AssetEvent>,
}

impl InMemoryAsset {
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            ..Self::default()
        }
    }

    /// Credits `to` out of thin air. Demo and test seeding only.
    pub fn mint(&mut self, to: &AccountId, amount: Amount) {
        let balance = self.balances.entry(to.clone()).or_default();
        *balance += amount;
        self.total_supply += amount;
    }

    pub fn events(&self) -> &[AssetEvent] {
        &self.events
    }

    /// Deterministic commitment to the full ledger state.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"asset");
        hasher.update(self.symbol.as_bytes());
        hasher.update(self.total_supply.to_le_bytes());
        for (account, amount) in &self.balances {
            hasher.update(b"bal");
            hasher.update(account.as_bytes());
            hasher.update(amount.to_le_bytes());
        }
        for (owner, spenders) in &self.allowances {
            for (spender, amount) in spenders {
                hasher.update(b"allow");
                hasher.update(owner.as_bytes());
                hasher.update(spender.as_bytes());
                hasher.update(amount.to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}

impl AssetLedger for InMemoryAsset {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: from.clone(),
            });
        }
        self.balances.insert(from.clone(), available - amount);
        *self.balances.entry(to.clone()).or_default() += amount;
        self.events.push(AssetEvent::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError> {
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
        self.events.push(AssetEvent::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
        Ok(())
    }

    fn transfer_from(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), AssetError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(AssetError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
            });
        }
        let available = self.balance_of(owner);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: owner.clone(),
            });
        }
        self.balances.insert(owner.clone(), available - amount);
        *self.balances.entry(to.clone()).or_default() += amount;
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), allowed - amount);
        self.events.push(AssetEvent::Transfer {
            from: owner.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_transfer_update_balances_and_events() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset.mint(&"alice".to_string(), 1_000);
        assert_eq!(asset.total_supply, 1_000);
        asset
            .transfer(&"alice".to_string(), &"bob".to_string(), 300)
            .unwrap();
        assert_eq!(asset.balance_of(&"alice".to_string()), 700);
        assert_eq!(asset.balance_of(&"bob".to_string()), 300);
        assert_eq!(
            asset.events(),
            &[AssetEvent::Transfer {
                from: "alice".into(),
                to: "bob".into(),
                amount: 300,
            }]
        );
    }

    #[test]
    fn transfer_fails_without_balance_and_changes_nothing() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset.mint(&"alice".to_string(), 100);
        let before = asset.clone();
        let err = asset
            .transfer(&"alice".to_string(), &"bob".to_string(), 101)
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::InsufficientBalance {
                account: "alice".into(),
            }
        );
        assert_eq!(asset, before);
    }

    #[test]
    fn zero_amount_transfer_is_a_legal_noop() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset
            .transfer(&"alice".to_string(), &"bob".to_string(), 0)
            .unwrap();
        assert_eq!(asset.balance_of(&"bob".to_string()), 0);
        assert_eq!(asset.events().len(), 1);
    }

    #[test]
    fn approve_sets_absolute_allowance() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset
            .approve(&"alice".to_string(), &"bob".to_string(), 500)
            .unwrap();
        asset
            .approve(&"alice".to_string(), &"bob".to_string(), 70)
            .unwrap();
        assert_eq!(asset.allowance(&"alice".to_string(), &"bob".to_string()), 70);
    }

    #[test]
    fn transfer_from_checks_allowance_before_balance() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset.mint(&"alice".to_string(), 10);
        let err = asset
            .transfer_from(&"alice".to_string(), &"bob".to_string(), &"bob".to_string(), 5)
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::InsufficientAllowance {
                owner: "alice".into(),
                spender: "bob".into(),
            }
        );

        asset
            .approve(&"alice".to_string(), &"bob".to_string(), 50)
            .unwrap();
        let err = asset
            .transfer_from(&"alice".to_string(), &"bob".to_string(), &"bob".to_string(), 30)
            .unwrap_err();
        assert_eq!(
            err,
            AssetError::InsufficientBalance {
                account: "alice".into(),
            }
        );
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset.mint(&"alice".to_string(), 100);
        asset
            .approve(&"alice".to_string(), &"bob".to_string(), 50)
            .unwrap();
        asset
            .transfer_from(&"alice".to_string(), &"bob".to_string(), &"carol".to_string(), 20)
            .unwrap();
        assert_eq!(asset.balance_of(&"alice".to_string()), 80);
        assert_eq!(asset.balance_of(&"carol".to_string()), 20);
        assert_eq!(asset.allowance(&"alice".to_string(), &"bob".to_string()), 30);
    }

    #[test]
    fn state_digest_is_deterministic_and_tracks_mutation() {
        let mut asset = InMemoryAsset::new("USDT".into());
        asset.mint(&"alice".to_string(), 1_000);
        let d1 = asset.state_digest();
        let d2 = asset.state_digest();
        assert_eq!(d1, d2);
        asset
            .transfer(&"alice".to_string(), &"bob".to_string(), 1)
            .unwrap();
        assert_ne!(asset.state_digest(), d1);
    }
}
