//! The treasury allowance ledger.
//!
//! Holds the owner/account identities and orchestrates the external asset
//! ledger; all fund and allowance state stays in the ledger itself. Every
//! operation is atomic: it fully applies or fails with no observable effect.

use serde::{Deserialize, Serialize};

use crate::asset::{is_zero_identity, AccountId, Amount, AssetLedger};
use crate::error::TreasuryError;
use crate::guard::OwnerGuard;

/// Owner-controlled treasury denominated in a single external asset.
///
/// The asset ledger is passed into each operation as `&mut A`, which gives
/// the treasury exclusive access for the duration of a call. The
/// read-modify-write sequences in [`Treasury::increase_allowance`],
/// [`Treasury::decrease_allowance`] and [`Treasury::repay`] rely on that
/// exclusivity; a concurrent host must serialize calls per treasury
/// instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Treasury {
    guard: OwnerGuard,
    /// The treasury's own account on the asset ledger.
    account: AccountId,
    /// Symbol of the asset this treasury is denominated in. Fixed at
    /// construction.
    asset: String,
}

impl Treasury {
    pub fn new(
        owner: AccountId,
        account: AccountId,
        asset: String,
    ) -> Result<Self, TreasuryError> {
        Ok(Self {
            guard: OwnerGuard::new(owner)?,
            account,
            asset,
        })
    }

    pub fn owner(&self) -> &AccountId {
        self.guard.owner()
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn asset_symbol(&self) -> &str {
        &self.asset
    }

    /// Live balance, always read from the asset ledger.
    pub fn balance<A: AssetLedger>(&self, asset: &A) -> Amount {
        asset.balance_of(&self.account)
    }

    /// The delegate's current spending capacity against this treasury.
    pub fn allowance_of<A: AssetLedger>(&self, asset: &A, delegate: &AccountId) -> Amount {
        asset.allowance(&self.account, delegate)
    }

    /// Owner-only pass-through transfer out of the treasury balance. A zero
    /// amount is a legal no-op at the asset-ledger level.
    pub fn withdraw<A: AssetLedger>(
        &self,
        asset: &mut A,
        caller: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TreasuryError> {
        self.guard.authorize(caller)?;
        asset.transfer(&self.account, to, amount)?;
        Ok(())
    }

    /// Owner-only. Grants `delegate` an additional `amount` of spending
    /// capacity and returns the new absolute allowance.
    pub fn increase_allowance<A: AssetLedger>(
        &self,
        asset: &mut A,
        caller: &AccountId,
        delegate: &AccountId,
        amount: Amount,
    ) -> Result<Amount, TreasuryError> {
        self.guard.authorize(caller)?;
        check_delta(delegate, amount)?;
        // Layer the delta on the allowance the ledger reports right now, not
        // a cached value: the delegate may have spent part of it since the
        // last grant.
        let current = asset.allowance(&self.account, delegate);
        let updated = current
            .checked_add(amount)
            .ok_or(TreasuryError::ArithmeticOverflow)?;
        asset.approve(&self.account, delegate, updated)?;
        Ok(updated)
    }

    /// Owner-only. Removes exactly `amount` of spending capacity; fails
    /// without clamping if `amount` exceeds the current allowance.
    pub fn decrease_allowance<A: AssetLedger>(
        &self,
        asset: &mut A,
        caller: &AccountId,
        delegate: &AccountId,
        amount: Amount,
    ) -> Result<Amount, TreasuryError> {
        self.guard.authorize(caller)?;
        check_delta(delegate, amount)?;
        let current = asset.allowance(&self.account, delegate);
        let updated = current
            .checked_sub(amount)
            .ok_or(TreasuryError::ArithmeticUnderflow)?;
        asset.approve(&self.account, delegate, updated)?;
        Ok(updated)
    }

    /// Owner-only. Unconditionally zeroes the delegate's allowance;
    /// idempotent.
    pub fn reset_allowance<A: AssetLedger>(
        &self,
        asset: &mut A,
        caller: &AccountId,
        delegate: &AccountId,
    ) -> Result<(), TreasuryError> {
        self.guard.authorize(caller)?;
        asset.approve(&self.account, delegate, 0)?;
        Ok(())
    }

    /// Delegate-initiated repayment; the one operation with no owner gate.
    ///
    /// Pulls `amount` from the caller into the treasury and restores the
    /// caller's allowance by the same amount, returning the new allowance.
    /// The caller must first have approved the treasury on its own balance,
    /// or the pull fails with `InsufficientAllowance`. The restored value is
    /// computed before any funds move, so an overflow aborts with no
    /// partial effect.
    pub fn repay<A: AssetLedger>(
        &self,
        asset: &mut A,
        caller: &AccountId,
        amount: Amount,
    ) -> Result<Amount, TreasuryError> {
        if amount == 0 {
            return Err(TreasuryError::InvalidAmount);
        }
        let current = asset.allowance(&self.account, caller);
        let restored = current
            .checked_add(amount)
            .ok_or(TreasuryError::ArithmeticOverflow)?;
        asset.transfer_from(caller, &self.account, &self.account, amount)?;
        asset.approve(&self.account, caller, restored)?;
        Ok(restored)
    }

    /// Owner-only identity swap with no effect on allowances.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), TreasuryError> {
        self.guard.transfer_ownership(caller, new_owner)
    }
}

/// Shared preconditions for allowance deltas. The amount check runs before
/// the spender check, so a zero amount reports `InvalidAmount` even when the
/// spender is also invalid.
fn check_delta(delegate: &AccountId, amount: Amount) -> Result<(), TreasuryError> {
    if amount == 0 {
        return Err(TreasuryError::InvalidAmount);
    }
    if is_zero_identity(delegate) {
        return Err(TreasuryError::InvalidSpender);
    }
    Ok(())
}
