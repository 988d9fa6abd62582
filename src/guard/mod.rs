//! Single-owner authorization gate.

use serde::{Deserialize, Serialize};

use crate::asset::{is_zero_identity, AccountId};
use crate::error::TreasuryError;

/// Gates every mutating treasury entry point on the designated owner.
///
/// Composed into the treasury rather than inherited; callers pass their
/// identity explicitly and the guard compares it against the owner fixed at
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerGuard {
    owner: AccountId,
}

impl OwnerGuard {
    /// Rejects the zero identity: a guard with a null owner would authorize
    /// the anonymous caller.
    pub fn new(owner: AccountId) -> Result<Self, TreasuryError> {
        if is_zero_identity(&owner) {
            return Err(TreasuryError::InvalidOwner);
        }
        Ok(Self { owner })
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Succeeds iff `caller` is the designated owner.
    pub fn authorize(&self, caller: &AccountId) -> Result<(), TreasuryError> {
        if caller != &self.owner {
            return Err(TreasuryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Owner-only identity swap. No side effects beyond the owner field.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), TreasuryError> {
        self.authorize(caller)?;
        if is_zero_identity(&new_owner) {
            return Err(TreasuryError::InvalidOwner);
        }
        self.owner = new_owner;
        Ok(())
    }
}
