//! Owner-gated custodial treasury over an external fungible-asset ledger.
//!
//! The crate exposes three small building blocks that compose into the
//! treasury:
//!
//! * [`asset`] — the [`asset::AssetLedger`] capability the treasury is
//!   denominated in, plus [`asset::InMemoryAsset`], an in-memory reference
//!   implementation used by the test suite and the demo CLI.
//! * [`guard`] — the single-owner authorization gate every mutating
//!   operation passes through.
//! * [`treasury`] — the allowance ledger itself: withdraw, grant, decrease,
//!   reset, and delegate-initiated repayment.
//!
//! The treasury holds no fund or allowance state of its own. Its balance
//! lives in the asset ledger under the treasury's account, and every
//! allowance is written through the ledger's approve primitive, so the
//! externally visible allowance is always authoritative.

pub mod asset;
pub mod guard;
pub mod treasury;

mod error;

pub use error::TreasuryError;
