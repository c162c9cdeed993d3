//! State definitions for the CL8Y governance contract
//!
//! Each singleton lives under a fixed key equal to `keccak256(tag)` of a
//! human-readable tag, so the core can share a contract's storage with
//! unrelated host state without collisions. The keys are spelled out as
//! literals because `Item`/`Map` need `'static` namespaces; `hash::tests`
//! checks them against their tags.
//!
//! Only the owning component writes each item:
//! - role state and admin set: [`crate::access_control`]
//! - implementation state: [`crate::upgrade`]
//! - replay state: [`crate::replay`]

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:cl8y-governance";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest admin set; the `ADMINS` query encodes the count in one byte.
pub const MAX_ADMINS: u32 = u8::MAX as u32;

/// keccak256("governance.access_control.roles")
pub const ROLES_KEY: &str = "f43ad77031d33c1e3fe99093b2e46df1a4394b75c44365716556582ad2f76922";
/// keccak256("governance.access_control.admin_slots")
pub const ADMIN_SLOTS_KEY: &str =
    "75fcc9daeaab2a17372659e994b1fcd133b61b2a0b0a143d7a8394a0be2d82b0";
/// keccak256("governance.access_control.admin_count")
pub const ADMIN_COUNT_KEY: &str =
    "1d176e05fa52b8fb7522dd606ea40a2c04e760e93ca1a35895171ce927e188fc";
/// keccak256("governance.access_control.admin_positions")
pub const ADMIN_POSITIONS_KEY: &str =
    "1d715de0016dbed46267e87d1f6999552b92227731d7c604377f2d9b7bf79e37";
/// keccak256("governance.upgrade.implementation")
pub const IMPLEMENTATION_KEY: &str =
    "27c0030b2bd9e60a952b83ed61ce277ec3ebb9e2a128b904455e9ff760d767b2";
/// keccak256("governance.upgrade.pending")
pub const PENDING_UPGRADE_KEY: &str =
    "db2880b130533b54116ce129872af7a830dcf270f962c38cae2a62394c923f1e";
/// keccak256("governance.replay.finalized")
pub const FINALIZED_KEY: &str =
    "74ec3bdf6686761c7f8f230001694c83c53cb422ab1cca828974ef1aba61d16f";
/// keccak256("governance.replay.digests")
pub const DIGESTS_KEY: &str = "7e9f4266fe5827b90af7558be6abbe27a0aa41b852a2a19a241f7993ab38887d";

// ============================================================================
// Role State
// ============================================================================

/// Owner and pending owner. `None` owner is the null address left behind by
/// relinquishment.
#[cw_serde]
pub struct RoleState {
    pub owner: Option<Addr>,
    pub pending_owner: Option<Addr>,
}

pub(crate) const ROLES: Item<RoleState> = Item::new(ROLES_KEY);

/// Admin array: Key: 0-based slot, Value: admin address
pub(crate) const ADMIN_SLOTS: Map<u32, Addr> = Map::new(ADMIN_SLOTS_KEY);

/// Number of occupied admin slots
pub(crate) const ADMIN_COUNT: Item<u32> = Item::new(ADMIN_COUNT_KEY);

/// Reverse map: Key: admin address, Value: 1-based slot
pub(crate) const ADMIN_POSITIONS: Map<&Addr, u32> = Map::new(ADMIN_POSITIONS_KEY);

// ============================================================================
// Implementation State
// ============================================================================

/// Code currently backing the contract, packed with the lifecycle flag so a
/// single read or write touches both.
#[cw_serde]
pub struct ImplementationState {
    /// Wasm code id; `None` until the first upgrade records one
    pub implementation: Option<u64>,
    /// True once construction has completed
    pub initialized: bool,
}

/// Marker for an upgrade whose migration self-call is in flight
#[cw_serde]
pub struct PendingUpgrade {
    /// Code id to restore if the migration fails
    pub previous: u64,
    /// Code id being migrated to
    pub target: u64,
}

pub(crate) const IMPLEMENTATION: Item<ImplementationState> = Item::new(IMPLEMENTATION_KEY);

pub(crate) const PENDING_UPGRADE: Item<PendingUpgrade> = Item::new(PENDING_UPGRADE_KEY);

// ============================================================================
// Replay State
// ============================================================================

/// Finalized-message bitmaps
/// Key: (keccak256 of the source channel, sequence >> 8), Value: 256-bit word
pub(crate) const FINALIZED_WORDS: Map<(&[u8], u64), [u8; 32]> = Map::new(FINALIZED_KEY);

/// Consumed non-finalized message digests
/// Key: 32-byte digest, Value: always true
pub(crate) const CONSUMED_DIGESTS: Map<&[u8], bool> = Map::new(DIGESTS_KEY);
