//! Message types for the CL8Y governance contract
//!
//! Two generic entries carry packed streams (`Execute`, `Get`); the rest are
//! JSON conveniences that delegate to the same internal operations.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Initial owner
    pub owner: String,
    /// Initial admin set, in order; duplicates are ignored
    pub admins: Vec<String>,
}

/// Migrate message, only accepted through the contract's own upgrade call
#[cw_serde]
pub struct MigrateMsg {
    /// Opaque arguments for the new code's migration hook
    pub data: Binary,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    /// Packed command stream. Attached funds are accepted and stay with the
    /// contract.
    Execute { payload: Binary },

    // ========================================================================
    // Direct Entries
    // ========================================================================
    /// Propose a new owner
    ///
    /// Authorization: Owner
    TransferOwnership { new_owner: String },

    /// Drop the pending ownership transfer
    ///
    /// Authorization: Owner
    CancelOwnershipTransfer {},

    /// Complete a two-step transfer
    ///
    /// Authorization: pending owner
    ReceiveOwnership {},

    /// Switch to another code id and run its migration hook with
    /// `migration_data`
    ///
    /// Authorization: Owner
    Upgrade {
        new_implementation: u64,
        migration_data: Binary,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Packed query stream; outputs are concatenated in stream order
    #[returns(GetResponse)]
    Get { payload: Binary },

    #[returns(OwnerResponse)]
    Owner {},

    #[returns(PendingOwnerResponse)]
    PendingOwner {},

    #[returns(AdminsResponse)]
    Admins {},

    #[returns(IsAdminResponse)]
    IsAdmin { address: String },

    #[returns(ImplementationResponse)]
    Implementation {},
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct GetResponse {
    pub data: Binary,
}

/// `None` after ownership has been relinquished
#[cw_serde]
pub struct OwnerResponse {
    pub owner: Option<Addr>,
}

#[cw_serde]
pub struct PendingOwnerResponse {
    pub pending_owner: Option<Addr>,
}

/// Admins in slot order
#[cw_serde]
pub struct AdminsResponse {
    pub admins: Vec<Addr>,
}

#[cw_serde]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

#[cw_serde]
pub struct ImplementationResponse {
    /// Code id currently backing the contract
    pub implementation: u64,
    pub initialized: bool,
}
