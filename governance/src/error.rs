//! Error types for the CL8Y governance contract
//!
//! Every failure aborts the whole call; the chain discards all state written
//! during it, so no variant implies a partially applied batch.

use common::CursorError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Not authorized")]
    NotAuthorized,

    // ========================================================================
    // Stream Errors
    // ========================================================================

    #[error("Unknown opcode: 0x{opcode:02x}")]
    UnknownOpcode { opcode: u8 },

    #[error("Unknown sub-opcode: 0x{opcode:02x}")]
    UnknownSubOpcode { opcode: u8 },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // ========================================================================
    // Access Control Errors
    // ========================================================================

    #[error("Admin set is full: at most {max} admins")]
    TooManyAdmins { max: u32 },

    // ========================================================================
    // Upgrade Errors
    // ========================================================================

    #[error("Contract is already initialized")]
    AlreadyInitialized,

    #[error("Contract is not initialized")]
    NotInitialized,

    #[error("Idempotent upgrade: code {implementation} is already running")]
    IdempotentUpgrade { implementation: u64 },

    #[error("An upgrade is already in progress")]
    UpgradeInProgress,

    #[error("Upgrade failed: {reason}")]
    UpgradeFailed { reason: String },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },

    // ========================================================================
    // Replay Protection Errors
    // ========================================================================

    #[error("Message already processed")]
    AlreadyProcessed,

    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },
}

impl From<CursorError> for ContractError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::OutOfBounds {
                offset,
                requested,
                length,
            } => ContractError::LengthMismatch {
                expected: offset + requested,
                actual: length,
            },
            CursorError::LengthMismatch { expected, actual } => {
                ContractError::LengthMismatch { expected, actual }
            }
        }
    }
}
