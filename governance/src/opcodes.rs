//! Opcode table for the packed command and query streams.
//!
//! ```text
//! Stream       := Item*
//! Item         := Opcode(1) Payload
//! BatchPayload := Count(1) SubItem{Count}
//! SubItem      := SubOpcode(1) SubPayload
//! Address      := Len(1) Utf8Bytes{Len}      (Len = 0 is the null address)
//! ```

// ============================================================================
// Execute family
// ============================================================================

/// BatchPayload of access control sub-commands
pub const ACCESS_CONTROL_BATCH: u8 = 0xba;
/// No payload; caller must be the pending owner
pub const ACQUIRE_OWNERSHIP: u8 = 0xbc;
/// Code id (u64)
pub const UPGRADE_CONTRACT: u8 = 0xbd;
/// Token (u8-length-prefixed string), amount (u128)
pub const SWEEP_TOKENS: u8 = 0xbf;

// ============================================================================
// Query family
// ============================================================================

/// BatchPayload of access control sub-queries
pub const ACCESS_CONTROL_QUERY_BATCH: u8 = 0xbb;
/// No payload; returns the code id (u64)
pub const IMPLEMENTATION: u8 = 0xbe;

// ============================================================================
// Access control sub-opcodes
// ============================================================================

pub const OWNER: u8 = 0x10;
pub const PENDING_OWNER: u8 = 0x11;
pub const IS_ADMIN: u8 = 0x12;
pub const ADMINS: u8 = 0x13;

pub const REVOKE_ADMIN: u8 = 0x14;
pub const ADD_ADMIN: u8 = 0x15;
pub const PROPOSE_OWNERSHIP_TRANSFER: u8 = 0x16;
pub const RELINQUISH_OWNERSHIP: u8 = 0x17;
pub const CANCEL_OWNERSHIP_TRANSFER: u8 = 0x18;
