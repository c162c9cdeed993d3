//! Common - Shared Types and Utilities for CL8Y Governance Contracts
//!
//! This package provides the asset descriptor used by token-moving handlers
//! and the byte cursor used to decode packed command/query streams.

pub mod asset;
pub mod cursor;

pub use asset::AssetInfo;
pub use cursor::{ByteCursor, CursorError};
