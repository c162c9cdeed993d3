//! CL8Y Governance - packed command dispatch for upgradeable contracts
//!
//! One external call carries a flat stream of opcode-tagged commands, so a
//! single transaction can apply many governance operations atomically.
//!
//! # Roles
//! Owner > Admin > None. Ownership moves in two steps (propose, acquire) or
//! is relinquished for good; admins may only revoke admins.
//!
//! # Upgrades
//! The contract is its own wasm admin. An upgrade swaps the recorded code id
//! and migrates through a self-addressed `WasmMsg::Migrate`; a failed
//! migration rolls the pointer back and fails the call.
//!
//! # Replay Protection
//! [`replay`] marks external messages consumed, per source channel and
//! sequence for finalized messages, by digest otherwise.

pub mod access_control;
pub mod contract;
pub mod dispatch;
pub mod error;
mod execute;
pub mod hash;
pub mod msg;
pub mod opcodes;
mod query;
pub mod replay;
pub mod state;
pub mod upgrade;

pub use crate::error::ContractError;
pub use crate::hash::keccak256;
