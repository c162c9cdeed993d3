//! Access control handlers.
//!
//! This module handles:
//! - `ACCESS_CONTROL_BATCH` sub-commands (admin set, ownership transfer)
//! - `ACQUIRE_OWNERSHIP`
//! - the JSON ownership entries

use common::ByteCursor;
use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use crate::access_control::{self, Role};
use crate::dispatch::{read_address, ExecContext, ExecHandler};
use crate::error::ContractError;
use crate::opcodes::{
    ACCESS_CONTROL_BATCH, ACQUIRE_OWNERSHIP, ADD_ADMIN, CANCEL_OWNERSHIP_TRANSFER,
    PROPOSE_OWNERSHIP_TRANSFER, RELINQUISH_OWNERSHIP, REVOKE_ADMIN,
};

// ============================================================================
// Opcode Handlers
// ============================================================================

pub struct AccessControlHandler;

impl ExecHandler for AccessControlHandler {
    fn try_dispatch_exec(
        &self,
        ctx: &mut ExecContext<'_>,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<bool, ContractError> {
        if opcode != ACCESS_CONTROL_BATCH {
            return Ok(false);
        }
        run_batch(ctx, cursor)?;
        Ok(true)
    }
}

pub struct AcquireOwnershipHandler;

impl ExecHandler for AcquireOwnershipHandler {
    fn try_dispatch_exec(
        &self,
        ctx: &mut ExecContext<'_>,
        _cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<bool, ContractError> {
        if opcode != ACQUIRE_OWNERSHIP {
            return Ok(false);
        }
        let event =
            access_control::acquire_ownership(ctx.deps.storage, &ctx.env, &ctx.info.sender)?;
        ctx.emit(event);
        Ok(true)
    }
}

/// The caller's role is resolved once; every sub-command is checked against
/// it, so an Admin fails on the first Owner-only sub-command.
fn run_batch(ctx: &mut ExecContext<'_>, cursor: &mut ByteCursor<'_>) -> Result<(), ContractError> {
    let role = access_control::require_at_least_admin(ctx.deps.storage, &ctx.info.sender)?;
    let count = cursor.read_u8()?;

    for _ in 0..count {
        let sub_opcode = cursor.read_u8()?;
        match sub_opcode {
            REVOKE_ADMIN => {
                let addr = read_address(ctx.deps.api, cursor)?;
                let event = access_control::remove_admin(ctx.deps.storage, &ctx.env, &addr)?;
                if let Some(event) = event {
                    ctx.emit(event);
                }
            }
            ADD_ADMIN => {
                require_owner_role(role)?;
                let addr = read_address(ctx.deps.api, cursor)?;
                let event = access_control::add_admin(ctx.deps.storage, &ctx.env, &addr)?;
                if let Some(event) = event {
                    ctx.emit(event);
                }
            }
            PROPOSE_OWNERSHIP_TRANSFER => {
                require_owner_role(role)?;
                let addr = read_address(ctx.deps.api, cursor)?;
                access_control::propose_ownership_transfer(ctx.deps.storage, &addr)?;
                ctx.add_attribute("pending_owner", addr);
            }
            CANCEL_OWNERSHIP_TRANSFER => {
                require_owner_role(role)?;
                access_control::cancel_ownership_transfer(ctx.deps.storage)?;
                ctx.add_attribute("pending_owner", access_control::NULL_ADDRESS);
            }
            RELINQUISH_OWNERSHIP => {
                require_owner_role(role)?;
                // nothing may follow: the stream must end here
                cursor.check_exhausted()?;
                let event = access_control::relinquish_ownership(ctx.deps.storage, &ctx.env)?;
                ctx.emit(event);
            }
            opcode => return Err(ContractError::UnknownSubOpcode { opcode }),
        }
    }
    Ok(())
}

fn require_owner_role(role: Role) -> Result<(), ContractError> {
    if role != Role::Owner {
        return Err(ContractError::NotAuthorized);
    }
    Ok(())
}

// ============================================================================
// Direct Entries
// ============================================================================

/// Propose a new owner; the proposed address completes with `ReceiveOwnership`.
pub fn execute_transfer_ownership(
    deps: DepsMut,
    info: MessageInfo,
    new_owner: String,
) -> Result<Response, ContractError> {
    access_control::require_owner(deps.storage, &info.sender)?;

    let new_owner = deps.api.addr_validate(&new_owner)?;
    access_control::propose_ownership_transfer(deps.storage, &new_owner)?;

    Ok(Response::new()
        .add_attribute("method", "transfer_ownership")
        .add_attribute("pending_owner", new_owner))
}

pub fn execute_cancel_ownership_transfer(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    access_control::require_owner(deps.storage, &info.sender)?;
    access_control::cancel_ownership_transfer(deps.storage)?;

    Ok(Response::new().add_attribute("method", "cancel_ownership_transfer"))
}

pub fn execute_receive_ownership(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let event = access_control::acquire_ownership(deps.storage, &env, &info.sender)?;

    Ok(Response::new()
        .add_attribute("method", "receive_ownership")
        .add_event(event))
}
