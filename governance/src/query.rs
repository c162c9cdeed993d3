//! Query handlers for the CL8Y governance contract.
//!
//! Packed query opcodes go through [`QUERY_HANDLERS`]; the JSON queries
//! below read the same state for clients that prefer named messages.

use common::ByteCursor;
use cosmwasm_std::{Addr, Binary, Deps, Env, StdResult};

use crate::access_control;
use crate::dispatch::{dispatch_query, write_address, QueryHandler};
use crate::error::ContractError;
use crate::msg::{
    AdminsResponse, GetResponse, ImplementationResponse, IsAdminResponse, OwnerResponse,
    PendingOwnerResponse,
};
use crate::opcodes::{
    ACCESS_CONTROL_QUERY_BATCH, ADMINS, IMPLEMENTATION, IS_ADMIN, OWNER, PENDING_OWNER,
};
use crate::upgrade;

/// Query-family handler chain
pub const QUERY_HANDLERS: &[&dyn QueryHandler] =
    &[&AccessControlQueryHandler, &ImplementationHandler];

// ============================================================================
// Opcode Handlers
// ============================================================================

pub struct AccessControlQueryHandler;

impl QueryHandler for AccessControlQueryHandler {
    fn try_dispatch_query(
        &self,
        deps: Deps<'_>,
        _env: &Env,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<Option<Vec<u8>>, ContractError> {
        if opcode != ACCESS_CONTROL_QUERY_BATCH {
            return Ok(None);
        }

        let count = cursor.read_u8()?;
        let mut out = Vec::new();
        for _ in 0..count {
            match cursor.read_u8()? {
                OWNER => {
                    let owner = access_control::owner(deps.storage)?;
                    write_address(&mut out, owner.as_ref())?;
                }
                PENDING_OWNER => {
                    let pending = access_control::pending_owner(deps.storage)?;
                    write_address(&mut out, pending.as_ref())?;
                }
                IS_ADMIN => {
                    // stored admins are normalized; anything else answers 0
                    let candidate = read_membership_candidate(cursor)?;
                    out.push(access_control::is_admin(deps.storage, &candidate)? as u8);
                }
                ADMINS => {
                    let admins = access_control::admins(deps.storage)?;
                    // MAX_ADMINS keeps this within one byte
                    out.push(admins.len() as u8);
                    for admin in &admins {
                        write_address(&mut out, Some(admin))?;
                    }
                }
                opcode => return Err(ContractError::UnknownSubOpcode { opcode }),
            }
        }
        Ok(Some(out))
    }
}

/// Address operand of a membership read. Only malformed bytes fail; the
/// null address and unnormalized spellings simply match no admin.
fn read_membership_candidate(cursor: &mut ByteCursor<'_>) -> Result<Addr, ContractError> {
    let raw = cursor.read_blob_u8()?;
    std::str::from_utf8(raw)
        .map(Addr::unchecked)
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })
}

pub struct ImplementationHandler;

impl QueryHandler for ImplementationHandler {
    fn try_dispatch_query(
        &self,
        deps: Deps<'_>,
        env: &Env,
        _cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<Option<Vec<u8>>, ContractError> {
        if opcode != IMPLEMENTATION {
            return Ok(None);
        }
        let implementation = upgrade::implementation(deps, &env.contract.address)?;
        Ok(Some(implementation.to_be_bytes().to_vec()))
    }
}

/// Run a packed query stream.
pub fn query_get(deps: Deps, env: &Env, payload: Binary) -> Result<GetResponse, ContractError> {
    let data = dispatch_query(deps, env, QUERY_HANDLERS, payload.as_slice())?;
    Ok(GetResponse {
        data: Binary::from(data),
    })
}

// ============================================================================
// JSON Queries
// ============================================================================

pub fn query_owner(deps: Deps) -> StdResult<OwnerResponse> {
    Ok(OwnerResponse {
        owner: access_control::owner(deps.storage)?,
    })
}

pub fn query_pending_owner(deps: Deps) -> StdResult<PendingOwnerResponse> {
    Ok(PendingOwnerResponse {
        pending_owner: access_control::pending_owner(deps.storage)?,
    })
}

pub fn query_admins(deps: Deps) -> StdResult<AdminsResponse> {
    Ok(AdminsResponse {
        admins: access_control::admins(deps.storage)?,
    })
}

pub fn query_is_admin(deps: Deps, address: String) -> StdResult<IsAdminResponse> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(IsAdminResponse {
        is_admin: access_control::is_admin(deps.storage, &addr)?,
    })
}

pub fn query_implementation(
    deps: Deps,
    env: &Env,
) -> Result<ImplementationResponse, ContractError> {
    Ok(ImplementationResponse {
        implementation: upgrade::implementation(deps, &env.contract.address)?,
        initialized: upgrade::is_initialized(deps.storage)?,
    })
}
