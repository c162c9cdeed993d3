//! Execute handlers for the CL8Y governance contract.
//!
//! Opcode handlers, in dispatch order:
//! - `access_control` - admin batch and ownership acquisition
//! - `upgrade` - code upgrade through the self-migration path
//! - `sweep` - moving stray funds out of the contract
//!
//! Each module also exposes the JSON direct entries that share its logic.

mod access_control;
mod sweep;
mod upgrade;

pub use access_control::*;
pub use sweep::*;
pub use upgrade::*;

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response};

use crate::dispatch::{dispatch_exec, ExecContext, ExecHandler};
use crate::error::ContractError;

/// Execute-family handler chain
pub const EXEC_HANDLERS: &[&dyn ExecHandler] = &[
    &AccessControlHandler,
    &AcquireOwnershipHandler,
    &UpgradeHandler,
    &SweepHandler,
];

/// Run a packed command stream.
pub fn execute_stream(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    payload: Binary,
) -> Result<Response, ContractError> {
    let mut ctx = ExecContext::new(deps, env, info);
    dispatch_exec(&mut ctx, EXEC_HANDLERS, payload.as_slice())?;

    Ok(ctx.response.add_attribute("action", "execute"))
}
