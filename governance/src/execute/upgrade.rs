//! Upgrade handlers: `UPGRADE_CONTRACT` and the JSON `Upgrade` entry.

use common::ByteCursor;
use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response};

use crate::access_control;
use crate::dispatch::{ExecContext, ExecHandler};
use crate::error::ContractError;
use crate::opcodes::UPGRADE_CONTRACT;
use crate::upgrade;

pub struct UpgradeHandler;

impl ExecHandler for UpgradeHandler {
    fn try_dispatch_exec(
        &self,
        ctx: &mut ExecContext<'_>,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<bool, ContractError> {
        if opcode != UPGRADE_CONTRACT {
            return Ok(false);
        }
        let new_code_id = cursor.read_u64()?;
        upgrade_contract(ctx, new_code_id, Binary::default())?;
        Ok(true)
    }
}

/// Owner-only: phase 1 of the upgrade plus the self-migration submessage.
fn upgrade_contract(
    ctx: &mut ExecContext<'_>,
    new_code_id: u64,
    migration_data: Binary,
) -> Result<(), ContractError> {
    access_control::require_owner(ctx.deps.storage, &ctx.info.sender)?;

    let previous = upgrade::implementation(ctx.deps.as_ref(), &ctx.env.contract.address)?;
    let migrate = upgrade::upgrade_to(
        ctx.deps.branch(),
        &ctx.env.contract.address,
        new_code_id,
        migration_data,
    )?;
    ctx.submit(migrate);
    ctx.add_attribute("previous_implementation", previous.to_string());
    ctx.add_attribute("new_implementation", new_code_id.to_string());
    Ok(())
}

pub fn execute_upgrade(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_implementation: u64,
    migration_data: Binary,
) -> Result<Response, ContractError> {
    let mut ctx = ExecContext::new(deps, env, info);
    upgrade_contract(&mut ctx, new_implementation, migration_data)?;

    Ok(ctx.response.add_attribute("method", "upgrade"))
}
