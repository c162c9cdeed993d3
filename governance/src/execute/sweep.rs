//! Sweep handler.
//!
//! `SWEEP_TOKENS` moves funds that ended up on the contract to the caller.
//! The token operand names either a CW20 contract or a native bank denom.

use common::{AssetInfo, ByteCursor};
use cosmwasm_std::{Deps, SubMsg, Uint128};

use crate::access_control;
use crate::dispatch::{ExecContext, ExecHandler};
use crate::error::ContractError;
use crate::opcodes::SWEEP_TOKENS;

pub struct SweepHandler;

impl ExecHandler for SweepHandler {
    fn try_dispatch_exec(
        &self,
        ctx: &mut ExecContext<'_>,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<bool, ContractError> {
        if opcode != SWEEP_TOKENS {
            return Ok(false);
        }
        access_control::require_at_least_admin(ctx.deps.storage, &ctx.info.sender)?;

        let token = std::str::from_utf8(cursor.read_blob_u8()?).map_err(|e| {
            ContractError::InvalidAddress {
                reason: e.to_string(),
            }
        })?;
        let amount = Uint128::new(cursor.read_u128()?);
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount {
                reason: "sweep amount must be positive".to_string(),
            });
        }

        let asset = resolve_asset(ctx.deps.as_ref(), token)?;
        let msg = asset.transfer_msg(&ctx.info.sender, amount)?;
        ctx.submit(SubMsg::new(msg));
        let kind = if asset.is_native() { "native" } else { "cw20" };
        ctx.add_attribute("sweep_kind", kind);
        ctx.add_attribute("sweep_asset", asset.to_string());
        ctx.add_attribute("sweep_amount", amount);
        Ok(true)
    }
}

/// A token string naming an existing contract is a CW20; anything else is
/// a native denom.
fn resolve_asset(deps: Deps, token: &str) -> Result<AssetInfo, ContractError> {
    if token.is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "empty token".to_string(),
        });
    }

    if let Ok(contract_addr) = deps.api.addr_validate(token) {
        if deps.querier.query_wasm_contract_info(&contract_addr).is_ok() {
            return Ok(AssetInfo::Cw20 { contract_addr });
        }
    }
    Ok(AssetInfo::Native {
        denom: token.to_string(),
    })
}
