//! CL8Y Governance Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - execute-family opcode handlers and direct entries
//! - `query` - query-family opcode handlers and JSON queries
//! - `access_control`, `upgrade`, `replay` - the state-owning components

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult, Storage, SubMsgResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::access_control;
use crate::error::ContractError;
use crate::execute::{
    execute_cancel_ownership_transfer, execute_receive_ownership, execute_stream,
    execute_transfer_ownership, execute_upgrade,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_admins, query_get, query_implementation, query_is_admin, query_owner,
    query_pending_owner,
};
use crate::state::{CONTRACT_NAME, CONTRACT_VERSION};
use crate::upgrade::{self, UPGRADE_REPLY_ID};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    let admins = msg
        .admins
        .iter()
        .map(|admin| deps.api.addr_validate(admin))
        .collect::<StdResult<Vec<_>>>()?;

    upgrade::construct(deps.storage)?;
    let events = access_control::initialize(deps.storage, &env, &owner, &admins)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("admin_count", admins.len().to_string())
        .add_events(events))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Execute { payload } => execute_stream(deps, env, info, payload),

        // Direct entries
        ExecuteMsg::TransferOwnership { new_owner } => {
            execute_transfer_ownership(deps, info, new_owner)
        }
        ExecuteMsg::CancelOwnershipTransfer {} => execute_cancel_ownership_transfer(deps, info),
        ExecuteMsg::ReceiveOwnership {} => execute_receive_ownership(deps, env, info),
        ExecuteMsg::Upgrade {
            new_implementation,
            migration_data,
        } => execute_upgrade(deps, env, info, new_implementation, migration_data),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Get { payload } => to_json_binary(&query_get(deps, &env, payload)?)?,
        QueryMsg::Owner {} => to_json_binary(&query_owner(deps)?)?,
        QueryMsg::PendingOwner {} => to_json_binary(&query_pending_owner(deps)?)?,
        QueryMsg::Admins {} => to_json_binary(&query_admins(deps)?)?,
        QueryMsg::IsAdmin { address } => to_json_binary(&query_is_admin(deps, address)?)?,
        QueryMsg::Implementation {} => to_json_binary(&query_implementation(deps, &env)?)?,
    };
    Ok(res)
}

// ============================================================================
// Migrate
// ============================================================================

/// Only reachable through the contract's own upgrade submessage; a migration
/// started by the wasm admin directly finds no pending upgrade and fails.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    upgrade::authorize_migration(deps.storage)?;
    run_migration_hook(deps.storage)?;
    let event = upgrade::complete_upgrade(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION)
        .add_attribute("migration_data_len", msg.data.len().to_string())
        .add_event(event))
}

/// Migration hook of this code version: refuse foreign storage, then stamp
/// the new version.
fn run_migration_hook(storage: &mut dyn Storage) -> Result<(), ContractError> {
    let stored = get_contract_version(storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::UpgradeFailed {
            reason: format!("cannot migrate from contract {}", stored.contract),
        });
    }

    set_contract_version(storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(())
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        UPGRADE_REPLY_ID => match msg.result {
            SubMsgResult::Err(reason) => {
                upgrade::rollback_upgrade(deps.storage)?;
                Err(ContractError::UpgradeFailed { reason })
            }
            // registered as reply_on_error
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{
        mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage,
        MOCK_CONTRACT_ADDR,
    };
    use cosmwasm_std::{Addr, Binary, OwnedDeps};

    /// Constructed at code 1 with a recorded cw2 version, ready to upgrade.
    fn constructed(contract_name: &str) -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
        let mut deps = mock_dependencies();
        set_contract_version(deps.as_mut().storage, contract_name, "0.0.1").unwrap();
        upgrade::construct(deps.as_mut().storage).unwrap();
        upgrade::mock_running_code(&mut deps.querier, 1);
        deps
    }

    fn start_upgrade(deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>, target: u64) {
        upgrade::upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(MOCK_CONTRACT_ADDR),
            target,
            Binary::default(),
        )
        .unwrap();
    }

    /// The chain has no contract info for a contract that is still being
    /// instantiated; the default mock querier answers the same way.
    #[test]
    fn test_instantiate_without_own_contract_info() {
        let mut deps = mock_dependencies();

        let res = instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("creator", &[]),
            InstantiateMsg {
                owner: "owner".to_string(),
                admins: vec!["admin".to_string()],
            },
        )
        .unwrap();
        assert_eq!(res.attributes[0].value, "instantiate");

        assert!(upgrade::is_initialized(&deps.storage).unwrap());
        assert_eq!(upgrade::recorded_implementation(&deps.storage).unwrap(), None);
        assert_eq!(
            access_control::owner(&deps.storage).unwrap(),
            Some(Addr::unchecked("owner"))
        );

        // once the contract exists, the pointer resolves from its chain info
        upgrade::mock_running_code(&mut deps.querier, 5);
        let res: crate::msg::ImplementationResponse = cosmwasm_std::from_json(
            query(deps.as_ref(), mock_env(), QueryMsg::Implementation {}).unwrap(),
        )
        .unwrap();
        assert_eq!(res.implementation, 5);
        assert!(res.initialized);
    }

    #[test]
    fn test_migrate_without_pending_upgrade_is_rejected() {
        let mut deps = constructed(CONTRACT_NAME);

        let err = migrate(
            deps.as_mut(),
            mock_env(),
            MigrateMsg {
                data: Binary::default(),
            },
        )
        .unwrap_err();
        assert_eq!(err, ContractError::NotAuthorized);
    }

    #[test]
    fn test_migrate_completes_pending_upgrade() {
        let mut deps = constructed(CONTRACT_NAME);
        start_upgrade(&mut deps, 2);

        let res = migrate(
            deps.as_mut(),
            mock_env(),
            MigrateMsg {
                data: Binary::default(),
            },
        )
        .unwrap();
        assert_eq!(res.events[0].ty, "upgraded");
        assert_eq!(
            get_contract_version(&deps.storage).unwrap().version,
            CONTRACT_VERSION
        );
        assert!(upgrade::pending_upgrade(&deps.storage).unwrap().is_none());
    }

    #[test]
    fn test_migrate_refuses_foreign_storage() {
        let mut deps = constructed("crates.io:other");
        start_upgrade(&mut deps, 2);

        let err = migrate(
            deps.as_mut(),
            mock_env(),
            MigrateMsg {
                data: Binary::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::UpgradeFailed { .. }));
    }

    #[test]
    fn test_reply_rolls_back_failed_upgrade() {
        let mut deps = constructed(CONTRACT_NAME);
        start_upgrade(&mut deps, 2);

        let err = reply(
            deps.as_mut(),
            mock_env(),
            Reply {
                id: UPGRADE_REPLY_ID,
                result: SubMsgResult::Err("migration exploded".to_string()),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::UpgradeFailed {
                reason: "migration exploded".to_string()
            }
        );
        assert_eq!(upgrade::recorded_implementation(&deps.storage).unwrap(), Some(1));
    }

    #[test]
    fn test_reply_unknown_id() {
        let mut deps = mock_dependencies();
        let err = reply(
            deps.as_mut(),
            mock_env(),
            Reply {
                id: 99,
                result: SubMsgResult::Err("boom".to_string()),
            },
        )
        .unwrap_err();
        assert_eq!(err, ContractError::UnknownReplyId { id: 99 });
    }
}
