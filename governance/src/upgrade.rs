//! Upgrade Manager Module
//!
//! Owns the "current implementation" pointer (a wasm code id) and the
//! initialization flag. Two lifecycle states:
//!
//! - Uninitialized: before construction
//! - Initialized: after construction; construction can never run again
//!
//! The chain only stores a contract's info once `instantiate` has returned,
//! so construction cannot learn its own code id. Until the first upgrade the
//! pointer is unrecorded and reads fall through to the chain's contract info;
//! every upgrade records its target.
//!
//! # Upgrade Flow
//! 1. `upgrade_to` swaps the pointer and records a pending marker
//!    (previous, target), then returns a `WasmMsg::Migrate` addressed to the
//!    contract itself. The contract is its own wasm admin, so this self-call
//!    is the only way the chain will run the new code's `migrate` entry point.
//! 2. The new code's `migrate` entry point calls `authorize_migration`, which
//!    only passes while the marker for this very upgrade exists, runs its
//!    migration hook, then `complete_upgrade` clears the marker.
//! 3. If the self-call fails, `reply` calls `rollback_upgrade` to restore the
//!    previous pointer and the call fails with `UpgradeFailed`.
//!
//! There is no authorization in here; callers check for Owner.

use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Event, StdResult, Storage, SubMsg, WasmMsg,
};

use crate::error::ContractError;
use crate::msg::MigrateMsg;
use crate::state::{ImplementationState, PendingUpgrade, IMPLEMENTATION, PENDING_UPGRADE};

/// Reply id of the migration self-call
pub const UPGRADE_REPLY_ID: u64 = 1;

// ============================================================================
// Construction
// ============================================================================

/// Leave the Uninitialized state for good.
pub fn construct(storage: &mut dyn Storage) -> Result<(), ContractError> {
    if is_initialized(storage)? {
        return Err(ContractError::AlreadyInitialized);
    }

    IMPLEMENTATION.save(
        storage,
        &ImplementationState {
            implementation: None,
            initialized: true,
        },
    )?;
    Ok(())
}

// ============================================================================
// Reads
// ============================================================================

/// Code id running `contract_addr`: the recorded pointer, or the chain's
/// contract info while nothing has been recorded yet.
pub fn implementation(deps: Deps, contract_addr: &Addr) -> Result<u64, ContractError> {
    let state = IMPLEMENTATION
        .may_load(deps.storage)?
        .ok_or(ContractError::NotInitialized)?;

    match state.implementation {
        Some(code_id) => Ok(code_id),
        None => Ok(deps.querier.query_wasm_contract_info(contract_addr)?.code_id),
    }
}

/// Pointer written by the last upgrade, if any.
pub fn recorded_implementation(storage: &dyn Storage) -> StdResult<Option<u64>> {
    Ok(IMPLEMENTATION
        .may_load(storage)?
        .and_then(|state| state.implementation))
}

pub fn is_initialized(storage: &dyn Storage) -> StdResult<bool> {
    Ok(IMPLEMENTATION
        .may_load(storage)?
        .map_or(false, |state| state.initialized))
}

pub fn pending_upgrade(storage: &dyn Storage) -> StdResult<Option<PendingUpgrade>> {
    PENDING_UPGRADE.may_load(storage)
}

// ============================================================================
// Upgrade
// ============================================================================

/// Phase 1 of an upgrade: swap the pointer, remember the previous code and
/// build the privileged self-call that runs the new code's migration.
pub fn upgrade_to(
    deps: DepsMut,
    contract_addr: &Addr,
    new_code_id: u64,
    migration_data: Binary,
) -> Result<SubMsg, ContractError> {
    let current = implementation(deps.as_ref(), contract_addr)?;

    if current == new_code_id {
        return Err(ContractError::IdempotentUpgrade {
            implementation: new_code_id,
        });
    }
    if PENDING_UPGRADE.exists(deps.storage) {
        return Err(ContractError::UpgradeInProgress);
    }

    PENDING_UPGRADE.save(
        deps.storage,
        &PendingUpgrade {
            previous: current,
            target: new_code_id,
        },
    )?;
    IMPLEMENTATION.save(
        deps.storage,
        &ImplementationState {
            implementation: Some(new_code_id),
            initialized: true,
        },
    )?;

    let migrate = WasmMsg::Migrate {
        contract_addr: contract_addr.to_string(),
        new_code_id,
        msg: to_json_binary(&MigrateMsg {
            data: migration_data,
        })?,
    };
    Ok(SubMsg::reply_on_error(migrate, UPGRADE_REPLY_ID))
}

/// Self-call guard for the `migrate` entry point: passes only while the
/// marker written by `upgrade_to` for the recorded implementation exists.
pub fn authorize_migration(storage: &dyn Storage) -> Result<PendingUpgrade, ContractError> {
    let pending = PENDING_UPGRADE
        .may_load(storage)?
        .ok_or(ContractError::NotAuthorized)?;

    if recorded_implementation(storage)? != Some(pending.target) {
        return Err(ContractError::NotAuthorized);
    }
    Ok(pending)
}

/// Phase 2 succeeded: mark the contract initialized (it already is after
/// construction) and clear the marker.
pub fn complete_upgrade(storage: &mut dyn Storage) -> Result<Event, ContractError> {
    let pending = authorize_migration(storage)?;

    IMPLEMENTATION.save(
        storage,
        &ImplementationState {
            implementation: Some(pending.target),
            initialized: true,
        },
    )?;
    PENDING_UPGRADE.remove(storage);

    Ok(Event::new("upgraded").add_attribute("new_implementation", pending.target.to_string()))
}

/// Phase 2 failed: restore the previous pointer and clear the marker.
/// Returns the abandoned upgrade, if one was in flight.
pub fn rollback_upgrade(storage: &mut dyn Storage) -> StdResult<Option<PendingUpgrade>> {
    let pending = match PENDING_UPGRADE.may_load(storage)? {
        Some(pending) => pending,
        None => return Ok(None),
    };

    IMPLEMENTATION.update(storage, |mut state| -> StdResult<_> {
        state.implementation = Some(pending.previous);
        Ok(state)
    })?;
    PENDING_UPGRADE.remove(storage);

    Ok(Some(pending))
}

/// Answer contract info queries as if `code_id` were running.
#[cfg(test)]
pub(crate) fn mock_running_code(querier: &mut cosmwasm_std::testing::MockQuerier, code_id: u64) {
    use cosmwasm_std::{ContractInfoResponse, ContractResult, SystemError, SystemResult, WasmQuery};

    querier.update_wasm(move |query| match query {
        WasmQuery::ContractInfo { .. } => SystemResult::Ok(ContractResult::Ok(
            to_json_binary(&ContractInfoResponse::new(code_id, "creator")).unwrap(),
        )),
        _ => SystemResult::Err(SystemError::Unknown {}),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, MockApi, MockQuerier, MockStorage};
    use cosmwasm_std::{from_json, CosmosMsg, OwnedDeps, ReplyOn};

    const CONTRACT: &str = "terra1governance";

    /// Constructed contract whose chain info reports `code_id`.
    fn running(code_id: u64) -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
        let mut deps = mock_dependencies();
        construct(deps.as_mut().storage).unwrap();
        mock_running_code(&mut deps.querier, code_id);
        deps
    }

    fn current(deps: &OwnedDeps<MockStorage, MockApi, MockQuerier>) -> u64 {
        implementation(deps.as_ref(), &Addr::unchecked(CONTRACT)).unwrap()
    }

    #[test]
    fn test_construct_once() {
        let mut deps = mock_dependencies();
        assert!(!is_initialized(&deps.storage).unwrap());
        assert_eq!(
            implementation(deps.as_ref(), &Addr::unchecked(CONTRACT)),
            Err(ContractError::NotInitialized)
        );

        construct(deps.as_mut().storage).unwrap();
        assert!(is_initialized(&deps.storage).unwrap());
        assert_eq!(recorded_implementation(&deps.storage).unwrap(), None);

        let err = construct(deps.as_mut().storage).unwrap_err();
        assert_eq!(err, ContractError::AlreadyInitialized);
    }

    #[test]
    fn test_unrecorded_pointer_reads_chain() {
        let deps = running(7);
        assert_eq!(current(&deps), 7);
    }

    #[test]
    fn test_upgrade_to_same_code_is_rejected() {
        let mut deps = running(7);

        let err = upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(CONTRACT),
            7,
            Binary::default(),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::IdempotentUpgrade { implementation: 7 });
        assert!(pending_upgrade(&deps.storage).unwrap().is_none());
    }

    #[test]
    fn test_upgrade_before_construction_fails() {
        let mut deps = mock_dependencies();
        let err = upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(CONTRACT),
            2,
            Binary::default(),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::NotInitialized);
    }

    #[test]
    fn test_upgrade_emits_self_migrate() {
        let mut deps = running(1);

        let sub = upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(CONTRACT),
            2,
            Binary::from(b"args".to_vec()),
        )
        .unwrap();

        assert_eq!(sub.id, UPGRADE_REPLY_ID);
        assert_eq!(sub.reply_on, ReplyOn::Error);
        match sub.msg {
            CosmosMsg::Wasm(WasmMsg::Migrate {
                contract_addr,
                new_code_id,
                msg,
            }) => {
                assert_eq!(contract_addr, CONTRACT);
                assert_eq!(new_code_id, 2);
                let migrate: MigrateMsg = from_json(msg).unwrap();
                assert_eq!(migrate.data, Binary::from(b"args".to_vec()));
            }
            other => panic!("unexpected message: {:?}", other),
        }

        // phase 1 is visible before the migration runs
        assert_eq!(recorded_implementation(&deps.storage).unwrap(), Some(2));
        assert_eq!(current(&deps), 2);
        assert_eq!(
            pending_upgrade(&deps.storage).unwrap(),
            Some(PendingUpgrade {
                previous: 1,
                target: 2,
            })
        );
    }

    #[test]
    fn test_second_upgrade_while_pending_is_rejected() {
        let mut deps = running(1);
        let contract = Addr::unchecked(CONTRACT);

        upgrade_to(deps.as_mut(), &contract, 2, Binary::default()).unwrap();
        let err = upgrade_to(deps.as_mut(), &contract, 3, Binary::default()).unwrap_err();
        assert_eq!(err, ContractError::UpgradeInProgress);
    }

    #[test]
    fn test_complete_upgrade_clears_marker() {
        let mut deps = running(1);
        upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(CONTRACT),
            2,
            Binary::default(),
        )
        .unwrap();

        assert_eq!(
            authorize_migration(&deps.storage).unwrap(),
            PendingUpgrade {
                previous: 1,
                target: 2,
            }
        );

        let event = complete_upgrade(deps.as_mut().storage).unwrap();
        assert_eq!(event.ty, "upgraded");
        assert_eq!(recorded_implementation(&deps.storage).unwrap(), Some(2));
        assert!(is_initialized(&deps.storage).unwrap());
        assert!(pending_upgrade(&deps.storage).unwrap().is_none());

        // the guard closes again once the upgrade is done
        assert_eq!(
            authorize_migration(&deps.storage),
            Err(ContractError::NotAuthorized)
        );
    }

    #[test]
    fn test_migration_without_marker_is_not_authorized() {
        let mut deps = running(1);

        assert_eq!(
            authorize_migration(&deps.storage),
            Err(ContractError::NotAuthorized)
        );
        assert_eq!(
            complete_upgrade(deps.as_mut().storage),
            Err(ContractError::NotAuthorized)
        );
    }

    #[test]
    fn test_rollback_restores_previous() {
        let mut deps = running(1);
        upgrade_to(
            deps.as_mut(),
            &Addr::unchecked(CONTRACT),
            2,
            Binary::default(),
        )
        .unwrap();

        let abandoned = rollback_upgrade(deps.as_mut().storage).unwrap();
        assert_eq!(
            abandoned,
            Some(PendingUpgrade {
                previous: 1,
                target: 2,
            })
        );
        assert_eq!(recorded_implementation(&deps.storage).unwrap(), Some(1));
        assert!(pending_upgrade(&deps.storage).unwrap().is_none());

        // nothing left to roll back
        assert_eq!(rollback_upgrade(deps.as_mut().storage).unwrap(), None);
    }

    #[test]
    fn test_upgrade_and_back() {
        let mut deps = running(1);
        let contract = Addr::unchecked(CONTRACT);

        upgrade_to(deps.as_mut(), &contract, 2, Binary::default()).unwrap();
        complete_upgrade(deps.as_mut().storage).unwrap();

        // idempotency only looks at the running code
        upgrade_to(deps.as_mut(), &contract, 1, Binary::default()).unwrap();
        complete_upgrade(deps.as_mut().storage).unwrap();
        assert_eq!(current(&deps), 1);
    }
}
