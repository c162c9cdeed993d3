//! Access Control Module
//!
//! Owns the role state of the contract and answers "what role does this
//! caller have". Three tiers, highest privilege wins:
//!
//! | Role  | Who                              |
//! |-------|----------------------------------|
//! | Owner | the single `owner` address       |
//! | Admin | any member of the admin set      |
//! | None  | everybody else                   |
//!
//! Ownership moves in two steps (propose, then acquire by the proposed
//! address) or is relinquished for good. The admin set is an append /
//! swap-remove array with a reverse map of 1-based positions, so membership
//! checks, additions and removals are all O(1). Removal does not preserve
//! order.

use cosmwasm_std::{Addr, Env, Event, Order, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{RoleState, ADMIN_COUNT, ADMIN_POSITIONS, ADMIN_SLOTS, MAX_ADMINS, ROLES};

/// Placeholder written to event attributes for the null address
pub const NULL_ADDRESS: &str = "none";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    None,
    Admin,
    Owner,
}

// ============================================================================
// Construction
// ============================================================================

/// Write the initial role state. Only called from contract construction.
pub fn initialize(
    storage: &mut dyn Storage,
    env: &Env,
    owner: &Addr,
    admins: &[Addr],
) -> Result<Vec<Event>, ContractError> {
    ROLES.save(
        storage,
        &RoleState {
            owner: Some(owner.clone()),
            pending_owner: None,
        },
    )?;
    ADMIN_COUNT.save(storage, &0)?;

    let mut events = vec![ownership_changed_event(None, Some(owner), env)];
    for admin in admins {
        if let Some(event) = add_admin(storage, env, admin)? {
            events.push(event);
        }
    }
    Ok(events)
}

// ============================================================================
// Role Derivation
// ============================================================================

pub fn role_of(storage: &dyn Storage, caller: &Addr) -> StdResult<Role> {
    let roles = ROLES.load(storage)?;
    if roles.owner.as_ref() == Some(caller) {
        return Ok(Role::Owner);
    }
    if is_admin(storage, caller)? {
        return Ok(Role::Admin);
    }
    Ok(Role::None)
}

/// Fails with `NotAuthorized` for callers without any role.
pub fn require_at_least_admin(storage: &dyn Storage, caller: &Addr) -> Result<Role, ContractError> {
    match role_of(storage, caller)? {
        Role::None => Err(ContractError::NotAuthorized),
        role => Ok(role),
    }
}

pub fn require_owner(storage: &dyn Storage, caller: &Addr) -> Result<(), ContractError> {
    if role_of(storage, caller)? != Role::Owner {
        return Err(ContractError::NotAuthorized);
    }
    Ok(())
}

// ============================================================================
// Reads
// ============================================================================

pub fn owner(storage: &dyn Storage) -> StdResult<Option<Addr>> {
    Ok(ROLES.load(storage)?.owner)
}

pub fn pending_owner(storage: &dyn Storage) -> StdResult<Option<Addr>> {
    Ok(ROLES.load(storage)?.pending_owner)
}

pub fn is_admin(storage: &dyn Storage, addr: &Addr) -> StdResult<bool> {
    Ok(ADMIN_POSITIONS.has(storage, addr))
}

/// Admins in slot order.
pub fn admins(storage: &dyn Storage) -> StdResult<Vec<Addr>> {
    ADMIN_SLOTS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, admin)| admin))
        .collect()
}

// ============================================================================
// Admin Set
// ============================================================================

/// Append `addr` to the admin set. Already an admin: no write, no event.
pub fn add_admin(
    storage: &mut dyn Storage,
    env: &Env,
    addr: &Addr,
) -> Result<Option<Event>, ContractError> {
    if ADMIN_POSITIONS.has(storage, addr) {
        return Ok(None);
    }

    let count = ADMIN_COUNT.may_load(storage)?.unwrap_or_default();
    if count >= MAX_ADMINS {
        return Err(ContractError::TooManyAdmins { max: MAX_ADMINS });
    }

    ADMIN_SLOTS.save(storage, count, addr)?;
    ADMIN_POSITIONS.save(storage, addr, &(count + 1))?;
    ADMIN_COUNT.save(storage, &(count + 1))?;

    Ok(Some(admin_set_changed_event(addr, true, env)))
}

/// Swap-remove `addr` from the admin set. Not an admin: no write, no event.
pub fn remove_admin(
    storage: &mut dyn Storage,
    env: &Env,
    addr: &Addr,
) -> StdResult<Option<Event>> {
    let position = match ADMIN_POSITIONS.may_load(storage, addr)? {
        Some(position) => position,
        None => return Ok(None),
    };

    let count = ADMIN_COUNT.load(storage)?;
    let last_slot = count - 1;
    let removed_slot = position - 1;

    if removed_slot != last_slot {
        let moved = ADMIN_SLOTS.load(storage, last_slot)?;
        ADMIN_SLOTS.save(storage, removed_slot, &moved)?;
        ADMIN_POSITIONS.save(storage, &moved, &position)?;
    }

    ADMIN_SLOTS.remove(storage, last_slot);
    ADMIN_POSITIONS.remove(storage, addr);
    ADMIN_COUNT.save(storage, &last_slot)?;

    Ok(Some(admin_set_changed_event(addr, false, env)))
}

// ============================================================================
// Ownership
// ============================================================================

pub fn propose_ownership_transfer(storage: &mut dyn Storage, new_owner: &Addr) -> StdResult<()> {
    ROLES.update(storage, |mut roles| -> StdResult<_> {
        roles.pending_owner = Some(new_owner.clone());
        Ok(roles)
    })?;
    Ok(())
}

pub fn cancel_ownership_transfer(storage: &mut dyn Storage) -> StdResult<()> {
    ROLES.update(storage, |mut roles| -> StdResult<_> {
        roles.pending_owner = None;
        Ok(roles)
    })?;
    Ok(())
}

/// Set the owner to the null address and drop any pending transfer.
pub fn relinquish_ownership(storage: &mut dyn Storage, env: &Env) -> StdResult<Event> {
    let mut roles = ROLES.load(storage)?;
    let old_owner = roles.owner.take();
    roles.pending_owner = None;
    ROLES.save(storage, &roles)?;

    Ok(ownership_changed_event(old_owner.as_ref(), None, env))
}

/// Complete a two-step transfer. Only the pending owner may call this.
pub fn acquire_ownership(
    storage: &mut dyn Storage,
    env: &Env,
    caller: &Addr,
) -> Result<Event, ContractError> {
    let mut roles = ROLES.load(storage)?;
    if roles.pending_owner.as_ref() != Some(caller) {
        return Err(ContractError::NotAuthorized);
    }

    let old_owner = roles.owner.replace(caller.clone());
    roles.pending_owner = None;
    ROLES.save(storage, &roles)?;

    Ok(ownership_changed_event(old_owner.as_ref(), Some(caller), env))
}

// ============================================================================
// Events
// ============================================================================

pub fn ownership_changed_event(old: Option<&Addr>, new: Option<&Addr>, env: &Env) -> Event {
    Event::new("ownership_changed")
        .add_attribute("old_owner", old.map_or(NULL_ADDRESS, Addr::as_str))
        .add_attribute("new_owner", new.map_or(NULL_ADDRESS, Addr::as_str))
        .add_attribute("timestamp", env.block.time.seconds().to_string())
}

pub fn admin_set_changed_event(addr: &Addr, added: bool, env: &Env) -> Event {
    Event::new("admin_set_changed")
        .add_attribute("address", addr.as_str())
        .add_attribute("added", added.to_string())
        .add_attribute("timestamp", env.block.time.seconds().to_string())
}
