//! Command and query dispatchers
//!
//! A payload is a flat stream of opcode-tagged items. Each item is offered
//! to the registered handlers in order; the first handler that recognizes
//! the opcode consumes its payload from the shared cursor. An opcode nobody
//! claims fails the whole call, and so does any trailing byte.
//!
//! Handler chains are plain slices, so a new opcode family is added by
//! appending a handler without touching the existing ones.

use common::ByteCursor;
use cosmwasm_std::{attr, Addr, Api, Deps, DepsMut, Env, Event, MessageInfo, Response, SubMsg};

use crate::error::ContractError;

// ============================================================================
// Handler Traits
// ============================================================================

/// Mutable call state threaded through every execute-family handler.
pub struct ExecContext<'a> {
    pub deps: DepsMut<'a>,
    pub env: Env,
    pub info: MessageInfo,
    /// Accumulated events and messages of the whole stream
    pub response: Response,
}

impl<'a> ExecContext<'a> {
    pub fn new(deps: DepsMut<'a>, env: Env, info: MessageInfo) -> Self {
        Self {
            deps,
            env,
            info,
            response: Response::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.response.events.push(event);
    }

    pub fn submit(&mut self, msg: SubMsg) {
        self.response.messages.push(msg);
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.response.attributes.push(attr(key, value));
    }
}

pub trait ExecHandler {
    /// Returns `Ok(false)` without touching the cursor when `opcode` belongs
    /// to another handler. On `Ok(true)` the cursor sits past the payload.
    fn try_dispatch_exec(
        &self,
        ctx: &mut ExecContext<'_>,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<bool, ContractError>;
}

pub trait QueryHandler {
    /// Returns `Ok(None)` without touching the cursor when `opcode` belongs
    /// to another handler.
    fn try_dispatch_query(
        &self,
        deps: Deps<'_>,
        env: &Env,
        cursor: &mut ByteCursor<'_>,
        opcode: u8,
    ) -> Result<Option<Vec<u8>>, ContractError>;
}

// ============================================================================
// Dispatch
// ============================================================================

pub fn dispatch_exec(
    ctx: &mut ExecContext<'_>,
    handlers: &[&dyn ExecHandler],
    payload: &[u8],
) -> Result<(), ContractError> {
    let mut cursor = ByteCursor::new(payload);

    while !cursor.is_exhausted() {
        let opcode = cursor.read_u8()?;
        let mut claimed = false;
        for handler in handlers {
            if handler.try_dispatch_exec(ctx, &mut cursor, opcode)? {
                claimed = true;
                break;
            }
        }
        if !claimed {
            return Err(ContractError::UnknownOpcode { opcode });
        }
    }

    cursor.check_exhausted()?;
    Ok(())
}

/// Run a query stream and concatenate each item's output in stream order.
pub fn dispatch_query(
    deps: Deps<'_>,
    env: &Env,
    handlers: &[&dyn QueryHandler],
    payload: &[u8],
) -> Result<Vec<u8>, ContractError> {
    let mut cursor = ByteCursor::new(payload);
    let mut output = Vec::new();

    'stream: while !cursor.is_exhausted() {
        let opcode = cursor.read_u8()?;
        for handler in handlers {
            if let Some(result) = handler.try_dispatch_query(deps, env, &mut cursor, opcode)? {
                output.extend_from_slice(&result);
                continue 'stream;
            }
        }
        return Err(ContractError::UnknownOpcode { opcode });
    }

    cursor.check_exhausted()?;
    Ok(output)
}

// ============================================================================
// Address Encoding
// ============================================================================

/// Read a `len: u8` prefixed bech32 address. The null address (`len == 0`)
/// is never a valid command argument.
pub fn read_address(api: &dyn Api, cursor: &mut ByteCursor<'_>) -> Result<Addr, ContractError> {
    let raw = cursor.read_blob_u8()?;
    if raw.is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "null address".to_string(),
        });
    }

    let text = std::str::from_utf8(raw).map_err(|e| ContractError::InvalidAddress {
        reason: e.to_string(),
    })?;
    api.addr_validate(text)
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })
}

/// Append an address in wire form; `None` becomes the null address.
pub fn write_address(out: &mut Vec<u8>, addr: Option<&Addr>) -> Result<(), ContractError> {
    let bytes = addr.map_or(&[][..], |a| a.as_bytes());
    let len = u8::try_from(bytes.len()).map_err(|_| ContractError::InvalidAddress {
        reason: format!("address longer than {} bytes", u8::MAX),
    })?;

    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}
