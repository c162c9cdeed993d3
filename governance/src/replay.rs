//! Replay Protection Module
//!
//! Suppresses re-processing of already-handled external messages. Two
//! schemes, picked by the message's finality:
//!
//! - finalized messages carry a per-channel sequence number; one bit per
//!   sequence in 256-bit words keyed by `(keccak256(channel), sequence >> 8)`
//! - non-finalized messages have no usable sequence; their
//!   `keccak256(raw bytes)` digest is recorded instead
//!
//! Both schemes are monotonic. Nothing ever clears a mark.
//!
//! Verifying that a message is authentic is somebody else's job: callers
//! plug in a [`MessageAuthenticator`].

use cosmwasm_std::{Deps, DepsMut, Storage};

use crate::error::ContractError;
use crate::hash::keccak256;
use crate::state::{CONSUMED_DIGESTS, FINALIZED_WORDS};

/// Origin of an external message: source chain and emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceChannel {
    pub chain: u16,
    pub emitter: [u8; 32],
}

impl SourceChannel {
    pub fn new(chain: u16, emitter: [u8; 32]) -> Self {
        Self { chain, emitter }
    }

    /// Bitmap namespace: `keccak256(chain_be || emitter)`
    pub fn namespace(&self) -> [u8; 32] {
        let mut packed = [0u8; 34];
        packed[..2].copy_from_slice(&self.chain.to_be_bytes());
        packed[2..].copy_from_slice(&self.emitter);
        keccak256(&packed)
    }
}

/// Word index and bit mask of a sequence number.
fn locate(sequence: u64) -> (u64, usize, u8) {
    let word = sequence >> 8;
    let bit = (sequence & 0xff) as usize;
    // bit 0 is the least significant bit of the last byte
    let byte = 31 - bit / 8;
    (word, byte, 1u8 << (bit % 8))
}

// ============================================================================
// Finalized Scheme
// ============================================================================

pub fn mark_finalized(
    storage: &mut dyn Storage,
    channel: &SourceChannel,
    sequence: u64,
) -> Result<(), ContractError> {
    let namespace = channel.namespace();
    let (word_index, byte, mask) = locate(sequence);
    let key = (namespace.as_slice(), word_index);

    let mut word = FINALIZED_WORDS.may_load(storage, key)?.unwrap_or([0u8; 32]);
    if word[byte] & mask != 0 {
        return Err(ContractError::AlreadyProcessed);
    }
    word[byte] |= mask;
    FINALIZED_WORDS.save(storage, key, &word)?;
    Ok(())
}

pub fn is_finalized_processed(
    storage: &dyn Storage,
    channel: &SourceChannel,
    sequence: u64,
) -> Result<bool, ContractError> {
    let namespace = channel.namespace();
    let (word_index, byte, mask) = locate(sequence);

    Ok(FINALIZED_WORDS
        .may_load(storage, (namespace.as_slice(), word_index))?
        .map_or(false, |word| word[byte] & mask != 0))
}

// ============================================================================
// Non-finalized Scheme
// ============================================================================

pub fn mark_once(storage: &mut dyn Storage, digest: &[u8; 32]) -> Result<(), ContractError> {
    if CONSUMED_DIGESTS.has(storage, digest.as_slice()) {
        return Err(ContractError::AlreadyProcessed);
    }
    CONSUMED_DIGESTS.save(storage, digest.as_slice(), &true)?;
    Ok(())
}

pub fn is_digest_processed(storage: &dyn Storage, digest: &[u8; 32]) -> bool {
    CONSUMED_DIGESTS.has(storage, digest.as_slice())
}

// ============================================================================
// Authenticated Messages
// ============================================================================

/// Result of verifying a raw external message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedMessage {
    pub channel: SourceChannel,
    pub sequence: u64,
    pub payload: Vec<u8>,
    pub finalized: bool,
    pub valid: bool,
}

/// Attestation verifier for raw external messages.
pub trait MessageAuthenticator {
    fn verify(&self, deps: Deps<'_>, raw: &[u8]) -> Result<AuthenticatedMessage, ContractError>;
}

/// Verify `raw` and mark it consumed under the scheme matching its
/// finality. Returns the verified message for further processing.
pub fn consume_message(
    deps: DepsMut<'_>,
    authenticator: &dyn MessageAuthenticator,
    raw: &[u8],
) -> Result<AuthenticatedMessage, ContractError> {
    let message = authenticator.verify(deps.as_ref(), raw)?;
    if !message.valid {
        return Err(ContractError::InvalidMessage {
            reason: "attestation rejected".to_string(),
        });
    }

    if message.finalized {
        mark_finalized(deps.storage, &message.channel, message.sequence)?;
    } else {
        mark_once(deps.storage, &keccak256(raw))?;
    }
    Ok(message)
}
