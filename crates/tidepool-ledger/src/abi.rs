// crates/tidepool-ledger/src/abi.rs
//
// Minimal ABI plumbing for the two pool contract reads. The contract
// surface is fixed, so the four-byte selectors are precomputed from the
// keccak-256 of the function signatures instead of derived at runtime.

use sha2::{Digest, Sha256};

use tidepool_core::PoolError;

/// Selector for `contributorInfo(address)`, which returns the contributor
/// address and its files-list count.
pub const CONTRIBUTOR_INFO_SELECTOR: &str = "4b545f3a";

/// Selector for `contentRegistered(bytes32)`, which returns whether a
/// content digest has already been contributed to the pool.
pub const CONTENT_REGISTERED_SELECTOR: &str = "d44a35b3";

const WORD_HEX: usize = 64;

/// Build the `eth_call` data field for a single-address-argument call.
pub fn encode_address_call(selector: &str, address: &str) -> Result<String, PoolError> {
    let bare = address.strip_prefix("0x").unwrap_or(address);
    if bare.len() != 40 || !bare.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PoolError::Ledger(format!(
            "invalid contract-call address: {}",
            address
        )));
    }
    // Addresses are left-padded to a full 32-byte word.
    Ok(format!(
        "0x{}{:0>64}",
        selector,
        bare.to_ascii_lowercase()
    ))
}

/// Build the `eth_call` data field for a single-bytes32-argument call.
pub fn encode_bytes32_call(selector: &str, digest: &[u8; 32]) -> String {
    format!("0x{}{}", selector, hex::encode(digest))
}

/// Decode one 32-byte return word as a u64.
///
/// Fails if the word is missing or the value exceeds the u64 range; a
/// contribution count never legitimately does.
pub fn decode_word_u64(result: &str, word_index: usize) -> Result<u64, PoolError> {
    let word = return_word(result, word_index)?;
    let (high, low) = word.split_at(WORD_HEX - 16);
    if high.chars().any(|c| c != '0') {
        return Err(PoolError::Ledger(format!(
            "return word {} overflows u64: {}",
            word_index, word
        )));
    }
    u64::from_str_radix(low, 16)
        .map_err(|e| PoolError::Ledger(format!("malformed return word: {}", e)))
}

/// Decode one 32-byte return word as a bool (any non-zero bit is true).
pub fn decode_word_bool(result: &str, word_index: usize) -> Result<bool, PoolError> {
    let word = return_word(result, word_index)?;
    Ok(word.chars().any(|c| c != '0'))
}

fn return_word(result: &str, word_index: usize) -> Result<&str, PoolError> {
    let bare = result.strip_prefix("0x").unwrap_or(result);
    let start = word_index * WORD_HEX;
    let end = start + WORD_HEX;
    if bare.len() < end || !bare.is_char_boundary(start) || !bare.is_char_boundary(end) {
        return Err(PoolError::Ledger(format!(
            "call result too short for word {}: {} hex chars",
            word_index,
            bare.len()
        )));
    }
    Ok(&bare[start..end])
}

/// Content digest for the uniqueness read: SHA-256 over the identity
/// reference and handle, matching what the pool registers at write time.
pub fn content_digest(identity_ref: &str, handle: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(identity_ref.as_bytes());
    hasher.update(b":");
    hasher.update(handle.as_bytes());
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}
