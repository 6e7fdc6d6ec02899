//! Determinism commitments.
//!
//! Every replica processing the same input sequence must hold the same
//! state and emit the same outputs. Both are summarized as SHA-256 roots so
//! replicas can be compared without shipping full payloads.

use devolt_types::{DevoltError, Outputs, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Root over one input's outputs, in emission order.
///
/// Covers notice texts, voucher destinations and voucher payloads.
#[must_use]
pub fn compute_output_root(outputs: &Outputs) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"devolt:output_root:v1:");

    hasher.update((outputs.notices.len() as u64).to_le_bytes());
    for notice in &outputs.notices {
        hasher.update((notice.as_bytes().len() as u64).to_le_bytes());
        hasher.update(notice.as_bytes());
    }

    hasher.update((outputs.vouchers.len() as u64).to_le_bytes());
    for voucher in &outputs.vouchers {
        hasher.update(voucher.destination.as_bytes());
        hasher.update((voucher.payload.len() as u64).to_le_bytes());
        hasher.update(&voucher.payload);
    }

    hasher.finalize().into()
}

#[must_use]
pub fn verify_output_root(outputs: &Outputs, expected_root: &[u8; 32]) -> bool {
    compute_output_root(outputs) == *expected_root
}

/// Root over a serializable state snapshot.
///
/// The snapshot must serialize deterministically (ordered maps only).
pub fn compute_state_root<T: Serialize>(state: &T) -> Result<[u8; 32]> {
    let bytes = serde_json::to_vec(state).map_err(|e| DevoltError::Serialization(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(b"devolt:state_root:v1:");
    hasher.update(&bytes);
    Ok(hasher.finalize().into())
}
