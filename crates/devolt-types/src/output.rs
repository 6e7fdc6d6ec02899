//! Outputs produced by processing one input.
//!
//! Each committed input yields zero or one notice and zero or more vouchers.
//! Outputs are collected in emission order; that order is part of the
//! deterministic result.

use serde::{Deserialize, Serialize};

use crate::Address;

/// A human-readable receipt for an accepted state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notice(pub String);

impl Notice {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An instruction for the external settlement layer: call `destination`
/// (the token contract) with `payload` (ABI-encoded transfer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub destination: Address,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

/// Everything emitted for a single input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outputs {
    pub notices: Vec<Notice>,
    pub vouchers: Vec<Voucher>,
}

impl Outputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs carrying just one notice.
    #[must_use]
    pub fn notice(text: impl Into<String>) -> Self {
        let mut out = Self::new();
        out.push_notice(text);
        out
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push(Notice(text.into()));
    }

    pub fn push_voucher(&mut self, voucher: Voucher) {
        self.vouchers.push(voucher);
    }

    /// Append `other` after everything already collected.
    pub fn extend(&mut self, other: Self) {
        self.notices.extend(other.notices);
        self.vouchers.extend(other.vouchers);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty() && self.vouchers.is_empty()
    }
}
