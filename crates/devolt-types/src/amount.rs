//! 256-bit amounts.
//!
//! Credits, prices and token amounts are unbounded on the ledger side, so
//! every quantity is a [`U256`]. JSON carries them as decimal strings
//! (`"100000"`) or plain integers; both are accepted on input and the
//! decimal-string form is always produced on output.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub use primitive_types::U256;

use crate::{DevoltError, Result};

/// Parse a base-10 amount.
pub fn parse_amount(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DevoltError::InvalidInput(format!(
            "amount {raw:?} is not an unsigned decimal integer"
        )));
    }
    U256::from_dec_str(trimmed)
        .map_err(|e| DevoltError::InvalidInput(format!("amount {raw:?} out of range: {e:?}")))
}

/// `a + b`, failing instead of wrapping.
pub fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b)
        .ok_or_else(|| DevoltError::Overflow(format!("{a} + {b}")))
}

/// `a - b`, failing on underflow.
pub fn sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b)
        .ok_or_else(|| DevoltError::Overflow(format!("{a} - {b}")))
}

/// `a * b`, failing instead of wrapping.
pub fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b)
        .ok_or_else(|| DevoltError::Overflow(format!("{a} * {b}")))
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom("amount must not be negative"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<U256, E> {
        parse_amount(v).map_err(E::custom)
    }
}

/// Serde adapter: `#[serde(with = "devolt_types::amount::dec")]`.
pub mod dec {
    use super::{AmountVisitor, Deserializer, Serializer, U256};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Serde adapter for optional amounts. Pair with `#[serde(default)]`.
pub mod dec_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::U256;

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "super::dec")] U256);

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
    }
}
