//! ERC-20 transfer vouchers.
//!
//! Layout (68 bytes), consumed verbatim by the settlement layer:
//!
//! ```text
//! selector a9059cbb (4) || zero pad (12) || recipient (20) || amount big-endian (32)
//! ```

use devolt_types::{
    Address, DevoltError, Result, U256, Voucher,
    constants::{TRANSFER_PAYLOAD_LEN, TRANSFER_SELECTOR, WORD_LEN},
};

/// A decoded transfer instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub recipient: Address,
    pub amount: U256,
}

/// Encode `transfer(recipient, amount)` calldata.
#[must_use]
pub fn encode_transfer(recipient: Address, amount: U256) -> Vec<u8> {
    let mut payload = Vec::with_capacity(TRANSFER_PAYLOAD_LEN);
    payload.extend_from_slice(&TRANSFER_SELECTOR);
    payload.extend_from_slice(&[0u8; WORD_LEN - Address::LEN]);
    payload.extend_from_slice(recipient.as_bytes());
    let mut word = [0u8; WORD_LEN];
    amount.to_big_endian(&mut word);
    payload.extend_from_slice(&word);
    payload
}

/// Voucher moving `amount` of the token at `token` to `recipient`.
#[must_use]
pub fn transfer_voucher(token: Address, recipient: Address, amount: U256) -> Voucher {
    Voucher {
        destination: token,
        payload: encode_transfer(recipient, amount),
    }
}

/// Decode transfer calldata, rejecting anything that is not exactly the
/// canonical layout.
pub fn decode_transfer(payload: &[u8]) -> Result<Transfer> {
    if payload.len() != TRANSFER_PAYLOAD_LEN {
        return Err(malformed(format!(
            "transfer payload must be {TRANSFER_PAYLOAD_LEN} bytes, got {}",
            payload.len()
        )));
    }
    let (selector, rest) = payload.split_at(4);
    if selector != TRANSFER_SELECTOR {
        return Err(malformed(format!(
            "unexpected selector 0x{}",
            hex::encode(selector)
        )));
    }
    let (address_word, amount_word) = rest.split_at(WORD_LEN);
    let (pad, recipient) = address_word.split_at(WORD_LEN - Address::LEN);
    if pad.iter().any(|b| *b != 0) {
        return Err(malformed("address word has non-zero padding"));
    }
    Ok(Transfer {
        recipient: Address::from_slice(recipient)?,
        amount: U256::from_big_endian(amount_word),
    })
}

fn malformed(reason: impl Into<String>) -> DevoltError {
    DevoltError::MalformedPayload {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Address {
        "0x9965507D1a55bcC2695C58ba16FB37d819B0A4dc".parse().unwrap()
    }

    #[test]
    fn layout_is_bit_exact() {
        let payload = encode_transfer(sender(), U256::from(10_000u64));

        let mut expected = Vec::with_capacity(68);
        expected.extend_from_slice(&[0xa9, 0x05, 0x9c, 0xbb]);
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(sender().as_bytes());
        let mut amount = [0u8; 32];
        amount[30] = 0x27;
        amount[31] = 0x10; // 10_000
        expected.extend_from_slice(&amount);

        assert_eq!(payload, expected);
        assert_eq!(payload.len(), TRANSFER_PAYLOAD_LEN);
    }

    #[test]
    fn voucher_targets_token_contract() {
        let token = Address::from_low_u8(1);
        let v = transfer_voucher(token, sender(), U256::from(5u64));
        assert_eq!(v.destination, token);
        assert_eq!(decode_transfer(&v.payload).unwrap().recipient, sender());
    }

    #[test]
    fn max_amount_survives() {
        let payload = encode_transfer(sender(), U256::MAX);
        assert!(payload[36..].iter().all(|b| *b == 0xff));
        assert_eq!(decode_transfer(&payload).unwrap().amount, U256::MAX);
    }

    #[test]
    fn rejects_bad_length_selector_and_padding() {
        let good = encode_transfer(sender(), U256::one());

        assert!(decode_transfer(&good[..67]).is_err());

        let mut bad_selector = good.clone();
        bad_selector[0] = 0x00;
        assert!(matches!(
            decode_transfer(&bad_selector).unwrap_err(),
            DevoltError::MalformedPayload { .. }
        ));

        let mut bad_pad = good;
        bad_pad[5] = 0x01;
        assert!(decode_transfer(&bad_pad).is_err());
    }
}
