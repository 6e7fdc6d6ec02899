//! Inputs sent by the rollup's portal contracts.
//!
//! ERC-20 portal deposit layout:
//!
//! ```text
//! success (1) || token (20) || sender (20) || amount (32, big-endian) || exec-layer data
//! ```
//!
//! The exec-layer data carries the JSON action the depositor wants to run.
//! The address relay sends the application address as a bare 20-byte
//! payload.

use devolt_types::{
    Address, DevoltError, Result, TokenDeposit, U256,
    constants::{ERC20_DEPOSIT_HEADER_LEN, WORD_LEN},
};

/// A decoded ERC-20 deposit and the action attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDeposit {
    pub deposit: TokenDeposit,
    pub exec_layer_data: Vec<u8>,
}

/// Decode an ERC-20 portal deposit.
///
/// # Errors
/// `MalformedPayload` if the payload is shorter than the fixed header or
/// the portal reports a failed transfer.
pub fn decode_erc20_deposit(payload: &[u8]) -> Result<DecodedDeposit> {
    if payload.len() < ERC20_DEPOSIT_HEADER_LEN {
        return Err(DevoltError::MalformedPayload {
            reason: format!(
                "erc20 deposit needs at least {ERC20_DEPOSIT_HEADER_LEN} bytes, got {}",
                payload.len()
            ),
        });
    }
    if payload[0] != 1 {
        return Err(DevoltError::MalformedPayload {
            reason: "erc20 deposit reported a failed transfer".to_string(),
        });
    }

    let token = Address::from_slice(&payload[1..21])?;
    let sender = Address::from_slice(&payload[21..41])?;
    let amount = U256::from_big_endian(&payload[41..41 + WORD_LEN]);

    Ok(DecodedDeposit {
        deposit: TokenDeposit {
            token,
            sender,
            amount,
        },
        exec_layer_data: payload[ERC20_DEPOSIT_HEADER_LEN..].to_vec(),
    })
}

/// Encode a successful ERC-20 portal deposit. Used by harnesses that feed
/// the engine directly.
#[must_use]
pub fn encode_erc20_deposit(deposit: &TokenDeposit, exec_layer_data: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(ERC20_DEPOSIT_HEADER_LEN + exec_layer_data.len());
    payload.push(1);
    payload.extend_from_slice(deposit.token.as_bytes());
    payload.extend_from_slice(deposit.sender.as_bytes());
    let mut word = [0u8; WORD_LEN];
    deposit.amount.to_big_endian(&mut word);
    payload.extend_from_slice(&word);
    payload.extend_from_slice(exec_layer_data);
    payload
}

/// Decode the application address sent by the relay.
pub fn decode_address_relay(payload: &[u8]) -> Result<Address> {
    Address::from_slice(payload).map_err(|_| DevoltError::MalformedPayload {
        reason: format!(
            "address relay payload must be {} bytes, got {}",
            Address::LEN,
            payload.len()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit() -> TokenDeposit {
        TokenDeposit {
            token: Address::from_low_u8(0xaa),
            sender: Address::from_low_u8(0xbb),
            amount: U256::from(10_000u64),
        }
    }

    #[test]
    fn decodes_header_and_exec_data() {
        let exec = br#"{"path":"createBid","payload":{"price":"1000"}}"#;
        let raw = encode_erc20_deposit(&deposit(), exec);
        assert_eq!(raw.len(), 73 + exec.len());

        let decoded = decode_erc20_deposit(&raw).unwrap();
        assert_eq!(decoded.deposit, deposit());
        assert_eq!(decoded.exec_layer_data, exec.to_vec());
    }

    #[test]
    fn amount_is_big_endian() {
        let raw = encode_erc20_deposit(&deposit(), &[]);
        assert_eq!(&raw[71..73], &[0x27, 0x10]);
        assert!(raw[41..71].iter().all(|b| *b == 0));
    }

    #[test]
    fn rejects_failed_transfer() {
        let mut raw = encode_erc20_deposit(&deposit(), &[]);
        raw[0] = 0;
        assert!(matches!(
            decode_erc20_deposit(&raw).unwrap_err(),
            DevoltError::MalformedPayload { .. }
        ));
    }

    #[test]
    fn rejects_short_payload() {
        let raw = encode_erc20_deposit(&deposit(), &[]);
        assert!(decode_erc20_deposit(&raw[..72]).is_err());
        assert!(decode_erc20_deposit(&[]).is_err());
    }

    #[test]
    fn relay_payload_is_exactly_one_address() {
        let app = Address::from_low_u8(0x42);
        assert_eq!(decode_address_relay(app.as_bytes()).unwrap(), app);
        assert!(decode_address_relay(&[0u8; 19]).is_err());
        assert!(decode_address_relay(&[0u8; 32]).is_err());
    }
}
