//! RLP encoding of legacy transactions.
//!
//! Unsigned (signing) payload:
//! - chain ID 0: `[nonce, gas_price, gas, to, value, data]`
//! - otherwise (EIP-155): `[nonce, gas_price, gas, to, value, data, chain_id, 0, 0]`
//!
//! Signed: `[nonce, gas_price, gas, to, value, data, v, r, s]` with r and s
//! encoded as integers.

use bytes::Bytes;
use radius_primitives::{Address, H256, U256};
use rlp::{DecoderError, Rlp, RlpStream};

use crate::{Transaction, TxSignature, TypesError};

fn append_body(s: &mut RlpStream, tx: &Transaction) {
    s.append(&tx.nonce);
    s.append(&tx.gas_price);
    s.append(&tx.gas);
    match &tx.to {
        Some(to) => s.append(to),
        None => s.append_empty_data(),
    };
    s.append(&tx.value);
    s.append(&tx.data.to_vec());
}

/// Encode the payload that is hashed for signing
pub fn encode_unsigned(tx: &Transaction, chain_id: u64) -> Vec<u8> {
    let mut s = if chain_id == 0 {
        RlpStream::new_list(6)
    } else {
        RlpStream::new_list(9)
    };
    append_body(&mut s, tx);
    if chain_id != 0 {
        s.append(&chain_id);
        s.append(&0u8);
        s.append(&0u8);
    }
    s.out().to_vec()
}

/// Encode a signed transaction for broadcast
pub fn encode_signed(tx: &Transaction, sig: &TxSignature) -> Vec<u8> {
    let mut s = RlpStream::new_list(9);
    append_body(&mut s, tx);
    s.append(&sig.v);
    s.append(&U256::from_big_endian(sig.r.as_bytes()));
    s.append(&U256::from_big_endian(sig.s.as_bytes()));
    s.out().to_vec()
}

/// Decode a signed legacy transaction
pub fn decode_signed(raw: &[u8]) -> Result<(Transaction, TxSignature), TypesError> {
    let rlp = Rlp::new(raw);
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList.into());
    }
    if rlp.item_count()? != 9 {
        return Err(DecoderError::RlpIncorrectListLen.into());
    }

    let to_item = rlp.at(3)?;
    let to = if to_item.is_empty() {
        None
    } else {
        Some(to_item.as_val::<Address>()?)
    };
    let data: Vec<u8> = rlp.val_at(5)?;

    let tx = Transaction {
        nonce: rlp.val_at(0)?,
        gas_price: rlp.val_at(1)?,
        gas: rlp.val_at(2)?,
        to,
        value: rlp.val_at(4)?,
        data: Bytes::from(data),
    };

    let v: u64 = rlp.val_at(6)?;
    let r: U256 = rlp.val_at(7)?;
    let s: U256 = rlp.val_at(8)?;
    Ok((tx, TxSignature::new(v, u256_to_h256(r), u256_to_h256(s))))
}

fn u256_to_h256(value: U256) -> H256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    H256::from_bytes(bytes)
}
