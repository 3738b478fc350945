//! Unsigned and signed transactions

use bytes::Bytes;
use radius_crypto::{keccak256, recover_address, Signature};
use radius_primitives::{Address, H256, U256};

use crate::codec;
use crate::TypesError;

/// Unsigned legacy transaction.
///
/// `to == None` means contract creation. Nonce and value default to zero,
/// which is also how an absent nonce or value is represented on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Call data or init code
    pub data: Bytes,
    /// Gas limit
    pub gas: u64,
    /// Gas price in wei
    pub gas_price: U256,
    /// Sender nonce
    pub nonce: u64,
    /// Recipient (None for contract creation)
    pub to: Option<Address>,
    /// Value to transfer in wei
    pub value: U256,
}

impl Transaction {
    /// Returns a copy with the gas limit replaced.
    pub fn with_gas(&self, gas: u64) -> Self {
        Self {
            gas,
            ..self.clone()
        }
    }

    /// Check if this transaction creates a contract
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// RLP payload that is hashed for signing.
    ///
    /// EIP-155 nine-field list when `chain_id != 0`, pre-EIP-155 six-field
    /// list otherwise.
    pub fn signing_payload(&self, chain_id: u64) -> Vec<u8> {
        codec::encode_unsigned(self, chain_id)
    }

    /// Digest that a signer signs for `chain_id`
    pub fn signing_hash(&self, chain_id: u64) -> H256 {
        keccak256(&self.signing_payload(chain_id))
    }
}

/// Signature components as carried by a legacy transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxSignature {
    /// 27/28, or `recovery_id + 35 + 2 * chain_id` under EIP-155
    pub v: u64,
    /// R component
    pub r: H256,
    /// S component
    pub s: H256,
}

impl TxSignature {
    /// Create a new signature
    pub fn new(v: u64, r: H256, s: H256) -> Self {
        Self { v, r, s }
    }

    /// Check if signature is valid (non-zero r and s)
    pub fn is_valid(&self) -> bool {
        !self.r.is_zero() && !self.s.is_zero()
    }

    /// Chain ID encoded in `v`, or 0 for a pre-EIP-155 signature
    pub fn chain_id(&self) -> u64 {
        if self.v >= 35 {
            (self.v - 35) / 2
        } else {
            0
        }
    }

    /// Recovery id (0 or 1), if `v` is well formed
    pub fn recovery_id(&self) -> Option<u8> {
        match self.v {
            27 | 28 => Some((self.v - 27) as u8),
            v if v >= 35 => Some(((v - 35) % 2) as u8),
            _ => None,
        }
    }
}

/// Transaction together with its signature and canonical serialized bytes.
///
/// Produced once by a signer and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: TxSignature,
    serialized: Bytes,
}

impl SignedTransaction {
    /// Attach a signature and serialize
    pub fn new(transaction: Transaction, signature: TxSignature) -> Self {
        let serialized = Bytes::from(codec::encode_signed(&transaction, &signature));
        Self {
            transaction,
            signature,
            serialized,
        }
    }

    /// Keep raw bytes produced by an external signer as-is
    pub fn from_parts(transaction: Transaction, signature: TxSignature, serialized: Bytes) -> Self {
        Self {
            transaction,
            signature,
            serialized,
        }
    }

    /// Decode raw signed bytes
    pub fn decode(raw: &[u8]) -> Result<Self, TypesError> {
        let (transaction, signature) = codec::decode_signed(raw)?;
        Ok(Self {
            transaction,
            signature,
            serialized: Bytes::copy_from_slice(raw),
        })
    }

    /// The unsigned transaction
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The signature
    pub fn signature(&self) -> &TxSignature {
        &self.signature
    }

    /// Bytes broadcast via `eth_sendRawTransaction`
    pub fn serialized(&self) -> &Bytes {
        &self.serialized
    }

    /// Transaction hash: keccak256 of the serialized bytes
    pub fn hash(&self) -> H256 {
        keccak256(&self.serialized)
    }

    /// Recover the address that produced the signature
    pub fn recover_sender(&self) -> Result<Address, TypesError> {
        let recovery_id = self
            .signature
            .recovery_id()
            .ok_or_else(|| TypesError::InvalidSignature(format!("bad v {}", self.signature.v)))?;
        let sig = Signature::new(
            *self.signature.r.as_bytes(),
            *self.signature.s.as_bytes(),
            27 + recovery_id,
        );
        let hash = self.transaction.signing_hash(self.signature.chain_id());
        Ok(recover_address(&hash, &sig)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            data: Bytes::from_static(&[0xde, 0xad]),
            gas: 21_000,
            gas_price: U256::zero(),
            nonce: 3,
            to: Some(Address::from_bytes([0x11; 20])),
            value: U256::from(1000u64),
        }
    }

    #[test]
    fn test_with_gas_copies() {
        let tx = sample();
        let updated = tx.with_gas(50_000);
        assert_eq!(updated.gas, 50_000);
        assert_eq!(tx.gas, 21_000);
        assert_eq!(updated.nonce, tx.nonce);
        assert_eq!(updated.data, tx.data);
    }

    #[test]
    fn test_default_is_empty_creation() {
        let tx = Transaction::default();
        assert!(tx.is_contract_creation());
        assert_eq!(tx.nonce, 0);
        assert!(tx.value.is_zero());
    }

    #[test]
    fn test_signing_hash_depends_on_chain() {
        let tx = sample();
        assert_ne!(tx.signing_hash(0), tx.signing_hash(1));
        assert_ne!(tx.signing_hash(1), tx.signing_hash(2));
    }

    #[test]
    fn test_signature_chain_id_and_recovery() {
        let legacy = TxSignature::new(28, H256::ZERO, H256::ZERO);
        assert_eq!(legacy.chain_id(), 0);
        assert_eq!(legacy.recovery_id(), Some(1));

        let eip155 = TxSignature::new(37, H256::ZERO, H256::ZERO);
        assert_eq!(eip155.chain_id(), 1);
        assert_eq!(eip155.recovery_id(), Some(0));

        let bogus = TxSignature::new(30, H256::ZERO, H256::ZERO);
        assert_eq!(bogus.recovery_id(), None);
        assert!(!bogus.is_valid());
    }

    #[test]
    fn test_hash_is_keccak_of_serialized() {
        let signed = SignedTransaction::from_parts(
            sample(),
            TxSignature::new(27, H256::ZERO, H256::ZERO),
            Bytes::from_static(b"raw"),
        );
        assert_eq!(signed.hash(), keccak256(b"raw"));
    }
}
