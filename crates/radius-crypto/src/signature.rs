//! ECDSA signature operations using secp256k1

use crate::{keccak256, CryptoError};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use radius_primitives::{Address, H256};

/// ECDSA signature with recovery ID
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// 27 + recovery id
    pub v: u8,
}

/// Public key
pub type PublicKey = VerifyingKey;

/// Private key (32 bytes)
pub type PrivateKey = SigningKey;

impl Signature {
    /// Create signature from r, s, v components
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Signature { r, s, v }
    }

    /// Get recovery ID (0 or 1)
    pub fn recovery_id(&self) -> u8 {
        if self.v >= 27 {
            self.v - 27
        } else {
            self.v
        }
    }

    /// Convert to 65-byte representation (r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Parse from 65-byte representation
    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Signature { r, s, v: bytes[64] }
    }

    /// Check if signature has low-s value (EIP-2)
    pub fn is_low_s(&self) -> bool {
        self.to_k256()
            .map(|sig| sig.normalize_s().is_none())
            .unwrap_or(false)
    }

    fn to_k256(&self) -> Result<K256Signature, CryptoError> {
        let r: k256::FieldBytes = self.r.into();
        let s: k256::FieldBytes = self.s.into();
        K256Signature::from_scalars(r, s).map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

/// Sign a 32-byte digest. Deterministic (RFC 6979) and normalised to low-s.
pub fn sign(message_hash: &H256, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let (mut signature, mut recovery_id) = private_key
        .sign_prehash_recoverable(message_hash.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    // s' = n - s flips the parity of R's y coordinate
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::from_byte(recovery_id.to_byte() ^ 1).ok_or_else(|| {
            CryptoError::SigningFailed("invalid recovery id after normalization".to_string())
        })?;
    }

    Ok(Signature {
        r: signature.r().to_bytes().into(),
        s: signature.s().to_bytes().into(),
        v: recovery_id.to_byte() + 27,
    })
}

/// Verify a signature against a message hash and public key
pub fn verify(
    message_hash: &H256,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    let k256_sig = signature.to_k256()?;
    // high-s signatures are malleable copies; reject them
    if k256_sig.normalize_s().is_some() {
        return Ok(false);
    }

    Ok(public_key
        .verify_prehash(message_hash.as_bytes(), &k256_sig)
        .is_ok())
}

/// Recover public key from signature and message hash
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let k256_sig = signature.to_k256()?;
    let recovery_id = RecoveryId::from_byte(signature.recovery_id())
        .ok_or(CryptoError::InvalidRecoveryId(signature.recovery_id()))?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &k256_sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Recover the signer address from signature and message hash
pub fn recover_address(message_hash: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(message_hash, signature).map(|pk| public_key_to_address(&pk))
}

/// Derive the account address: last 20 bytes of keccak256 of the uncompressed key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    // skip the 0x04 tag
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(addr_bytes)
}
