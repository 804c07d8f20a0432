//! Asymmetric-crypto collaborator.
//!
//! RSA with PKCS#1 v1.5 encryption. Key components cross this module's
//! boundary only as base-10 ASCII text, the same representation the
//! wire format and the keystore use, so arbitrary key sizes survive
//! without a binary bignum format.

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Modulus size for newly generated keys.
pub const KEY_BITS: usize = 2048;

/// Private key components as decimal text, the form the keystore
/// persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypairRecord {
    /// Modulus n.
    pub modulus: String,
    /// Public exponent e.
    pub public_exponent: String,
    /// Private exponent d.
    pub private_exponent: String,
    /// Prime factors of n.
    pub primes: Vec<String>,
}

/// An RSA keypair owned by this client.
#[derive(Debug, Clone)]
pub struct Keypair {
    private: RsaPrivateKey,
}

impl Keypair {
    /// Generate a fresh keypair at the default size. Takes a second or
    /// two for 2048 bits.
    pub fn generate() -> Result<Self, ClientError> {
        Self::generate_bits(KEY_BITS)
    }

    /// Generate a keypair with an explicit modulus size.
    pub fn generate_bits(bits: usize) -> Result<Self, ClientError> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, bits)?;
        Ok(Self { private })
    }

    /// Public components as decimal text: `(exponent, modulus)`.
    pub fn public_components(&self) -> (String, String) {
        let public = RsaPublicKey::from(&self.private);
        (public.e().to_string(), public.n().to_string())
    }

    /// Decrypt a payload encrypted to this keypair's public half.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, ClientError> {
        Ok(self.private.decrypt(Pkcs1v15Encrypt, ciphertext)?)
    }

    /// Export for the keystore.
    pub fn to_record(&self) -> KeypairRecord {
        KeypairRecord {
            modulus: self.private.n().to_string(),
            public_exponent: self.private.e().to_string(),
            private_exponent: self.private.d().to_string(),
            primes: self.private.primes().iter().map(ToString::to_string).collect(),
        }
    }

    /// Rebuild from a keystore record.
    pub fn from_record(record: &KeypairRecord) -> Result<Self, ClientError> {
        let primes = record
            .primes
            .iter()
            .map(|p| parse_decimal(p, "prime"))
            .collect::<Result<Vec<_>, _>>()?;
        let private = RsaPrivateKey::from_components(
            parse_decimal(&record.modulus, "modulus")?,
            parse_decimal(&record.public_exponent, "public exponent")?,
            parse_decimal(&record.private_exponent, "private exponent")?,
            primes,
        )?;
        Ok(Self { private })
    }
}

/// Encrypt `plaintext` to a peer's published key components.
///
/// PKCS#1 v1.5 caps the plaintext at the modulus size minus 11 bytes
/// (245 for a 2048-bit key); longer messages are refused by the
/// underlying library.
pub fn encrypt_for(
    exponent: &str,
    modulus: &str,
    plaintext: &[u8],
) -> Result<Vec<u8>, ClientError> {
    let public = RsaPublicKey::new(
        parse_decimal(modulus, "modulus")?,
        parse_decimal(exponent, "exponent")?,
    )?;
    let mut rng = rand::thread_rng();
    Ok(public.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)?)
}

fn parse_decimal(text: &str, field: &'static str) -> Result<BigUint, ClientError> {
    BigUint::parse_bytes(text.as_bytes(), 10).ok_or(ClientError::BadKeyText { field })
}

/// 512-bit keypair for tests; generation at full size takes seconds and
/// the component plumbing is identical at any size.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_keypair() -> Keypair {
    Keypair::generate_bits(512).unwrap()
}
