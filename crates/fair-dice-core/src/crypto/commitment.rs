//! HMAC commitment for the commit-reveal scheme.
//!
//! `digest = HMAC-SHA256(key, decimal(value))`. The digest is published
//! first; value and key are disclosed only after the other party has
//! contributed.

use super::sampler::UnbiasedSampler;
use crate::error::{FairError, Result, Violation};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of both the key and the digest.
pub const KEY_LEN: usize = 32;

/// Fresh 256-bit HMAC key, one per commitment. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(#[serde(with = "hex_bytes")] [u8; KEY_LEN]);

impl SecretKey {
    /// Generate a new key from the sampler's secure source
    pub fn generate<R: RngCore + CryptoRng>(sampler: &mut UnbiasedSampler<R>) -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        let filled = sampler.fill(&mut bytes);
        let key = Self(bytes);
        bytes.zeroize();
        filled.map(|()| key)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for SecretKey {
    type Err = FairError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex32(s, "key").map(Self)
    }
}

/// Published HMAC digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_bytes")] [u8; KEY_LEN]);

impl Digest {
    /// Compute `HMAC-SHA256(key, decimal(value))`
    pub fn compute(key: &SecretKey, value: u32) -> Result<Self> {
        let mac = keyed_mac(key, value)?;
        Ok(Self(mac.finalize().into_bytes().into()))
    }

    /// Check that `key` and `value` reproduce this digest. Comparison is
    /// constant time.
    pub fn verify(&self, key: &SecretKey, value: u32) -> bool {
        match keyed_mac(key, value) {
            Ok(mac) => mac.verify_slice(&self.0).is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = FairError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex32(s, "digest").map(Self)
    }
}

fn keyed_mac(key: &SecretKey, value: u32) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())?;
    mac.update(value.to_string().as_bytes());
    Ok(mac)
}

fn parse_hex32(s: &str, what: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = hex::decode(s.trim())
        .map_err(|e| FairError::invalid(format!("{what} is not valid hex: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        FairError::invalid(format!(
            "{what} must be {KEY_LEN} bytes, got {}",
            b.len()
        ))
    })
}

/// A committed secret value. Only the digest is public until [`reveal`].
///
/// [`reveal`]: Commitment::reveal
pub struct Commitment {
    value: u32,
    key: SecretKey,
    digest: Digest,
}

impl Commitment {
    /// Bind `value` under a freshly generated key
    pub fn commit<R: RngCore + CryptoRng>(
        value: u32,
        sampler: &mut UnbiasedSampler<R>,
    ) -> Result<Self> {
        let key = SecretKey::generate(sampler)?;
        let digest = Digest::compute(&key, value)?;
        Ok(Self { value, key, digest })
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Disclose value and key. Repeating it yields the same payload.
    pub fn reveal(&self) -> Reveal {
        Reveal {
            value: self.value,
            key: self.key.clone(),
        }
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Revealed secret and key.
///
/// On the wire the value is its canonical decimal text (exactly what was
/// hashed) and the key is hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    #[serde(with = "decimal_text")]
    pub value: u32,
    pub key: SecretKey,
}

impl Reveal {
    /// The exact message that was fed to the HMAC
    pub fn message(&self) -> String {
        self.value.to_string()
    }

    /// Verify this reveal against a previously published digest
    pub fn verify(&self, digest: &Digest) -> Result<()> {
        if digest.verify(&self.key, self.value) {
            Ok(())
        } else {
            Err(Violation::DigestMismatch.into())
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

mod decimal_text {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, s: S) -> Result<S::Ok, S::Error> {
        value.to_string().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let text = String::deserialize(d)?;
        let value: u32 = text.parse().map_err(serde::de::Error::custom)?;
        // Anything other than canonical text would hash differently.
        if value.to_string() != text {
            return Err(serde::de::Error::custom("value is not in canonical decimal form"));
        }
        Ok(value)
    }
}
