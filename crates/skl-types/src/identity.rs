use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const KDF_CONTEXT: &str = "skl 2024 developer identity v1";

/// Prefix of the human-readable developer id form.
pub const DEV_PREFIX: &str = "dev:";

/// What a [`DeveloperId`] is derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityMaterial {
    /// A principal's public key, as the host authenticated it.
    PublicKey([u8; 32]),
    /// A local handle, used by the CLI and tests.
    Handle(String),
}

impl IdentityMaterial {
    fn tag(&self) -> u8 {
        match self {
            IdentityMaterial::PublicKey(_) => 1,
            IdentityMaterial::Handle(_) => 2,
        }
    }

    fn body(&self) -> &[u8] {
        match self {
            IdentityMaterial::PublicKey(key) => key.as_slice(),
            IdentityMaterial::Handle(handle) => handle.as_bytes(),
        }
    }
}

/// Opaque identity of a developer acting on the ledger.
///
/// The ledger compares and stores ids but never authenticates them; the host
/// vouches for the caller. Ids are the BLAKE3 key derivation of their
/// material, so the same key or handle always maps to the same id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeveloperId([u8; 32]);

impl DeveloperId {
    pub fn derive(material: &IdentityMaterial) -> Self {
        let mut kdf = blake3::Hasher::new_derive_key(KDF_CONTEXT);
        kdf.update(&[material.tag()]);
        kdf.update(material.body());
        Self(kdf.finalize().into())
    }

    pub fn from_handle(handle: &str) -> Self {
        Self::derive(&IdentityMaterial::Handle(handle.to_owned()))
    }

    pub fn from_public_key(key: [u8; 32]) -> Self {
        Self::derive(&IdentityMaterial::PublicKey(key))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// All 64 hex digits, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `dev:` followed by the first four bytes in hex.
    pub fn short_id(&self) -> String {
        let mut short = String::with_capacity(DEV_PREFIX.len() + 8);
        short.push_str(DEV_PREFIX);
        short.push_str(&hex::encode(&self.0[..4]));
        short
    }

    /// Parse the full hex form, with or without the `dev:` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        s.parse()
    }
}

impl FromStr for DeveloperId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix(DEV_PREFIX).unwrap_or(s);
        let decoded = hex::decode(digits).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|rest: Vec<u8>| TypeError::InvalidLength {
                expected: 32,
                actual: rest.len(),
            })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeveloperId").field(&self.short_id()).finish()
    }
}

impl fmt::Display for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_id())
    }
}
