//! Secret material for the CMS deployment (`KEY` / `SECRET`).

use uuid::Uuid;

/// Pair of independent secrets, each 32 bytes (64 hex characters).
///
/// Each value joins two UUID v4s, so it carries 244 random bits; the version
/// and variant bits of both halves are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPair {
    pub key: String,
    pub secret: String,
}

impl SecretPair {
    /// Environment-file lines for the CMS.
    pub fn to_env(&self) -> String {
        format!("KEY={}\nSECRET={}\n", self.key, self.secret)
    }
}

pub fn generate_secret_pair() -> SecretPair {
    SecretPair {
        key: random_hex_32(),
        secret: random_hex_32(),
    }
}

fn random_hex_32() -> String {
    let mut bytes = [0_u8; 32];
    bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    bytes[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    hex::encode(bytes)
}
