use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::srtp::srtp_policy::SrtpPolicy;

/// Negotiated master key and salt for one direction of a session.
///
/// Both buffers are wiped on drop and by [`zeroize`](Zeroize::zeroize).
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    key: Vec<u8>,
    salt: Vec<u8>,
}

impl MasterSecret {
    #[must_use]
    pub fn new(key: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { key, salt }
    }

    /// Splits keying material laid out as `key || salt`, the way DTLS-SRTP
    /// exporters hand out each side.
    #[must_use]
    pub fn from_concatenated(material: &[u8], key_len: usize) -> Option<Self> {
        (material.len() >= key_len).then(|| {
            let (key, salt) = material.split_at(key_len);
            Self::new(key.to_vec(), salt.to_vec())
        })
    }

    /// Random material sized for `policy`, for loopback sessions and tests.
    #[must_use]
    pub fn generate(policy: &SrtpPolicy) -> Self {
        let mut rng = rand::thread_rng();
        let mut key = vec![0u8; policy.master_key_len()];
        let mut salt = vec![0u8; policy.salt_key_len()];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut salt);
        Self { key, salt }
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterSecret")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("salt", &format_args!("<{} bytes>", self.salt.len()))
            .finish()
    }
}
