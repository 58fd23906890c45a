use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::crypto::cipher_error::CipherError;

type HmacSha1 = Hmac<Sha1>;

/// Full HMAC-SHA1 output; SRTP tags are a prefix of it.
pub const HMAC_SHA1_LEN: usize = 20;

/// Keyed MAC over `packet || rollover` as SRTP and SRTCP define it.
pub trait PacketAuthenticator: Send {
    /// MAC over the packet bytes followed by the big-endian 32-bit `rollover`
    /// (ROC for RTP, E-flag plus index for RTCP).
    fn compute(&self, packet: &[u8], rollover: u32) -> [u8; HMAC_SHA1_LEN];

    /// Recomputes the MAC and compares its prefix with `tag` in constant time.
    fn verify(&self, packet: &[u8], rollover: u32, tag: &[u8]) -> bool {
        let full = self.compute(packet, rollover);
        tag.len() <= full.len() && constant_time_eq(&full[..tag.len()], tag)
    }
}

pub struct HmacSha1Authenticator {
    keyed: HmacSha1,
}

impl HmacSha1Authenticator {
    /// # Errors
    /// [`CipherError::InvalidKeyLength`] if the MAC rejects the key.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let keyed = HmacSha1::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength {
            algorithm: "HMAC-SHA1",
            len: key.len(),
        })?;
        Ok(Self { keyed })
    }
}

impl PacketAuthenticator for HmacSha1Authenticator {
    fn compute(&self, packet: &[u8], rollover: u32) -> [u8; HMAC_SHA1_LEN] {
        let mut mac = self.keyed.clone();
        mac.update(packet);
        mac.update(&rollover.to_be_bytes());
        let mut out = [0u8; HMAC_SHA1_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

/// Compares two byte strings without an early exit on the first mismatch.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}
