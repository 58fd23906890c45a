use std::fmt;

use crate::srtp::constants::{
    AUTH_TAG_LEN_32, AUTH_TAG_LEN_80, SESSION_AUTH_LEN, SESSION_KEY_LEN, SESSION_SALT_LEN,
};
use crate::srtp::srtp_policy::{AuthType, EncryptionType, SrtpPolicy};

/// Named protection profiles, as negotiated by DTLS-SRTP (RFC 5764) or
/// signalled in SDES crypto attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrtpProfile {
    Aes128CmHmacSha1_80,
    Aes128CmHmacSha1_32,
    Aes256CmHmacSha1_80,
    Aes256CmHmacSha1_32,
    NullHmacSha1_80,
    NullHmacSha1_32,
}

impl SrtpProfile {
    /// Accepts the OpenSSL spelling (`SRTP_AES128_CM_SHA1_80`) as well as the
    /// RFC 4568 one (`AES_CM_128_HMAC_SHA1_80`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        use SrtpProfile::*;
        match name.trim() {
            "SRTP_AES128_CM_SHA1_80" | "AES_CM_128_HMAC_SHA1_80" => Some(Aes128CmHmacSha1_80),
            "SRTP_AES128_CM_SHA1_32" | "AES_CM_128_HMAC_SHA1_32" => Some(Aes128CmHmacSha1_32),
            "SRTP_AES256_CM_SHA1_80" | "AES_256_CM_HMAC_SHA1_80" => Some(Aes256CmHmacSha1_80),
            "SRTP_AES256_CM_SHA1_32" | "AES_256_CM_HMAC_SHA1_32" => Some(Aes256CmHmacSha1_32),
            "SRTP_NULL_SHA1_80" | "NULL_HMAC_SHA1_80" => Some(NullHmacSha1_80),
            "SRTP_NULL_SHA1_32" | "NULL_HMAC_SHA1_32" => Some(NullHmacSha1_32),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        use SrtpProfile::*;
        match self {
            Aes128CmHmacSha1_80 => "SRTP_AES128_CM_SHA1_80",
            Aes128CmHmacSha1_32 => "SRTP_AES128_CM_SHA1_32",
            Aes256CmHmacSha1_80 => "SRTP_AES256_CM_SHA1_80",
            Aes256CmHmacSha1_32 => "SRTP_AES256_CM_SHA1_32",
            NullHmacSha1_80 => "SRTP_NULL_SHA1_80",
            NullHmacSha1_32 => "SRTP_NULL_SHA1_32",
        }
    }

    #[must_use]
    pub fn master_key_len(self) -> usize {
        match self {
            SrtpProfile::Aes256CmHmacSha1_80 | SrtpProfile::Aes256CmHmacSha1_32 => 32,
            _ => SESSION_KEY_LEN,
        }
    }

    #[must_use]
    pub fn master_salt_len(self) -> usize {
        SESSION_SALT_LEN
    }

    fn enc(self) -> (EncryptionType, usize) {
        match self {
            SrtpProfile::NullHmacSha1_80 | SrtpProfile::NullHmacSha1_32 => {
                (EncryptionType::Null, 0)
            }
            _ => (EncryptionType::AesCm, self.master_key_len()),
        }
    }

    fn rtp_tag_len(self) -> usize {
        match self {
            SrtpProfile::Aes128CmHmacSha1_32
            | SrtpProfile::Aes256CmHmacSha1_32
            | SrtpProfile::NullHmacSha1_32 => AUTH_TAG_LEN_32,
            _ => AUTH_TAG_LEN_80,
        }
    }

    #[must_use]
    pub fn rtp_policy(self) -> SrtpPolicy {
        let (enc_type, enc_key_len) = self.enc();
        SrtpPolicy::new(
            enc_type,
            enc_key_len,
            AuthType::HmacSha1,
            SESSION_AUTH_LEN,
            self.rtp_tag_len(),
            SESSION_SALT_LEN,
        )
    }

    /// SRTCP always carries an 80-bit tag, even for the `_32` profiles.
    #[must_use]
    pub fn rtcp_policy(self) -> SrtpPolicy {
        let (enc_type, enc_key_len) = self.enc();
        SrtpPolicy::new(
            enc_type,
            enc_key_len,
            AuthType::HmacSha1,
            SESSION_AUTH_LEN,
            AUTH_TAG_LEN_80,
            SESSION_SALT_LEN,
        )
    }
}

impl fmt::Display for SrtpProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
