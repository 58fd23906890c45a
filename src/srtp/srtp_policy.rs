use crate::crypto::{BlockAlgorithm, HMAC_SHA1_LEN};
use crate::srtp::constants::{MAX_SALT_LEN, SESSION_KEY_LEN};
use crate::srtp::context_error::ContextError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionType {
    Null,
    AesCm,
    AesF8,
    TwofishCm,
    TwofishF8,
}

impl EncryptionType {
    /// Block cipher behind the transform; `None` for NULL encryption.
    #[must_use]
    pub fn block_algorithm(self) -> Option<BlockAlgorithm> {
        match self {
            EncryptionType::Null => None,
            EncryptionType::AesCm | EncryptionType::AesF8 => Some(BlockAlgorithm::Aes),
            EncryptionType::TwofishCm | EncryptionType::TwofishF8 => Some(BlockAlgorithm::Twofish),
        }
    }

    #[must_use]
    pub fn is_f8(self) -> bool {
        matches!(self, EncryptionType::AesF8 | EncryptionType::TwofishF8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthType {
    Null,
    HmacSha1,
    /// Enumerated for completeness; no MAC backend is available for it.
    Skein,
}

/// Which transforms and key sizes apply to one stream type (RTP or RTCP).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtpPolicy {
    enc_type: EncryptionType,
    enc_key_len: usize,
    auth_type: AuthType,
    auth_key_len: usize,
    auth_tag_len: usize,
    salt_key_len: usize,
    send_replay_enabled: bool,
    receive_replay_enabled: bool,
}

impl SrtpPolicy {
    /// Both replay-protection switches start enabled.
    #[must_use]
    pub fn new(
        enc_type: EncryptionType,
        enc_key_len: usize,
        auth_type: AuthType,
        auth_key_len: usize,
        auth_tag_len: usize,
        salt_key_len: usize,
    ) -> Self {
        Self {
            enc_type,
            enc_key_len,
            auth_type,
            auth_key_len,
            auth_tag_len,
            salt_key_len,
            send_replay_enabled: true,
            receive_replay_enabled: true,
        }
    }

    #[must_use]
    pub fn enc_type(&self) -> EncryptionType {
        self.enc_type
    }

    #[must_use]
    pub fn enc_key_len(&self) -> usize {
        self.enc_key_len
    }

    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    #[must_use]
    pub fn auth_key_len(&self) -> usize {
        self.auth_key_len
    }

    /// Tag bytes on the wire; zero with NULL authentication.
    #[must_use]
    pub fn auth_tag_len(&self) -> usize {
        self.auth_tag_len
    }

    /// Master key length this policy derives from. NULL encryption still
    /// runs the KDF, which then uses AES-128.
    #[must_use]
    pub fn master_key_len(&self) -> usize {
        match self.enc_type {
            EncryptionType::Null => SESSION_KEY_LEN,
            _ => self.enc_key_len,
        }
    }

    /// Block cipher the KDF runs on.
    #[must_use]
    pub fn kdf_algorithm(&self) -> BlockAlgorithm {
        self.enc_type.block_algorithm().unwrap_or(BlockAlgorithm::Aes)
    }

    #[must_use]
    pub fn salt_key_len(&self) -> usize {
        self.salt_key_len
    }

    #[must_use]
    pub fn is_send_replay_enabled(&self) -> bool {
        self.send_replay_enabled
    }

    #[must_use]
    pub fn is_receive_replay_enabled(&self) -> bool {
        self.receive_replay_enabled
    }

    pub fn set_send_replay_enabled(&mut self, enabled: bool) {
        self.send_replay_enabled = enabled;
    }

    /// Turn off for peers that deliberately resend identical packets.
    pub fn set_receive_replay_enabled(&mut self, enabled: bool) {
        self.receive_replay_enabled = enabled;
    }

    /// Checks the combination is one a context can be built from.
    ///
    /// # Errors
    /// [`ContextError::InvalidPolicy`] for inconsistent lengths and
    /// [`ContextError::UnsupportedAuth`] for Skein.
    pub fn validate(&self) -> Result<(), ContextError> {
        let invalid = |why: String| Err(ContextError::InvalidPolicy(why));

        if self.salt_key_len > MAX_SALT_LEN {
            return invalid(format!(
                "salt of {} bytes exceeds {MAX_SALT_LEN}",
                self.salt_key_len
            ));
        }
        if let Some(alg) = self.enc_type.block_algorithm() {
            if alg.check_key_len(self.enc_key_len).is_err() {
                return invalid(format!(
                    "{alg} key of {} bytes (expected 16, 24 or 32)",
                    self.enc_key_len
                ));
            }
            if self.enc_type.is_f8() && self.salt_key_len > self.enc_key_len {
                return invalid("F8 salt is longer than the encryption key".into());
            }
        }

        match self.auth_type {
            AuthType::Null if self.auth_tag_len != 0 => {
                invalid("NULL authentication with a non-zero tag length".into())
            }
            AuthType::Null => Ok(()),
            AuthType::HmacSha1 if self.auth_key_len == 0 => {
                invalid("HMAC-SHA1 needs an authentication key".into())
            }
            AuthType::HmacSha1 if !(1..=HMAC_SHA1_LEN).contains(&self.auth_tag_len) => invalid(
                format!("HMAC-SHA1 tag of {} bytes", self.auth_tag_len),
            ),
            AuthType::HmacSha1 => Ok(()),
            AuthType::Skein => Err(ContextError::UnsupportedAuth("Skein")),
        }
    }
}
