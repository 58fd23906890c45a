use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::CipherProvider;
use crate::srtp::context_error::ContextError;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::srtp_kdf::{KdfLabel, SrtpKdf};
use crate::srtp::srtp_policy::{AuthType, EncryptionType, SrtpPolicy};

/// The three labels one stream type derives with.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyLabels {
    pub(crate) encryption: KdfLabel,
    pub(crate) auth: KdfLabel,
    pub(crate) salt: KdfLabel,
}

pub(crate) const RTP_LABELS: KeyLabels = KeyLabels {
    encryption: KdfLabel::RtpEncryption,
    auth: KdfLabel::RtpAuth,
    salt: KdfLabel::RtpSalt,
};

pub(crate) const RTCP_LABELS: KeyLabels = KeyLabels {
    encryption: KdfLabel::RtcpEncryption,
    auth: KdfLabel::RtcpAuth,
    salt: KdfLabel::RtcpSalt,
};

/// Session keys of one context, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SessionKeys {
    pub(crate) enc_key: Vec<u8>,
    pub(crate) auth_key: Vec<u8>,
    pub(crate) salt: Vec<u8>,
}

impl SessionKeys {
    /// Runs the KDF once per label. Keys the policy does not use come out
    /// empty.
    pub(crate) fn derive(
        master: &MasterSecret,
        policy: &SrtpPolicy,
        provider: &CipherProvider,
        labels: KeyLabels,
    ) -> Result<Self, ContextError> {
        let mut kdf = SrtpKdf::new(master, policy, provider)?;

        let enc_len = match policy.enc_type() {
            EncryptionType::Null => 0,
            _ => policy.enc_key_len(),
        };
        let auth_len = match policy.auth_type() {
            AuthType::Null => 0,
            _ => policy.auth_key_len(),
        };

        let mut keys = SessionKeys {
            enc_key: vec![0u8; enc_len],
            auth_key: vec![0u8; auth_len],
            salt: vec![0u8; policy.salt_key_len()],
        };
        kdf.derive_session_key(&mut keys.salt, labels.salt)?;
        kdf.derive_session_key(&mut keys.enc_key, labels.encryption)?;
        kdf.derive_session_key(&mut keys.auth_key, labels.auth)?;
        kdf.close();
        Ok(keys)
    }
}
