use zeroize::Zeroizing;

use crate::crypto::{BLOCK_SIZE, CipherProvider, CtrCipher};
use crate::srtp::constants::{
    MAX_SALT_LEN, SRTCP_LABEL_AUTH, SRTCP_LABEL_ENCRYPTION, SRTCP_LABEL_SALT, SRTP_LABEL_AUTH,
    SRTP_LABEL_ENCRYPTION, SRTP_LABEL_SALT,
};
use crate::srtp::context_error::ContextError;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::srtp_policy::SrtpPolicy;

/// Domain-separation labels of RFC 3711 §4.3.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KdfLabel {
    RtpEncryption = SRTP_LABEL_ENCRYPTION,
    RtpAuth = SRTP_LABEL_AUTH,
    RtpSalt = SRTP_LABEL_SALT,
    RtcpEncryption = SRTCP_LABEL_ENCRYPTION,
    RtcpAuth = SRTCP_LABEL_AUTH,
    RtcpSalt = SRTCP_LABEL_SALT,
}

impl KdfLabel {
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    fn expected_len(self, policy: &SrtpPolicy) -> usize {
        use KdfLabel::*;
        match self {
            RtpEncryption | RtcpEncryption => policy.enc_key_len(),
            RtpAuth | RtcpAuth => policy.auth_key_len(),
            RtpSalt | RtcpSalt => policy.salt_key_len(),
        }
    }
}

/// AES-CM (or Twofish-CM) key derivation keyed by the master key.
///
/// The key derivation rate is fixed at zero, so each label is derived once per
/// context.
pub struct SrtpKdf {
    ctr: Box<dyn CtrCipher>,
    master_salt: Zeroizing<Vec<u8>>,
    policy: SrtpPolicy,
}

impl SrtpKdf {
    /// # Errors
    /// [`ContextError::MasterSaltLength`] for salts over 14 bytes, or a cipher
    /// error if the master key does not fit the KDF cipher.
    pub fn new(
        master: &MasterSecret,
        policy: &SrtpPolicy,
        provider: &CipherProvider,
    ) -> Result<Self, ContextError> {
        if master.salt().len() > MAX_SALT_LEN {
            return Err(ContextError::MasterSaltLength {
                expected: MAX_SALT_LEN,
                got: master.salt().len(),
            });
        }
        let mut ctr = provider.ctr_cipher(policy.kdf_algorithm());
        ctr.init(master.key())?;
        Ok(Self {
            ctr,
            master_salt: Zeroizing::new(master.salt().to_vec()),
            policy: policy.clone(),
        })
    }

    /// Fills `out` with the session key for `label`. An empty `out` is a
    /// no-op.
    ///
    /// # Errors
    /// [`ContextError::KeyLengthMismatch`] when `out` is not the length the
    /// policy declares for this label.
    pub fn derive_session_key(
        &mut self,
        out: &mut [u8],
        label: KdfLabel,
    ) -> Result<(), ContextError> {
        if out.is_empty() {
            return Ok(());
        }
        let expected = label.expected_len(&self.policy);
        if out.len() != expected {
            return Err(ContextError::KeyLengthMismatch {
                label: label.value(),
                expected,
                got: out.len(),
            });
        }

        let mut iv = [0u8; BLOCK_SIZE];
        iv[..self.master_salt.len()].copy_from_slice(&self.master_salt);
        iv[7] ^= label.value();

        out.fill(0);
        let len = out.len();
        self.ctr.process(out, 0, len, &iv)?;
        Ok(())
    }

    /// Wipes the copy of the master salt. The master key only lives inside
    /// the cipher, which is dropped with `self`.
    pub fn close(mut self) {
        self.master_salt.fill(0);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::crypto::CipherBackend;
    use crate::log::{LogSink, NoopLogSink};
    use crate::srtp::SrtpProfile;
    use std::sync::Arc;

    fn rfc_master() -> MasterSecret {
        MasterSecret::new(
            hex::decode("E1F97A0D3E018BE0D64FA32C06DE4139").unwrap(),
            hex::decode("0EC675AD498AFEEBB6960B3AABE6").unwrap(),
        )
    }

    fn provider(backend: CipherBackend) -> CipherProvider {
        let logger: Arc<dyn LogSink> = Arc::new(NoopLogSink);
        CipherProvider::with_backend(backend, &logger).unwrap()
    }

    #[test]
    fn rfc3711_b3_vectors() {
        let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
        for backend in CipherBackend::ALL {
            let mut kdf = SrtpKdf::new(&rfc_master(), &policy, &provider(backend)).unwrap();

            let mut enc = [0u8; 16];
            let mut salt = [0u8; 14];
            let mut auth = [0u8; 20];
            kdf.derive_session_key(&mut enc, KdfLabel::RtpEncryption).unwrap();
            kdf.derive_session_key(&mut salt, KdfLabel::RtpSalt).unwrap();
            kdf.derive_session_key(&mut auth, KdfLabel::RtpAuth).unwrap();
            kdf.close();

            assert_eq!(hex::encode_upper(enc), "C61E7A93744F39EE10734AFE3FF7A087");
            assert_eq!(hex::encode_upper(salt), "30CBBC08863D8C85D49DB34A9AE1");
            assert_eq!(
                hex::encode_upper(auth),
                "CEBE321F6FF7716B6FD4AB49AF256A156D38BAA4"
            );
        }
    }

    #[test]
    fn derivation_is_deterministic_and_label_separated() {
        let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
        let p = provider(CipherBackend::RustCrypto);
        let mut a = SrtpKdf::new(&rfc_master(), &policy, &p).unwrap();
        let mut b = SrtpKdf::new(&rfc_master(), &policy, &p).unwrap();

        let (mut k1, mut k2, mut k3) = ([0u8; 16], [0u8; 16], [0u8; 16]);
        a.derive_session_key(&mut k1, KdfLabel::RtpEncryption).unwrap();
        b.derive_session_key(&mut k2, KdfLabel::RtpEncryption).unwrap();
        a.derive_session_key(&mut k3, KdfLabel::RtcpEncryption).unwrap();
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn length_rules() {
        let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
        let mut kdf =
            SrtpKdf::new(&rfc_master(), &policy, &provider(CipherBackend::RustCrypto)).unwrap();

        kdf.derive_session_key(&mut [], KdfLabel::RtpAuth).unwrap();
        assert_eq!(
            kdf.derive_session_key(&mut [0u8; 15], KdfLabel::RtpEncryption),
            Err(ContextError::KeyLengthMismatch {
                label: 0,
                expected: 16,
                got: 15
            })
        );
    }

    #[test]
    fn oversized_salt_is_rejected() {
        let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
        let master = MasterSecret::new(vec![0; 16], vec![0; 15]);
        assert!(matches!(
            SrtpKdf::new(&master, &policy, &provider(CipherBackend::RustCrypto)),
            Err(ContextError::MasterSaltLength { got: 15, .. })
        ));
    }
}
