use std::sync::Arc;

use zeroize::Zeroize;

use crate::crypto::{
    BLOCK_SIZE, CipherError, CipherProvider, CtrCipher, F8Cipher, HMAC_SHA1_LEN,
    HmacSha1Authenticator, PacketAuthenticator,
};
use crate::log::log_sink::LogSink;
use crate::sink_error;
use crate::srtp::context_error::ContextError;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::replay_window::ReplayWindow;
use crate::srtp::session_keys::{KeyLabels, SessionKeys};
use crate::srtp::srtp_error::{SrtpError, SrtpResult};
use crate::srtp::srtp_policy::{AuthType, SrtpPolicy};

enum PayloadCipher {
    Null,
    Ctr(Box<dyn CtrCipher>),
    F8(F8Cipher),
}

/// Key material, transforms and replay bitmask shared by the RTP and RTCP
/// contexts. Each context owns exactly one.
pub(crate) struct CryptoContextCore {
    pub(crate) ssrc: u32,
    pub(crate) policy: SrtpPolicy,
    pub(crate) replay_window: ReplayWindow,
    pub(crate) logger: Arc<dyn LogSink>,
    keys: SessionKeys,
    cipher: PayloadCipher,
    mac: Option<Box<dyn PacketAuthenticator>>,
    closed: bool,
}

impl CryptoContextCore {
    pub(crate) fn new(
        ssrc: u32,
        master: &MasterSecret,
        policy: &SrtpPolicy,
        provider: &CipherProvider,
        labels: KeyLabels,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, ContextError> {
        policy.validate()?;
        let keys = SessionKeys::derive(master, policy, provider, labels)?;

        let enc_type = policy.enc_type();
        let cipher = match enc_type.block_algorithm() {
            None => PayloadCipher::Null,
            Some(alg) if enc_type.is_f8() => {
                let mut f8 = provider.f8_cipher(alg);
                f8.init(&keys.enc_key, &keys.salt)?;
                PayloadCipher::F8(f8)
            }
            Some(alg) => {
                let mut ctr = provider.ctr_cipher(alg);
                ctr.init(&keys.enc_key)?;
                PayloadCipher::Ctr(ctr)
            }
        };

        let mac: Option<Box<dyn PacketAuthenticator>> = match policy.auth_type() {
            AuthType::Null => None,
            AuthType::HmacSha1 => Some(Box::new(HmacSha1Authenticator::new(&keys.auth_key)?)),
            AuthType::Skein => return Err(ContextError::UnsupportedAuth("Skein")),
        };

        Ok(Self {
            ssrc,
            policy: policy.clone(),
            replay_window: ReplayWindow::new(),
            logger,
            keys,
            cipher,
            mac,
            closed: false,
        })
    }

    pub(crate) fn salt(&self) -> &[u8] {
        &self.keys.salt
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn encrypts(&self) -> bool {
        !matches!(self.cipher, PayloadCipher::Null)
    }

    pub(crate) fn uses_f8(&self) -> bool {
        matches!(self.cipher, PayloadCipher::F8(_))
    }

    /// Runs the payload transform over `data[offset..]`. NULL encryption
    /// leaves the bytes alone.
    pub(crate) fn apply_keystream(
        &mut self,
        data: &mut [u8],
        offset: usize,
        iv: &[u8; BLOCK_SIZE],
    ) -> SrtpResult {
        let len = data.len().saturating_sub(offset);
        let res: Result<(), CipherError> = match &mut self.cipher {
            PayloadCipher::Null => Ok(()),
            PayloadCipher::Ctr(ctr) => ctr.process(data, offset, len, iv),
            PayloadCipher::F8(f8) => f8.process(data, offset, len, iv),
        };
        res.map_err(|e| {
            sink_error!(
                self.logger,
                "[SRTP] Payload transform failed for SSRC {:#010x}: {}",
                self.ssrc,
                e
            );
            SrtpError::InvalidPacket
        })
    }

    /// Full MAC over `packet || rollover`, or `None` with NULL authentication.
    pub(crate) fn compute_tag(&self, packet: &[u8], rollover: u32) -> Option<[u8; HMAC_SHA1_LEN]> {
        self.mac.as_ref().map(|mac| mac.compute(packet, rollover))
    }

    /// Constant-time tag check; always passes with NULL authentication.
    pub(crate) fn verify_tag(&self, packet: &[u8], rollover: u32, tag: &[u8]) -> bool {
        self.mac
            .as_ref()
            .is_none_or(|mac| mac.verify(packet, rollover, tag))
    }

    /// Wipes the session keys and drops the keyed transforms.
    pub(crate) fn close(&mut self) {
        self.keys.zeroize();
        self.cipher = PayloadCipher::Null;
        self.mac = None;
        self.replay_window = ReplayWindow::new();
        self.closed = true;
    }
}
