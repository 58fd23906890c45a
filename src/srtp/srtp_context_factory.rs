use std::sync::{Arc, Mutex};

use zeroize::Zeroize;

use crate::crypto::CipherProvider;
use crate::log::log_sink::LogSink;
use crate::sink_debug;
use crate::srtp::context_error::ContextError;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::srtcp_crypto_context::SrtcpCryptoContext;
use crate::srtp::srtp_crypto_context::SrtpCryptoContext;
use crate::srtp::srtp_policy::SrtpPolicy;
use crate::srtp::srtp_profile::SrtpProfile;

/// Holds one direction's master secret and mints per-SSRC contexts from it.
///
/// Contexts copy their derived keys, so closing the factory (which wipes the
/// master secret) does not affect contexts already handed out.
pub struct SrtpContextFactory {
    sender: bool,
    master: Mutex<Option<MasterSecret>>,
    rtp_policy: SrtpPolicy,
    rtcp_policy: SrtpPolicy,
    provider: Arc<CipherProvider>,
    logger: Arc<dyn LogSink>,
}

fn check_master(master: &MasterSecret, policy: &SrtpPolicy) -> Result<(), ContextError> {
    if master.key().len() != policy.master_key_len() {
        return Err(ContextError::MasterKeyLength {
            expected: policy.master_key_len(),
            got: master.key().len(),
        });
    }
    if master.salt().len() != policy.salt_key_len() {
        return Err(ContextError::MasterSaltLength {
            expected: policy.salt_key_len(),
            got: master.salt().len(),
        });
    }
    Ok(())
}

impl SrtpContextFactory {
    /// # Errors
    /// An invalid policy, or master key/salt lengths that do not match
    /// either policy.
    pub fn new(
        sender: bool,
        master: MasterSecret,
        rtp_policy: SrtpPolicy,
        rtcp_policy: SrtpPolicy,
        provider: Arc<CipherProvider>,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, ContextError> {
        rtp_policy.validate()?;
        rtcp_policy.validate()?;
        check_master(&master, &rtp_policy)?;
        check_master(&master, &rtcp_policy)?;

        Ok(Self {
            sender,
            master: Mutex::new(Some(master)),
            rtp_policy,
            rtcp_policy,
            provider,
            logger,
        })
    }

    /// Factory with the RTP and RTCP policies of a named profile.
    ///
    /// # Errors
    /// See [`SrtpContextFactory::new`].
    pub fn from_profile(
        sender: bool,
        profile: SrtpProfile,
        master: MasterSecret,
        provider: Arc<CipherProvider>,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, ContextError> {
        Self::new(
            sender,
            master,
            profile.rtp_policy(),
            profile.rtcp_policy(),
            provider,
            logger,
        )
    }

    #[must_use]
    pub fn is_sender(&self) -> bool {
        self.sender
    }

    #[must_use]
    pub fn rtp_policy(&self) -> &SrtpPolicy {
        &self.rtp_policy
    }

    #[must_use]
    pub fn rtcp_policy(&self) -> &SrtpPolicy {
        &self.rtcp_policy
    }

    /// Snapshot of the master secret, taken under the lock so a concurrent
    /// `close` cannot interleave with a derivation.
    fn master(&self) -> Result<MasterSecret, ContextError> {
        let guard = self.master.lock()?;
        guard.clone().ok_or(ContextError::Closed)
    }

    /// New RTP context for `ssrc` starting at rollover counter `roc`.
    ///
    /// # Errors
    /// [`ContextError::Closed`] after [`close`](Self::close), or a key
    /// derivation failure.
    pub fn derive_context(&self, ssrc: u32, roc: u32) -> Result<SrtpCryptoContext, ContextError> {
        let master = self.master()?;
        SrtpCryptoContext::new(
            self.sender,
            ssrc,
            roc,
            &master,
            &self.rtp_policy,
            &self.provider,
            Arc::clone(&self.logger),
        )
    }

    /// New RTCP context for `ssrc`.
    ///
    /// # Errors
    /// Same as [`derive_context`](Self::derive_context).
    pub fn derive_control_context(&self, ssrc: u32) -> Result<SrtcpCryptoContext, ContextError> {
        let master = self.master()?;
        SrtcpCryptoContext::new(
            ssrc,
            &master,
            &self.rtcp_policy,
            &self.provider,
            Arc::clone(&self.logger),
        )
    }

    /// Wipes the master key and salt. Later derivations fail with
    /// [`ContextError::Closed`]; closing twice is harmless.
    ///
    /// # Errors
    /// [`ContextError::MutexPoisoned`] if a deriving thread panicked.
    pub fn close(&self) -> Result<(), ContextError> {
        let mut guard = self.master.lock()?;
        if let Some(mut master) = guard.take() {
            master.zeroize();
            sink_debug!(
                self.logger,
                "[SRTP] Closed {} context factory",
                if self.sender { "send" } else { "receive" }
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.master.lock().map_or(true, |m| m.is_none())
    }
}
