use std::sync::Arc;

use crate::crypto::CipherProvider;
use crate::log::log_sink::LogSink;
use crate::srtp::constants::{
    RTCP_HEADER_LEN, RTCP_WINDOW_LOG_INTERVAL, SRTCP_E_FLAG, SRTCP_INDEX_LEN, SRTCP_INDEX_MASK,
};
use crate::srtp::context_error::ContextError;
use crate::srtp::crypto_context_core::CryptoContextCore;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::packet_buffer::PacketBuffer;
use crate::srtp::session_keys::RTCP_LABELS;
use crate::srtp::srtp_error::{SrtpError, SrtpResult};
use crate::srtp::srtp_policy::SrtpPolicy;
#[cfg(feature = "log-debug")]
use crate::srtp::utils::format_replay_window;
use crate::srtp::utils::{
    compute_iv, rtcp_f8_iv, rtcp_sender_ssrc, srtcp_index_word, validate_rtcp_length,
};
use crate::{sink_debug, sink_trace, sink_warn};

/// SRTCP state for one SSRC in one direction.
///
/// The 31-bit index travels in the trailer word `E || index`, so no guessing
/// is needed: the sender counts up, the receiver keeps the highest accepted
/// index and a replay window behind it.
pub struct SrtcpCryptoContext {
    core: CryptoContextCore,
    received_index: u32,
    sent_index: u32,
}

impl SrtcpCryptoContext {
    /// Derives the RTCP session keys.
    ///
    /// # Errors
    /// Invalid policy, or key material the ciphers reject.
    pub fn new(
        ssrc: u32,
        master: &MasterSecret,
        policy: &SrtpPolicy,
        provider: &CipherProvider,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, ContextError> {
        let core = CryptoContextCore::new(ssrc, master, policy, provider, RTCP_LABELS, logger)?;
        sink_debug!(
            core.logger,
            "[SRTCP] New context: SSRC={:#010x} enc={:?} auth={:?} tag={}",
            ssrc,
            policy.enc_type(),
            policy.auth_type(),
            policy.auth_tag_len()
        );
        Ok(Self {
            core,
            received_index: 0,
            sent_index: 0,
        })
    }

    #[must_use]
    pub fn ssrc(&self) -> u32 {
        self.core.ssrc
    }

    /// Index the next outbound packet will carry.
    #[must_use]
    pub fn sent_index(&self) -> u32 {
        self.sent_index
    }

    #[must_use]
    pub fn policy(&self) -> &SrtpPolicy {
        &self.core.policy
    }

    /// Encrypts (per policy) and authenticates an outbound RTCP compound
    /// packet, appending `E || index` and the tag.
    ///
    /// # Errors
    /// [`SrtpError::InvalidPacket`] for a packet shorter than the RTCP header
    /// or a closed context.
    pub fn transform_packet<P: PacketBuffer + ?Sized>(&mut self, pkt: &mut P) -> SrtpResult {
        if self.core.is_closed() || pkt.len() < RTCP_HEADER_LEN {
            return Err(SrtpError::InvalidPacket);
        }
        let encrypt = self.core.encrypts();
        if encrypt {
            self.process_payload(pkt, self.sent_index)?;
        }
        let index_word = if encrypt {
            self.sent_index | SRTCP_E_FLAG
        } else {
            self.sent_index
        };

        let tag_len = self.core.policy.auth_tag_len();
        pkt.grow(SRTCP_INDEX_LEN + tag_len);
        let tag = self.core.compute_tag(pkt.data(), index_word);
        pkt.append(&index_word.to_be_bytes());
        if let Some(tag) = tag {
            pkt.append(&tag[..tag_len]);
        }

        sink_trace!(
            self.core.logger,
            "[SRTCP] Protected: SSRC={:#010x} index={} Len={}",
            self.core.ssrc,
            self.sent_index,
            pkt.len()
        );
        self.sent_index = self.sent_index.wrapping_add(1) & SRTCP_INDEX_MASK;
        Ok(())
    }

    /// Verifies, replay-checks and decrypts an inbound SRTCP packet in place,
    /// removing the index word and the tag. Rejected packets are not modified.
    ///
    /// # Errors
    /// [`SrtpError::InvalidPacket`], [`SrtpError::ReplayOld`],
    /// [`SrtpError::ReplayFail`] or [`SrtpError::AuthFail`].
    pub fn reverse_transform_packet<P: PacketBuffer + ?Sized>(
        &mut self,
        pkt: &mut P,
    ) -> SrtpResult {
        if self.core.is_closed() {
            return Err(SrtpError::InvalidPacket);
        }
        let tag_len = self.core.policy.auth_tag_len();
        if !validate_rtcp_length(pkt.data(), tag_len) {
            return Err(SrtpError::InvalidPacket);
        }

        let index_word = srtcp_index_word(pkt.data(), tag_len);
        let decrypt = index_word & SRTCP_E_FLAG != 0;
        let index = index_word & SRTCP_INDEX_MASK;

        if self.core.policy.is_receive_replay_enabled() {
            let delta = i64::from(index) - i64::from(self.received_index);
            if let Err(e) = self.core.replay_window.check(delta) {
                sink_debug!(
                    self.core.logger,
                    "[SRTCP] {}: SSRC={:#010x} index={}",
                    e,
                    self.core.ssrc,
                    index
                );
                return Err(e);
            }
        }

        let auth_len = pkt.len() - tag_len;
        let (authenticated, tag) = pkt.data().split_at(auth_len);
        // The MAC input is the packet followed by the index word, which is
        // exactly what precedes the tag.
        let body = &authenticated[..auth_len - SRTCP_INDEX_LEN];
        if !self.core.verify_tag(body, index_word, tag) {
            sink_warn!(
                self.core.logger,
                "[SRTCP] Auth failed: SSRC={:#010x} index={}",
                self.core.ssrc,
                index
            );
            return Err(SrtpError::AuthFail);
        }
        pkt.shrink(tag_len + SRTCP_INDEX_LEN);

        if decrypt {
            self.process_payload(pkt, index)?;
        }
        self.update(index);
        Ok(())
    }

    fn process_payload<P: PacketBuffer + ?Sized>(&mut self, pkt: &mut P, index: u32) -> SrtpResult {
        if !self.core.encrypts() {
            return Ok(());
        }
        let data = pkt.data();
        let iv = if self.core.uses_f8() {
            rtcp_f8_iv(data, index)
        } else {
            compute_iv(self.core.salt(), rtcp_sender_ssrc(data), u64::from(index))
        };
        self.core
            .apply_keystream(pkt.data_mut(), RTCP_HEADER_LEN, &iv)
    }

    fn update(&mut self, index: u32) {
        let delta = i64::from(index) - i64::from(self.received_index);
        self.core.replay_window.update(delta);
        if delta > 0 {
            self.received_index = index;
        }

        if index % RTCP_WINDOW_LOG_INTERVAL == 0 {
            sink_debug!(
                self.core.logger,
                "[SRTCP] Updated replay window with index {}: {}",
                index,
                format_replay_window(
                    i64::from(self.received_index),
                    self.core.replay_window.bits()
                )
            );
        }
    }

    /// Wipes the session keys. The context rejects every packet afterwards.
    pub fn close(&mut self) {
        self.core.close();
        sink_debug!(
            self.core.logger,
            "[SRTCP] Closed context for SSRC {:#010x}",
            self.core.ssrc
        );
    }
}
