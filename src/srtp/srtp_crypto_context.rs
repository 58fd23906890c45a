use std::sync::Arc;

use crate::crypto::CipherProvider;
use crate::log::log_sink::LogSink;
use crate::srtp::constants::{RTP_WINDOW_LOG_INTERVAL, SEQ_NUM_HALF};
use crate::srtp::context_error::ContextError;
use crate::srtp::crypto_context_core::CryptoContextCore;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::packet_buffer::PacketBuffer;
use crate::srtp::session_keys::RTP_LABELS;
use crate::srtp::srtp_error::{SrtpError, SrtpResult};
use crate::srtp::srtp_policy::SrtpPolicy;
#[cfg(feature = "log-debug")]
use crate::srtp::utils::format_replay_window;
use crate::srtp::utils::{
    compute_iv, rtp_f8_iv, rtp_header_len, rtp_sequence_number, rtp_ssrc, validate_rtp_length,
};
use crate::{sink_debug, sink_error, sink_trace, sink_warn};

const INDEX_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// SRTP state for one SSRC in one direction.
///
/// The 48-bit packet index is `ROC << 16 | SEQ`. Only the sequence number
/// travels on the wire, so the receiver guesses the ROC of every packet from
/// its highest accepted sequence number `s_l` (RFC 3711 §3.3.1) and commits
/// the guess once the packet authenticates.
pub struct SrtpCryptoContext {
    core: CryptoContextCore,
    sender: bool,
    roc: u32,
    s_l: u16,
    seq_num_set: bool,
    guessed_roc: i64,
}

impl SrtpCryptoContext {
    /// Derives the RTP session keys and starts at rollover counter `roc`.
    ///
    /// # Errors
    /// Invalid policy, or key material the ciphers reject.
    pub fn new(
        sender: bool,
        ssrc: u32,
        roc: u32,
        master: &MasterSecret,
        policy: &SrtpPolicy,
        provider: &CipherProvider,
        logger: Arc<dyn LogSink>,
    ) -> Result<Self, ContextError> {
        let core = CryptoContextCore::new(ssrc, master, policy, provider, RTP_LABELS, logger)?;
        sink_debug!(
            core.logger,
            "[SRTP] New {} context: SSRC={:#010x} ROC={} enc={:?} auth={:?} tag={}",
            if sender { "send" } else { "receive" },
            ssrc,
            roc,
            policy.enc_type(),
            policy.auth_type(),
            policy.auth_tag_len()
        );
        Ok(Self {
            core,
            sender,
            roc,
            s_l: 0,
            seq_num_set: false,
            guessed_roc: i64::from(roc),
        })
    }

    #[must_use]
    pub fn ssrc(&self) -> u32 {
        self.core.ssrc
    }

    #[must_use]
    pub fn is_sender(&self) -> bool {
        self.sender
    }

    #[must_use]
    pub fn roc(&self) -> u32 {
        self.roc
    }

    /// Overrides the rollover counter, for key management that signals it
    /// out of band.
    pub fn set_roc(&mut self, roc: u32) {
        self.roc = roc;
    }

    #[must_use]
    pub fn policy(&self) -> &SrtpPolicy {
        &self.core.policy
    }

    /// Encrypts and authenticates an outbound RTP packet in place, appending
    /// the tag.
    ///
    /// # Errors
    /// [`SrtpError::InvalidPacket`] for a truncated header or a closed
    /// context; a replay status if the send-side self check trips.
    pub fn transform_packet<P: PacketBuffer + ?Sized>(&mut self, pkt: &mut P) -> SrtpResult {
        if self.core.is_closed() {
            return Err(SrtpError::InvalidPacket);
        }
        let header_len = rtp_header_len(pkt.data())?;
        let seq = rtp_sequence_number(pkt.data());

        if !self.seq_num_set {
            self.seq_num_set = true;
            self.s_l = seq;
        }
        let guessed_index = self.guess_index(seq);

        if self.core.policy.is_send_replay_enabled() {
            self.check_replay(seq, guessed_index)?;
        }

        self.process_payload(pkt, header_len, seq)?;

        let tag_len = self.core.policy.auth_tag_len();
        if let Some(tag) = self.core.compute_tag(pkt.data(), self.guessed_roc as u32) {
            pkt.grow(tag_len);
            pkt.append(&tag[..tag_len]);
        }

        self.update(seq, guessed_index);

        sink_trace!(
            self.core.logger,
            "[SRTP] Protected: SSRC={:#010x} Seq={} ROC={} Len={}",
            self.core.ssrc,
            seq,
            self.roc,
            pkt.len()
        );
        Ok(())
    }

    /// Verifies, replay-checks and (unless `skip_decryption`) decrypts an
    /// inbound SRTP packet in place, removing the tag.
    ///
    /// State only moves when the packet is accepted. A rejected packet is
    /// left byte-for-byte as it was.
    ///
    /// # Errors
    /// [`SrtpError::InvalidPacket`], [`SrtpError::ReplayOld`],
    /// [`SrtpError::ReplayFail`] or [`SrtpError::AuthFail`].
    pub fn reverse_transform_packet<P: PacketBuffer + ?Sized>(
        &mut self,
        pkt: &mut P,
        skip_decryption: bool,
    ) -> SrtpResult {
        if self.core.is_closed() {
            return Err(SrtpError::InvalidPacket);
        }
        let tag_len = self.core.policy.auth_tag_len();
        if !validate_rtp_length(pkt.data(), tag_len) {
            return Err(SrtpError::InvalidPacket);
        }
        let seq = rtp_sequence_number(pkt.data());
        if seq % RTP_WINDOW_LOG_INTERVAL == 0 {
            sink_debug!(
                self.core.logger,
                "[SRTP] Reverse transform: SSRC={:#010x} Seq={} s_l={} seq_num_set={} ROC={} guessed ROC={}",
                self.core.ssrc,
                seq,
                self.s_l,
                self.seq_num_set,
                self.roc,
                self.guessed_roc
            );
        }

        let seq_num_just_set = !self.seq_num_set;
        if seq_num_just_set {
            self.seq_num_set = true;
            self.s_l = seq;
        }
        let guessed_index = self.guess_index(seq);

        let res = self.accept(pkt, seq, guessed_index, tag_len, skip_decryption);
        if res.is_err() && seq_num_just_set {
            // An untrusted first packet must not seed s_l.
            self.seq_num_set = false;
            self.s_l = 0;
        }
        res
    }

    fn accept<P: PacketBuffer + ?Sized>(
        &mut self,
        pkt: &mut P,
        seq: u16,
        guessed_index: i64,
        tag_len: usize,
        skip_decryption: bool,
    ) -> SrtpResult {
        if self.core.policy.is_receive_replay_enabled() {
            self.check_replay(seq, guessed_index)?;
        }

        let header_len = rtp_header_len(pkt.data())?;
        let auth_len = pkt.len() - tag_len;
        let (authenticated, tag) = pkt.data().split_at(auth_len);
        if !self
            .core
            .verify_tag(authenticated, self.guessed_roc as u32, tag)
        {
            sink_warn!(
                self.core.logger,
                "[SRTP] Auth failed: SSRC={:#010x} Seq={} guessed ROC={}",
                self.core.ssrc,
                seq,
                self.guessed_roc
            );
            return Err(SrtpError::AuthFail);
        }
        pkt.shrink(tag_len);

        if !skip_decryption {
            self.process_payload(pkt, header_len, seq)?;
        }
        self.update(seq, guessed_index);
        Ok(())
    }

    fn local_index(&self) -> i64 {
        (i64::from(self.roc) << 16) | i64::from(self.s_l)
    }

    /// RFC 3711 Appendix A. Records the guess in `guessed_roc` and returns the
    /// guessed index, negative when the guess is ROC - 1 at ROC zero.
    fn guess_index(&mut self, seq: u16) -> i64 {
        let roc = i64::from(self.roc);
        let s_l = i64::from(self.s_l);
        let seq = i64::from(seq);

        self.guessed_roc = if s_l < SEQ_NUM_HALF {
            if seq - s_l > SEQ_NUM_HALF { roc - 1 } else { roc }
        } else if s_l - SEQ_NUM_HALF > seq {
            roc + 1
        } else {
            roc
        };
        (self.guessed_roc << 16) | seq
    }

    fn check_replay(&self, seq: u16, guessed_index: i64) -> SrtpResult {
        let delta = guessed_index - self.local_index();
        let res = self.core.replay_window.check(delta);
        if let Err(e) = res {
            if self.sender {
                sink_error!(
                    self.core.logger,
                    "[SRTP] Discarding outbound packet: SSRC={:#010x} Seq={} {} (ROC={} s_l={} guessed ROC={})",
                    self.core.ssrc,
                    seq,
                    e,
                    self.roc,
                    self.s_l,
                    self.guessed_roc
                );
            } else {
                sink_debug!(
                    self.core.logger,
                    "[SRTP] {}: SSRC={:#010x} Seq={}",
                    e,
                    self.core.ssrc,
                    seq
                );
            }
        }
        res
    }

    fn process_payload<P: PacketBuffer + ?Sized>(
        &mut self,
        pkt: &mut P,
        header_len: usize,
        seq: u16,
    ) -> SrtpResult {
        if !self.core.encrypts() {
            return Ok(());
        }
        let data = pkt.data();
        let iv = if self.core.uses_f8() {
            rtp_f8_iv(data, self.guessed_roc as u32)
        } else {
            let index = (((self.guessed_roc as u64) << 16) | u64::from(seq)) & INDEX_MASK;
            compute_iv(self.core.salt(), rtp_ssrc(data), index)
        };
        self.core.apply_keystream(pkt.data_mut(), header_len, &iv)
    }

    /// Slides the replay window and advances `s_l`/ROC for an accepted packet.
    fn update(&mut self, seq: u16, guessed_index: i64) {
        let delta = guessed_index - self.local_index();
        self.core.replay_window.update(delta);

        let roc = i64::from(self.roc);
        if self.guessed_roc == roc {
            if seq > self.s_l {
                self.s_l = seq;
            }
        } else if self.guessed_roc == roc + 1 {
            self.s_l = seq;
            self.roc = self.roc.wrapping_add(1);
        }

        if seq % RTP_WINDOW_LOG_INTERVAL == 0 {
            sink_debug!(
                self.core.logger,
                "[SRTP] Updated replay window with index {}: {}",
                guessed_index,
                format_replay_window(self.local_index(), self.core.replay_window.bits())
            );
        }
    }

    /// Wipes the session keys. The context rejects every packet afterwards.
    pub fn close(&mut self) {
        self.core.close();
        sink_debug!(
            self.core.logger,
            "[SRTP] Closed context for SSRC {:#010x}",
            self.core.ssrc
        );
    }
}
