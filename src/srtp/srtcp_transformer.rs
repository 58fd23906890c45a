use std::sync::Arc;

use crate::log::log_sink::LogSink;
use crate::sink_debug;
use crate::srtp::constants::RTCP_HEADER_LEN;
use crate::srtp::context_cache::ContextCache;
use crate::srtp::context_error::ContextError;
use crate::srtp::packet_buffer::PacketBuffer;
use crate::srtp::srtp_context_factory::SrtpContextFactory;
use crate::srtp::srtcp_crypto_context::SrtcpCryptoContext;
use crate::srtp::srtp_error::{SrtpError, SrtpResult};
use crate::srtp::transform_error::TransformError;
use crate::srtp::utils::rtcp_sender_ssrc;

/// RTCP counterpart of [`SrtpTransformer`](crate::srtp::SrtpTransformer),
/// keyed by the sender SSRC of the first report in the compound packet.
pub struct SrtcpTransformer {
    forward: ContextCache<SrtcpCryptoContext>,
    reverse: ContextCache<SrtcpCryptoContext>,
    #[cfg_attr(not(feature = "log-debug"), allow(dead_code))]
    logger: Arc<dyn LogSink>,
}

fn packet_ssrc(data: &[u8]) -> Result<u32, TransformError> {
    if data.len() < RTCP_HEADER_LEN {
        return Err(SrtpError::InvalidPacket.into());
    }
    Ok(rtcp_sender_ssrc(data))
}

impl SrtcpTransformer {
    pub fn new(
        forward: Arc<SrtpContextFactory>,
        reverse: Arc<SrtpContextFactory>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            forward: ContextCache::new(forward),
            reverse: ContextCache::new(reverse),
            logger,
        }
    }

    fn process<F>(
        &self,
        cache: &ContextCache<SrtcpCryptoContext>,
        ssrc: u32,
        op: F,
    ) -> Result<(), TransformError>
    where
        F: FnOnce(&mut SrtcpCryptoContext) -> SrtpResult,
    {
        let added =
            cache.process(ssrc, |factory, ssrc| factory.derive_control_context(ssrc), op)?;
        if added {
            sink_debug!(self.logger, "[SRTCP] Derived context for SSRC {:#010x}", ssrc);
        }
        Ok(())
    }

    /// Protects an outbound RTCP packet in place.
    ///
    /// # Errors
    /// The packet status from the context, or a context derivation failure.
    pub fn transform<P: PacketBuffer + ?Sized>(&self, pkt: &mut P) -> Result<(), TransformError> {
        let ssrc = packet_ssrc(pkt.data())?;
        self.process(&self.forward, ssrc, |ctx| ctx.transform_packet(pkt))
    }

    /// Unprotects an inbound SRTCP packet in place. Unknown senders are
    /// remembered only after a packet from them authenticates.
    ///
    /// # Errors
    /// The packet status from the context, or a context derivation failure.
    pub fn reverse_transform<P: PacketBuffer + ?Sized>(
        &self,
        pkt: &mut P,
    ) -> Result<(), TransformError> {
        let ssrc = packet_ssrc(pkt.data())?;
        self.process(&self.reverse, ssrc, |ctx| ctx.reverse_transform_packet(pkt))
    }

    /// Drops both contexts of `ssrc`, e.g. after an RTCP BYE.
    ///
    /// # Errors
    /// [`ContextError::MutexPoisoned`].
    pub fn close_ssrc(&self, ssrc: u32) -> Result<(), ContextError> {
        let out = self.forward.remove(ssrc)?;
        let inb = self.reverse.remove(ssrc)?;
        if out || inb {
            sink_debug!(self.logger, "[SRTCP] Closed contexts for SSRC {:#010x}", ssrc);
        }
        Ok(())
    }

    /// Swaps in new factories. Cached contexts and the old factories are
    /// closed.
    ///
    /// # Errors
    /// [`ContextError::MutexPoisoned`].
    pub fn set_factories(
        &self,
        forward: Arc<SrtpContextFactory>,
        reverse: Arc<SrtpContextFactory>,
    ) -> Result<(), ContextError> {
        self.forward.replace_factory(forward)?.close()?;
        self.reverse.replace_factory(reverse)?.close()?;
        sink_debug!(self.logger, "[SRTCP] Replaced context factories");
        Ok(())
    }

    /// Number of cached (outbound, inbound) contexts.
    #[must_use]
    pub fn context_count(&self) -> (usize, usize) {
        (self.forward.len(), self.reverse.len())
    }

    /// Closes every cached context and both factories.
    ///
    /// # Errors
    /// [`ContextError::MutexPoisoned`].
    pub fn close(&self) -> Result<(), ContextError> {
        self.forward.close()?;
        self.reverse.close()
    }
}
