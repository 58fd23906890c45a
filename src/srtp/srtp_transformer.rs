use std::sync::Arc;

use crate::log::log_sink::LogSink;
use crate::sink_debug;
use crate::srtp::constants::RTP_HEADER_LEN;
use crate::srtp::context_cache::ContextCache;
use crate::srtp::context_error::ContextError;
use crate::srtp::packet_buffer::PacketBuffer;
use crate::srtp::srtp_context_factory::SrtpContextFactory;
use crate::srtp::srtp_crypto_context::SrtpCryptoContext;
use crate::srtp::srtp_error::{SrtpError, SrtpResult};
use crate::srtp::transform_error::TransformError;
use crate::srtp::utils::rtp_ssrc;

/// Routes RTP packets to the context of their SSRC, creating contexts on
/// first accepted packet. Outbound packets use the forward (sending) factory, inbound
/// ones the reverse (receiving) factory.
pub struct SrtpTransformer {
    forward: ContextCache<SrtpCryptoContext>,
    reverse: ContextCache<SrtpCryptoContext>,
    #[cfg_attr(not(feature = "log-debug"), allow(dead_code))]
    logger: Arc<dyn LogSink>,
}

fn packet_ssrc(data: &[u8]) -> Result<u32, TransformError> {
    if data.len() < RTP_HEADER_LEN {
        return Err(SrtpError::InvalidPacket.into());
    }
    Ok(rtp_ssrc(data))
}

impl SrtpTransformer {
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
        cache: &ContextCache<SrtpCryptoContext>,
        ssrc: u32,
        op: F,
    ) -> Result<(), TransformError>
    where
        F: FnOnce(&mut SrtpCryptoContext) -> SrtpResult,
    {
        let added = cache.process(ssrc, |factory, ssrc| factory.derive_context(ssrc, 0), op)?;
        if added {
            sink_debug!(self.logger, "[SRTP] Derived context for SSRC {:#010x}", ssrc);
        }
        Ok(())
    }

    /// Protects an outbound RTP packet in place.
    ///
    /// # Errors
    /// The packet status from the context, or a context derivation failure.
    pub fn transform<P: PacketBuffer + ?Sized>(&self, pkt: &mut P) -> Result<(), TransformError> {
        let ssrc = packet_ssrc(pkt.data())?;
        self.process(&self.forward, ssrc, |ctx| ctx.transform_packet(pkt))
    }

    /// Unprotects an inbound SRTP packet in place. A context for an unknown
    /// SSRC is kept only once a packet for it authenticates.
    ///
    /// # Errors
    /// The packet status from the context, or a context derivation failure.
    pub fn reverse_transform<P: PacketBuffer + ?Sized>(
        &self,
        pkt: &mut P,
        skip_decryption: bool,
    ) -> Result<(), TransformError> {
        let ssrc = packet_ssrc(pkt.data())?;
        self.process(&self.reverse, ssrc, |ctx| {
            ctx.reverse_transform_packet(pkt, skip_decryption)
        })
    }

    /// Drops both contexts of a stream that has ended. A later packet for
    /// `ssrc` derives fresh ones.
    ///
    /// # Errors
    /// [`ContextError::MutexPoisoned`].
    pub fn close_ssrc(&self, ssrc: u32) -> Result<(), ContextError> {
        let out = self.forward.remove(ssrc)?;
        let inb = self.reverse.remove(ssrc)?;
        if out || inb {
            sink_debug!(self.logger, "[SRTP] Closed contexts for SSRC {:#010x}", ssrc);
        }
        Ok(())
    }

    /// Swaps in new factories (e.g. after a rekey). Cached contexts and the
    /// old factories are closed.
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
        sink_debug!(self.logger, "[SRTP] Replaced context factories");
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
