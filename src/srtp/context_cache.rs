use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::srtp::context_error::ContextError;
use crate::srtp::srtcp_crypto_context::SrtcpCryptoContext;
use crate::srtp::srtp_context_factory::SrtpContextFactory;
use crate::srtp::srtp_crypto_context::SrtpCryptoContext;
use crate::srtp::srtp_error::SrtpResult;
use crate::srtp::transform_error::TransformError;

/// Anything a transformer caches per SSRC.
pub(crate) trait CachedContext: Send {
    fn close(&mut self);
}

impl CachedContext for SrtpCryptoContext {
    fn close(&mut self) {
        SrtpCryptoContext::close(self);
    }
}

impl CachedContext for SrtcpCryptoContext {
    fn close(&mut self) {
        SrtcpCryptoContext::close(self);
    }
}

struct CacheState<C> {
    factory: Arc<SrtpContextFactory>,
    contexts: HashMap<u32, Arc<Mutex<C>>>,
}

/// One direction's factory plus the contexts derived from it, keyed by SSRC.
///
/// Known streams hold the map lock only for the lookup; their packet work
/// happens under the per-context lock, so distinct SSRCs proceed in parallel.
pub(crate) struct ContextCache<C> {
    state: Mutex<CacheState<C>>,
}

impl<C: CachedContext> ContextCache<C> {
    pub(crate) fn new(factory: Arc<SrtpContextFactory>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                factory,
                contexts: HashMap::new(),
            }),
        }
    }

    /// Runs `op` on the context for `ssrc`.
    ///
    /// A stream seen for the first time gets a freshly derived context that
    /// is kept only if `op` accepts the packet, so rejected packets never
    /// leave an entry behind. Returns true when a context was added.
    pub(crate) fn process<F, O>(&self, ssrc: u32, derive: F, op: O) -> Result<bool, TransformError>
    where
        F: FnOnce(&SrtpContextFactory, u32) -> Result<C, ContextError>,
        O: FnOnce(&mut C) -> SrtpResult,
    {
        let mut state = self.state.lock().map_err(ContextError::from)?;
        if let Some(ctx) = state.contexts.get(&ssrc) {
            let ctx = Arc::clone(ctx);
            drop(state);
            let mut ctx = ctx.lock().map_err(ContextError::from)?;
            op(&mut *ctx)?;
            return Ok(false);
        }

        // The map stays locked so two first packets of one stream cannot
        // both install a context.
        let mut candidate = derive(state.factory.as_ref(), ssrc)?;
        if let Err(e) = op(&mut candidate) {
            candidate.close();
            return Err(e.into());
        }
        state.contexts.insert(ssrc, Arc::new(Mutex::new(candidate)));
        Ok(true)
    }

    /// Closes and forgets the context for `ssrc`. Returns false if there was
    /// none.
    pub(crate) fn remove(&self, ssrc: u32) -> Result<bool, ContextError> {
        let removed = self.state.lock()?.contexts.remove(&ssrc);
        match removed {
            Some(ctx) => {
                ctx.lock()?.close();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Installs `factory`, closing and forgetting every cached context.
    /// Returns the factory it replaced.
    pub(crate) fn replace_factory(
        &self,
        factory: Arc<SrtpContextFactory>,
    ) -> Result<Arc<SrtpContextFactory>, ContextError> {
        let mut state = self.state.lock()?;
        close_all(&mut state.contexts)?;
        Ok(std::mem::replace(&mut state.factory, factory))
    }

    /// Closes the cached contexts and the factory.
    pub(crate) fn close(&self) -> Result<(), ContextError> {
        let mut state = self.state.lock()?;
        close_all(&mut state.contexts)?;
        state.factory.close()
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().map_or(0, |s| s.contexts.len())
    }
}

fn close_all<C: CachedContext>(
    contexts: &mut HashMap<u32, Arc<Mutex<C>>>,
) -> Result<(), ContextError> {
    for (_, ctx) in contexts.drain() {
        ctx.lock()?.close();
    }
    Ok(())
}
