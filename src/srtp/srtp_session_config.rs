use std::sync::Arc;

use crate::config::SrtpSettings;
use crate::crypto::CipherProvider;
use crate::log::log_sink::LogSink;
use crate::srtp::context_error::ContextError;
use crate::srtp::master_secret::MasterSecret;
use crate::srtp::srtcp_transformer::SrtcpTransformer;
use crate::srtp::srtp_context_factory::SrtpContextFactory;
use crate::srtp::srtp_profile::SrtpProfile;
use crate::srtp::srtp_transformer::SrtpTransformer;

/// Which side of the key exchange this endpoint played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Client,
    Server,
}

/// Negotiated profile plus the master secret of each direction.
#[derive(Debug, Clone)]
pub struct SrtpSessionConfig {
    pub profile: SrtpProfile,
    pub outbound: MasterSecret,
    pub inbound: MasterSecret,
}

impl SrtpSessionConfig {
    /// Splits exported keying material laid out as
    /// `client_key || server_key || client_salt || server_salt` (RFC 5764
    /// §4.2). Returns `None` if `key_mat` is too short for the profile.
    #[must_use]
    pub fn from_keying_material(
        profile: SrtpProfile,
        key_mat: &[u8],
        role: EndpointRole,
    ) -> Option<Self> {
        let key_len = profile.master_key_len();
        let salt_len = profile.master_salt_len();
        if key_mat.len() < 2 * (key_len + salt_len) {
            return None;
        }

        let (client_key, rest) = key_mat.split_at(key_len);
        let (server_key, rest) = rest.split_at(key_len);
        let (client_salt, rest) = rest.split_at(salt_len);
        let (server_salt, _) = rest.split_at(salt_len);

        let client = MasterSecret::new(client_key.to_vec(), client_salt.to_vec());
        let server = MasterSecret::new(server_key.to_vec(), server_salt.to_vec());

        let (outbound, inbound) = match role {
            EndpointRole::Client => (client, server),
            EndpointRole::Server => (server, client),
        };
        Some(Self {
            profile,
            outbound,
            inbound,
        })
    }

    fn factories(
        &self,
        settings: &SrtpSettings,
        provider: &Arc<CipherProvider>,
        logger: &Arc<dyn LogSink>,
    ) -> Result<(Arc<SrtpContextFactory>, Arc<SrtpContextFactory>), ContextError> {
        let mut rtp_policy = self.profile.rtp_policy();
        let mut rtcp_policy = self.profile.rtcp_policy();
        settings.apply_to(&mut rtp_policy);
        settings.apply_to(&mut rtcp_policy);

        let forward = SrtpContextFactory::new(
            true,
            self.outbound.clone(),
            rtp_policy.clone(),
            rtcp_policy.clone(),
            Arc::clone(provider),
            Arc::clone(logger),
        )?;
        let reverse = SrtpContextFactory::new(
            false,
            self.inbound.clone(),
            rtp_policy,
            rtcp_policy,
            Arc::clone(provider),
            Arc::clone(logger),
        )?;
        Ok((Arc::new(forward), Arc::new(reverse)))
    }

    /// RTP and RTCP transformers for this session. Each gets its own pair of
    /// factories so closing one leaves the other usable.
    ///
    /// # Errors
    /// Master key or salt lengths that do not fit the profile.
    pub fn build_transformers(
        &self,
        settings: &SrtpSettings,
        provider: &Arc<CipherProvider>,
        logger: &Arc<dyn LogSink>,
    ) -> Result<(SrtpTransformer, SrtcpTransformer), ContextError> {
        let (rtp_fwd, rtp_rev) = self.factories(settings, provider, logger)?;
        let (rtcp_fwd, rtcp_rev) = self.factories(settings, provider, logger)?;
        Ok((
            SrtpTransformer::new(rtp_fwd, rtp_rev, Arc::clone(logger)),
            SrtcpTransformer::new(rtcp_fwd, rtcp_rev, Arc::clone(logger)),
        ))
    }
}
