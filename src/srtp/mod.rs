pub mod constants;
mod context_cache;
pub mod context_error;
mod crypto_context_core;
pub mod master_secret;
pub mod packet_buffer;
mod replay_window;
mod session_keys;
pub mod srtcp_crypto_context;
pub mod srtcp_transformer;
pub mod srtp_context_factory;
pub mod srtp_crypto_context;
pub mod srtp_error;
pub mod srtp_kdf;
pub mod srtp_policy;
pub mod srtp_profile;
pub mod srtp_session_config;
pub mod srtp_transformer;
pub mod transform_error;
mod utils;

pub use context_error::ContextError;
pub use master_secret::MasterSecret;
pub use packet_buffer::{PacketBuffer, RawPacket};
pub use srtcp_crypto_context::SrtcpCryptoContext;
pub use srtcp_transformer::SrtcpTransformer;
pub use srtp_context_factory::SrtpContextFactory;
pub use srtp_crypto_context::SrtpCryptoContext;
pub use srtp_error::{SrtpError, SrtpResult};
pub use srtp_kdf::{KdfLabel, SrtpKdf};
pub use srtp_policy::{AuthType, EncryptionType, SrtpPolicy};
pub use srtp_profile::SrtpProfile;
pub use srtp_session_config::{EndpointRole, SrtpSessionConfig};
pub use srtp_transformer::SrtpTransformer;
pub use transform_error::TransformError;
