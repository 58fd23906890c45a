//! RustySRTP implements the Secure Real-time Transport Protocol (RFC 3711).
//!
//! Per-stream, per-direction cryptographic contexts turn plaintext RTP/RTCP
//! packets into authenticated, optionally encrypted SRTP/SRTCP packets and
//! back. Master key material is consumed as already negotiated; key exchange
//! is left to the caller.
//!
//! The crate is structured into several modules:
//! - `crypto`: block ciphers, Counter Mode, F8 Mode, HMAC-SHA1 and backend selection.
//! - `srtp`: policies, key derivation, RTP/RTCP crypto contexts and the SSRC-keyed transformers.
//! - `config` and `log`: the configuration loader and leveled logging sinks.

/// Handles configuration loading and management.
pub mod config;
/// Cipher primitives and the process-wide cipher backend selection.
pub mod crypto;
/// Logging utilities for the library.
pub mod log;
/// SRTP (Secure Real-time Transport Protocol) implementation.
pub mod srtp;
