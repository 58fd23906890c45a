#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use rustysrtp::crypto::{CipherBackend, CipherProvider};
use rustysrtp::log::{LogSink, NoopLogSink};
use rustysrtp::srtp::{
    AuthType, EncryptionType, MasterSecret, SrtcpCryptoContext, SrtpCryptoContext, SrtpPolicy,
};

pub const SSRC: u32 = 0x1122_3344;

pub fn logger() -> Arc<dyn LogSink> {
    Arc::new(NoopLogSink)
}

pub fn provider(backend: CipherBackend) -> Arc<CipherProvider> {
    Arc::new(CipherProvider::with_backend(backend, &logger()).expect("backend available"))
}

pub fn master(policy: &SrtpPolicy) -> MasterSecret {
    let key = (0..policy.master_key_len()).map(|i| i as u8 ^ 0x3C).collect();
    let salt = (0..policy.salt_key_len()).map(|i| 0xF0 - i as u8).collect();
    MasterSecret::new(key, salt)
}

/// Every supported encryption with HMAC-SHA1 at 80 bits, plus the NULL/NULL corner.
pub fn policies() -> Vec<SrtpPolicy> {
    let mut out = Vec::new();
    for enc in [
        EncryptionType::Null,
        EncryptionType::AesCm,
        EncryptionType::AesF8,
        EncryptionType::TwofishCm,
        EncryptionType::TwofishF8,
    ] {
        let key_len = if enc == EncryptionType::Null { 0 } else { 16 };
        out.push(SrtpPolicy::new(enc, key_len, AuthType::HmacSha1, 20, 10, 14));
        out.push(SrtpPolicy::new(enc, key_len, AuthType::Null, 0, 0, 14));
    }
    out.push(SrtpPolicy::new(EncryptionType::AesCm, 32, AuthType::HmacSha1, 20, 4, 14));
    out
}

pub fn rtp_pair(
    policy: &SrtpPolicy,
    provider: &CipherProvider,
) -> (SrtpCryptoContext, SrtpCryptoContext) {
    let master = master(policy);
    let tx = SrtpCryptoContext::new(true, SSRC, 0, &master, policy, provider, logger()).unwrap();
    let rx = SrtpCryptoContext::new(false, SSRC, 0, &master, policy, provider, logger()).unwrap();
    (tx, rx)
}

pub fn rtcp_pair(
    policy: &SrtpPolicy,
    provider: &CipherProvider,
) -> (SrtcpCryptoContext, SrtcpCryptoContext) {
    let master = master(policy);
    let tx = SrtcpCryptoContext::new(SSRC, &master, policy, provider, logger()).unwrap();
    let rx = SrtcpCryptoContext::new(SSRC, &master, policy, provider, logger()).unwrap();
    (tx, rx)
}

/// RTP packet: 12-byte header with `ssrc` and `seq`, then `payload_len` bytes.
pub fn rtp_packet(ssrc: u32, seq: u16, payload_len: usize) -> Vec<u8> {
    let mut pkt = vec![0x80, 0x6F];
    pkt.extend_from_slice(&seq.to_be_bytes());
    pkt.extend_from_slice(&0x0001_E240u32.to_be_bytes());
    pkt.extend_from_slice(&ssrc.to_be_bytes());
    pkt.extend((0..payload_len).map(|i| (i * 31 + 7) as u8));
    pkt
}

/// RTCP receiver report with the given sender SSRC and `body_len` extra bytes.
pub fn rtcp_packet(ssrc: u32, body_len: usize) -> Vec<u8> {
    let mut pkt = vec![0x81, 201, 0x00, 0x07];
    pkt.extend_from_slice(&ssrc.to_be_bytes());
    pkt.extend((0..body_len).map(|i| (i * 13 + 1) as u8));
    pkt
}
