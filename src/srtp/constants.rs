// Key derivation labels, RFC 3711 §4.3.2
pub const SRTP_LABEL_ENCRYPTION: u8 = 0x00;
pub const SRTP_LABEL_AUTH: u8 = 0x01;
pub const SRTP_LABEL_SALT: u8 = 0x02;
pub const SRTCP_LABEL_ENCRYPTION: u8 = 0x03;
pub const SRTCP_LABEL_AUTH: u8 = 0x04;
pub const SRTCP_LABEL_SALT: u8 = 0x05;

// The KDF IV holds at most 14 bytes of salt.
pub const MAX_SALT_LEN: usize = 14;

// AES_CM_128_HMAC_SHA1 constants
pub const SESSION_KEY_LEN: usize = 16; // 128 bits
pub const SESSION_AUTH_LEN: usize = 20; // 160 bits (SHA1)
pub const SESSION_SALT_LEN: usize = 14; // 112 bits
pub const AUTH_TAG_LEN_80: usize = 10;
pub const AUTH_TAG_LEN_32: usize = 4;

pub const RTP_HEADER_LEN: usize = 12;
pub const RTCP_HEADER_LEN: usize = 8;

// SRTCP trailer word: E flag in the top bit, 31-bit index below.
pub const SRTCP_INDEX_LEN: usize = 4;
pub const SRTCP_E_FLAG: u32 = 0x8000_0000;
pub const SRTCP_INDEX_MASK: u32 = 0x7FFF_FFFF;

// Replay protection window size (64 packets)
pub const REPLAY_WINDOW_SIZE: u64 = 64;

// Half of the 16-bit sequence space; ROC guessing pivots on it.
pub const SEQ_NUM_HALF: i64 = 0x8000;

// Replay window dumps at debug level.
pub const RTP_WINDOW_LOG_INTERVAL: u16 = 5000;
pub const RTCP_WINDOW_LOG_INTERVAL: u32 = 500;
