use std::fmt::Write as _;

use byteorder::{BigEndian, ByteOrder};

use crate::crypto::BLOCK_SIZE;
use crate::srtp::constants::{
    REPLAY_WINDOW_SIZE, RTCP_HEADER_LEN, RTP_HEADER_LEN, SRTCP_E_FLAG, SRTCP_INDEX_LEN,
};
use crate::srtp::srtp_error::SrtpError;

/// Caller must have checked `packet.len() >= RTP_HEADER_LEN`.
pub(crate) fn rtp_sequence_number(packet: &[u8]) -> u16 {
    BigEndian::read_u16(&packet[2..4])
}

/// Caller must have checked `packet.len() >= RTP_HEADER_LEN`.
pub(crate) fn rtp_ssrc(packet: &[u8]) -> u32 {
    BigEndian::read_u32(&packet[8..12])
}

/// Fixed header, CSRC list and header extension, in bytes.
pub(crate) fn rtp_header_len(packet: &[u8]) -> Result<usize, SrtpError> {
    if packet.len() < RTP_HEADER_LEN {
        return Err(SrtpError::InvalidPacket);
    }
    let v_p_x_cc = packet[0];
    let cc = usize::from(v_p_x_cc & 0x0F);
    let x = (v_p_x_cc & 0x10) != 0;

    let mut len = RTP_HEADER_LEN + cc * 4;

    if x {
        if packet.len() < len + 4 {
            return Err(SrtpError::InvalidPacket);
        }
        let ext_words = usize::from(BigEndian::read_u16(&packet[len + 2..len + 4]));
        len += 4 + ext_words * 4;
    }

    if packet.len() < len {
        return Err(SrtpError::InvalidPacket);
    }
    Ok(len)
}

/// An SRTP packet must hold its whole header plus the tag.
pub(crate) fn validate_rtp_length(packet: &[u8], tag_len: usize) -> bool {
    rtp_header_len(packet).is_ok_and(|header| packet.len() >= header + tag_len)
}

/// Caller must have checked `packet.len() >= RTCP_HEADER_LEN`.
pub(crate) fn rtcp_sender_ssrc(packet: &[u8]) -> u32 {
    BigEndian::read_u32(&packet[4..8])
}

/// An SRTCP packet must hold the RTCP header, the index word and the tag.
pub(crate) fn validate_rtcp_length(packet: &[u8], tag_len: usize) -> bool {
    packet.len() >= RTCP_HEADER_LEN + SRTCP_INDEX_LEN + tag_len
}

/// The E-flag/index word that precedes the tag. Requires a length-checked packet.
pub(crate) fn srtcp_index_word(packet: &[u8], tag_len: usize) -> u32 {
    let at = packet.len() - tag_len - SRTCP_INDEX_LEN;
    BigEndian::read_u32(&packet[at..at + SRTCP_INDEX_LEN])
}

/// Counter Mode IV: salt XOR (SSRC at bytes 4..8, 48-bit index at 8..14),
/// last two bytes zero for the block counter.
pub(crate) fn compute_iv(session_salt: &[u8], ssrc: u32, index: u64) -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    let n = session_salt.len().min(14);
    iv[..n].copy_from_slice(&session_salt[..n]);

    for (b, s) in iv[4..8].iter_mut().zip(ssrc.to_be_bytes()) {
        *b ^= s;
    }
    let idx_full = index.to_be_bytes();
    for (b, i) in iv[8..14].iter_mut().zip(&idx_full[2..]) {
        *b ^= i;
    }
    iv
}

/// F8 IV for RTP: zero byte, header bytes 1..12, then the ROC.
pub(crate) fn rtp_f8_iv(packet: &[u8], roc: u32) -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    iv[1..12].copy_from_slice(&packet[1..RTP_HEADER_LEN]);
    BigEndian::write_u32(&mut iv[12..], roc);
    iv
}

/// F8 IV for RTCP: four zero bytes, E flag with the index, then the first
/// eight header bytes.
pub(crate) fn rtcp_f8_iv(packet: &[u8], index: u32) -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    BigEndian::write_u32(&mut iv[4..8], index | SRTCP_E_FLAG);
    iv[8..].copy_from_slice(&packet[..RTCP_HEADER_LEN]);
    iv
}

/// Lists which indices the window marks as seen, newest first.
#[cfg_attr(not(feature = "log-debug"), allow(dead_code))]
pub(crate) fn format_replay_window(local_index: i64, bits: u64) -> String {
    let mut out = format!("local index {local_index}, window {bits:#018x}, seen [");
    let mut first = true;
    for i in 0..REPLAY_WINDOW_SIZE {
        if (bits >> i) & 1 == 1 {
            if !first {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", local_index - i as i64);
            first = false;
        }
    }
    out.push(']');
    out
}
