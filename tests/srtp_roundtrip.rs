#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use proptest::prelude::*;
use rustysrtp::crypto::CipherBackend;
use rustysrtp::srtp::{
    AuthType, EncryptionType, SrtpCryptoContext, SrtpError, SrtpPolicy, SrtpProfile,
};

#[test]
fn every_policy_round_trips_on_every_backend() {
    for backend in CipherBackend::ALL {
        let provider = provider(backend);
        for policy in policies() {
            let (mut tx, mut rx) = rtp_pair(&policy, &provider);
            for seq in [0u16, 1, 2, 500] {
                let plain = rtp_packet(SSRC, seq, 160);
                let mut pkt = plain.clone();
                tx.transform_packet(&mut pkt).unwrap();
                assert_eq!(pkt.len(), plain.len() + policy.auth_tag_len());
                assert_eq!(pkt[..12], plain[..12], "header stays in clear");
                if policy.enc_type() != EncryptionType::Null {
                    assert_ne!(pkt[12..172], plain[12..], "{policy:?}");
                }

                rx.reverse_transform_packet(&mut pkt, false).unwrap();
                assert_eq!(pkt, plain, "{backend:?} {policy:?}");
            }
        }
    }
}

#[test]
fn backends_produce_identical_wire_bytes() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let (mut a, _) = rtp_pair(&policy, &provider(CipherBackend::OpenSsl));
    let (mut b, _) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));

    let mut pa = rtp_packet(SSRC, 42, 300);
    let mut pb = pa.clone();
    a.transform_packet(&mut pa).unwrap();
    b.transform_packet(&mut pb).unwrap();
    assert_eq!(pa, pb);
}

#[test]
fn aes_cm_80_adds_ten_bytes() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
    let plain = rtp_packet(SSRC, 0, 160);
    assert_eq!(plain.len(), 172);

    let mut pkt = plain.clone();
    tx.transform_packet(&mut pkt).unwrap();
    assert_eq!(pkt.len(), 182);
    rx.reverse_transform_packet(&mut pkt, false).unwrap();
    assert_eq!(pkt, plain);
}

#[test]
fn replayed_packet_is_rejected() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
    let mut pkt = rtp_packet(SSRC, 10, 40);
    tx.transform_packet(&mut pkt).unwrap();
    let wire = pkt.clone();

    rx.reverse_transform_packet(&mut pkt, false).unwrap();
    let mut again = wire.clone();
    assert_eq!(
        rx.reverse_transform_packet(&mut again, false),
        Err(SrtpError::ReplayFail)
    );
    assert_eq!(again, wire);
}

#[test]
fn replay_window_edges() {
    let mut policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    policy.set_send_replay_enabled(false);
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));

    let protect = |tx: &mut SrtpCryptoContext, seq: u16| {
        let mut pkt = rtp_packet(SSRC, seq, 20);
        tx.transform_packet(&mut pkt).unwrap();
        pkt
    };
    let early = protect(&mut tx, 100);
    let edge = protect(&mut tx, 101);
    let newest = protect(&mut tx, 164);

    rx.reverse_transform_packet(&mut newest.clone(), false).unwrap();
    assert_eq!(
        rx.reverse_transform_packet(&mut early.clone(), false),
        Err(SrtpError::ReplayOld),
        "64 behind falls off the window"
    );
    rx.reverse_transform_packet(&mut edge.clone(), false).unwrap();
    assert_eq!(
        rx.reverse_transform_packet(&mut edge.clone(), false),
        Err(SrtpError::ReplayFail)
    );
}

#[test]
fn out_of_order_packets_inside_window_are_accepted() {
    let policy = SrtpProfile::Aes128CmHmacSha1_32.rtp_policy();
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
    let wire: Vec<Vec<u8>> = (1u16..=5)
        .map(|seq| {
            let mut pkt = rtp_packet(SSRC, seq, 12);
            tx.transform_packet(&mut pkt).unwrap();
            pkt
        })
        .collect();

    for i in [0usize, 4, 2, 1, 3] {
        let mut pkt = wire[i].clone();
        rx.reverse_transform_packet(&mut pkt, false).unwrap();
        assert_eq!(pkt, rtp_packet(SSRC, i as u16 + 1, 12));
    }
}

#[test]
fn sequence_wrap_increments_roc_on_both_sides() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::OpenSsl));

    for seq in [65_533u16, 65_534, 65_535, 0, 1] {
        let plain = rtp_packet(SSRC, seq, 64);
        let mut pkt = plain.clone();
        tx.transform_packet(&mut pkt).unwrap();
        rx.reverse_transform_packet(&mut pkt, false).unwrap();
        assert_eq!(pkt, plain, "seq {seq}");
    }
    assert_eq!(tx.roc(), 1);
    assert_eq!(rx.roc(), 1);
}

#[test]
fn late_packet_from_previous_roc_still_decrypts() {
    let mut policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    policy.set_send_replay_enabled(false);
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));

    let mut wire = Vec::new();
    for seq in [65_530u16, 65_535, 3] {
        let mut pkt = rtp_packet(SSRC, seq, 32);
        tx.transform_packet(&mut pkt).unwrap();
        wire.push(pkt);
    }

    rx.reverse_transform_packet(&mut wire[0].clone(), false).unwrap();
    rx.reverse_transform_packet(&mut wire[2].clone(), false).unwrap();
    assert_eq!(rx.roc(), 1);

    let mut late = wire[1].clone();
    rx.reverse_transform_packet(&mut late, false).unwrap();
    assert_eq!(late, rtp_packet(SSRC, 65_535, 32));
    assert_eq!(rx.roc(), 1);
}

#[test]
fn null_auth_skips_tag() {
    let policy = SrtpPolicy::new(EncryptionType::AesCm, 16, AuthType::Null, 0, 0, 14);
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
    let plain = rtp_packet(SSRC, 3, 30);
    let mut pkt = plain.clone();
    tx.transform_packet(&mut pkt).unwrap();
    assert_eq!(pkt.len(), plain.len());
    rx.reverse_transform_packet(&mut pkt, false).unwrap();
    assert_eq!(pkt, plain);
}

#[test]
fn truncated_packets_are_invalid() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
    assert_eq!(
        tx.transform_packet(&mut vec![0x80u8; 11]),
        Err(SrtpError::InvalidPacket)
    );
    assert_eq!(
        rx.reverse_transform_packet(&mut rtp_packet(SSRC, 1, 0), false),
        Err(SrtpError::InvalidPacket)
    );
}

proptest! {
    #[test]
    fn any_single_bit_flip_fails_auth(
        payload_len in 0usize..200,
        bit in any::<prop::sample::Index>(),
    ) {
        let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
        let (mut tx, mut rx) = rtp_pair(&policy, &provider(CipherBackend::RustCrypto));
        let mut pkt = rtp_packet(SSRC, 77, payload_len);
        tx.transform_packet(&mut pkt).unwrap();

        let bit = bit.index(pkt.len() * 8);
        pkt[bit / 8] ^= 1 << (bit % 8);
        let tampered = pkt.clone();
        let res = rx.reverse_transform_packet(&mut pkt, false);
        if bit < 8 {
            // CC and X bits change the header length, which may no longer fit.
            prop_assert!(res == Err(SrtpError::AuthFail) || res == Err(SrtpError::InvalidPacket));
        } else {
            prop_assert_eq!(res, Err(SrtpError::AuthFail));
        }
        prop_assert_eq!(pkt, tampered);
    }
}
