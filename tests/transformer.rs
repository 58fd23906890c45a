#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use bytes::BytesMut;
use common::*;
use rustysrtp::config::SrtpSettings;
use rustysrtp::crypto::CipherBackend;
use rustysrtp::srtp::{
    ContextError, EndpointRole, KdfLabel, MasterSecret, RawPacket, SrtpContextFactory,
    SrtcpTransformer, SrtpError, SrtpKdf, SrtpProfile, SrtpSessionConfig, SrtpTransformer,
    TransformError,
};

fn factories(
    profile: SrtpProfile,
    master: &MasterSecret,
) -> (Arc<SrtpContextFactory>, Arc<SrtpContextFactory>) {
    let provider = provider(CipherBackend::RustCrypto);
    let fwd = SrtpContextFactory::from_profile(
        true,
        profile,
        master.clone(),
        Arc::clone(&provider),
        logger(),
    )
    .unwrap();
    let rev =
        SrtpContextFactory::from_profile(false, profile, master.clone(), provider, logger())
            .unwrap();
    (Arc::new(fwd), Arc::new(rev))
}

fn loopback(profile: SrtpProfile, master: &MasterSecret) -> SrtpTransformer {
    let (fwd, rev) = factories(profile, master);
    SrtpTransformer::new(fwd, rev, logger())
}

#[test]
fn contexts_are_cached_per_ssrc() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);

    for (round, ssrc) in [1u32, 2, 1, 3, 2].into_iter().enumerate() {
        for k in 0..3u16 {
            let seq = round as u16 * 3 + k;
            let plain = rtp_packet(ssrc, seq, 50);
            let mut pkt = plain.clone();
            transformer.transform(&mut pkt).unwrap();
            transformer.reverse_transform(&mut pkt, false).unwrap();
            assert_eq!(pkt, plain);
        }
    }
    assert_eq!(transformer.context_count(), (3, 3));
}

#[test]
fn repeated_sequence_numbers_on_one_ssrc_are_replays() {
    let profile = SrtpProfile::Aes128CmHmacSha1_32;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);

    transformer.transform(&mut rtp_packet(9, 1, 10)).unwrap();
    assert_eq!(
        transformer.transform(&mut rtp_packet(9, 1, 10)),
        Err(TransformError::Packet(SrtpError::ReplayFail))
    );
}

#[test]
fn closed_factory_refuses_new_contexts() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let (fwd, rev) = factories(profile, &master);

    fwd.derive_context(SSRC, 0).unwrap();
    fwd.close().unwrap();
    fwd.close().unwrap();
    assert!(fwd.is_closed());
    assert_eq!(fwd.derive_context(SSRC, 0).err(), Some(ContextError::Closed));
    assert_eq!(fwd.derive_control_context(SSRC).err(), Some(ContextError::Closed));
    assert!(!rev.is_closed());

    let transformer = SrtpTransformer::new(fwd, rev, logger());
    assert_eq!(
        transformer.transform(&mut rtp_packet(SSRC, 1, 10)),
        Err(TransformError::Context(ContextError::Closed))
    );
}

#[test]
fn factory_rejects_mismatched_master() {
    let provider = provider(CipherBackend::RustCrypto);
    let short_salt = MasterSecret::new(vec![0; 16], vec![0; 12]);
    let res = SrtpContextFactory::from_profile(
        true,
        SrtpProfile::Aes128CmHmacSha1_80,
        short_salt,
        provider,
        logger(),
    );
    assert!(matches!(res, Err(ContextError::MasterSaltLength { .. })));
}

#[test]
fn set_factories_rekeys_every_stream() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let old = MasterSecret::generate(&profile.rtp_policy());
    let new = MasterSecret::generate(&profile.rtp_policy());
    let sender = loopback(profile, &old);
    let receiver = loopback(profile, &new);

    let mut pkt = rtp_packet(SSRC, 5, 20);
    sender.transform(&mut pkt).unwrap();
    assert_eq!(
        receiver.reverse_transform(&mut pkt, false),
        Err(TransformError::Packet(SrtpError::AuthFail))
    );

    let (fwd, rev) = factories(profile, &new);
    sender.set_factories(fwd, rev).unwrap();
    assert_eq!(sender.context_count(), (0, 0));

    let mut pkt = rtp_packet(SSRC, 6, 20);
    sender.transform(&mut pkt).unwrap();
    receiver.reverse_transform(&mut pkt, false).unwrap();
    assert_eq!(pkt, rtp_packet(SSRC, 6, 20));
}

#[test]
fn skip_decryption_strips_tag_only() {
    let profile = SrtpProfile::Aes256CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);

    let plain = rtp_packet(SSRC, 11, 40);
    let mut pkt = plain.clone();
    transformer.transform(&mut pkt).unwrap();
    let encrypted_body = pkt[..pkt.len() - 10].to_vec();

    transformer.reverse_transform(&mut pkt, true).unwrap();
    assert_eq!(pkt, encrypted_body);
    assert_ne!(pkt, plain);
}

#[test]
fn session_config_pairs_client_and_server() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let key_mat: Vec<u8> = (0u8..60).map(|b| b.wrapping_mul(97)).collect();
    let client = SrtpSessionConfig::from_keying_material(profile, &key_mat, EndpointRole::Client)
        .unwrap();
    let server = SrtpSessionConfig::from_keying_material(profile, &key_mat, EndpointRole::Server)
        .unwrap();

    let settings = SrtpSettings::default();
    let provider = provider(CipherBackend::OpenSsl);
    let (client_rtp, client_rtcp) = client
        .build_transformers(&settings, &provider, &logger())
        .unwrap();
    let (server_rtp, server_rtcp) = server
        .build_transformers(&settings, &provider, &logger())
        .unwrap();

    let mut rtp = rtp_packet(SSRC, 100, 160);
    client_rtp.transform(&mut rtp).unwrap();
    assert_eq!(rtp.len(), 182);
    server_rtp.reverse_transform(&mut rtp, false).unwrap();
    assert_eq!(rtp, rtp_packet(SSRC, 100, 160));

    let mut rtcp = rtcp_packet(0x0BAD_CAFE, 20);
    server_rtcp.transform(&mut rtcp).unwrap();
    client_rtcp.reverse_transform(&mut rtcp).unwrap();
    assert_eq!(rtcp, rtcp_packet(0x0BAD_CAFE, 20));

    // A packet protected for the other direction does not authenticate.
    let mut echo = rtp_packet(SSRC, 101, 10);
    client_rtp.transform(&mut echo).unwrap();
    assert_eq!(
        client_rtp.reverse_transform(&mut echo, false),
        Err(TransformError::Packet(SrtpError::AuthFail))
    );

    client_rtp.close().unwrap();
    assert_eq!(
        client_rtp.transform(&mut rtp_packet(SSRC, 102, 10)),
        Err(TransformError::Context(ContextError::Closed))
    );
    client_rtcp.transform(&mut rtcp_packet(SSRC, 4)).unwrap();
}

#[test]
fn works_with_bytes_mut_and_raw_packets() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);

    let plain = rtp_packet(SSRC, 1, 64);
    let mut bytes = BytesMut::from(&plain[..]);
    transformer.transform(&mut bytes).unwrap();
    assert_eq!(bytes.len(), plain.len() + 10);
    transformer.reverse_transform(&mut bytes, false).unwrap();
    assert_eq!(&bytes[..], &plain[..]);

    let mut buffer = vec![0xEE; 8];
    buffer.extend_from_slice(&rtp_packet(SSRC, 2, 64));
    let mut raw = RawPacket::new(buffer, 8, plain.len()).unwrap();
    transformer.transform(&mut raw).unwrap();
    transformer.reverse_transform(&mut raw, false).unwrap();
    assert_eq!(raw.offset(), 8);
    let inner = raw.into_inner();
    assert_eq!(&inner[..8], &[0xEE; 8]);
    assert_eq!(&inner[8..8 + plain.len()], &rtp_packet(SSRC, 2, 64)[..]);
}

#[test]
fn kdf_is_deterministic_across_instances() {
    let policy = SrtpProfile::Aes128CmHmacSha1_80.rtp_policy();
    let master = MasterSecret::generate(&policy);
    let derive = |backend: CipherBackend| {
        let provider = provider(backend);
        let mut kdf = SrtpKdf::new(&master, &policy, &provider).unwrap();
        let mut key = [0u8; 14];
        kdf.derive_session_key(&mut key, KdfLabel::RtcpSalt).unwrap();
        kdf.close();
        key
    };
    assert_eq!(derive(CipherBackend::OpenSsl), derive(CipherBackend::RustCrypto));
}

#[test]
fn unauthenticated_ssrcs_leave_no_context_behind() {
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);
    let (fwd, rev) = factories(profile, &master);
    let control = SrtcpTransformer::new(fwd, rev, logger());

    for ssrc in 0..2000u32 {
        let mut forged = rtp_packet(ssrc, 1, 20);
        forged.extend_from_slice(&[0u8; 10]);
        assert_eq!(
            transformer.reverse_transform(&mut forged, false),
            Err(TransformError::Packet(SrtpError::AuthFail))
        );

        let mut forged = rtcp_packet(ssrc, 20);
        forged.extend_from_slice(&[0x80, 0, 0, 1]);
        forged.extend_from_slice(&[0u8; 10]);
        assert_eq!(
            control.reverse_transform(&mut forged),
            Err(TransformError::Packet(SrtpError::AuthFail))
        );
    }
    assert_eq!(transformer.context_count(), (0, 0));
    assert_eq!(control.context_count(), (0, 0));

    // The first genuine packet of a stream is still accepted.
    let mut pkt = rtp_packet(SSRC, 1, 20);
    transformer.transform(&mut pkt).unwrap();
    transformer.reverse_transform(&mut pkt, false).unwrap();
    assert_eq!(pkt, rtp_packet(SSRC, 1, 20));
    assert_eq!(transformer.context_count(), (1, 1));

    let mut pkt = rtcp_packet(SSRC, 20);
    control.transform(&mut pkt).unwrap();
    control.reverse_transform(&mut pkt).unwrap();
    assert_eq!(pkt, rtcp_packet(SSRC, 20));
    assert_eq!(control.context_count(), (1, 1));
}

#[test]
fn close_ssrc_forgets_only_that_stream() {
    let profile = SrtpProfile::Aes128CmHmacSha1_32;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = loopback(profile, &master);
    let (fwd, rev) = factories(profile, &master);
    let control = SrtcpTransformer::new(fwd, rev, logger());

    for ssrc in [SSRC, 7] {
        let mut pkt = rtp_packet(ssrc, 1, 16);
        transformer.transform(&mut pkt).unwrap();
        transformer.reverse_transform(&mut pkt, false).unwrap();
        let mut pkt = rtcp_packet(ssrc, 8);
        control.transform(&mut pkt).unwrap();
        control.reverse_transform(&mut pkt).unwrap();
    }
    assert_eq!(transformer.context_count(), (2, 2));

    transformer.close_ssrc(SSRC).unwrap();
    control.close_ssrc(SSRC).unwrap();
    transformer.close_ssrc(SSRC).unwrap();
    assert_eq!(transformer.context_count(), (1, 1));
    assert_eq!(control.context_count(), (1, 1));

    // A fresh context starts over, so sequence 1 is not a replay.
    let mut pkt = rtp_packet(SSRC, 1, 16);
    transformer.transform(&mut pkt).unwrap();
    transformer.reverse_transform(&mut pkt, false).unwrap();
    assert_eq!(pkt, rtp_packet(SSRC, 1, 16));

    // The other stream kept its replay state.
    assert_eq!(
        transformer.transform(&mut rtp_packet(7, 1, 16)),
        Err(TransformError::Packet(SrtpError::ReplayFail))
    );
}

#[test]
fn threads_share_one_transformer() {
    const THREADS: u32 = 8;
    const PACKETS: u16 = 500;
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = Arc::new(loopback(profile, &master));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let transformer = Arc::clone(&transformer);
            thread::spawn(move || {
                let ssrc = 0x1000 + t;
                for seq in 0..PACKETS {
                    let plain = rtp_packet(ssrc, seq, 32 + usize::from(seq % 7));
                    let mut pkt = plain.clone();
                    transformer.transform(&mut pkt).unwrap();
                    transformer.reverse_transform(&mut pkt, false).unwrap();
                    assert_eq!(pkt, plain);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(transformer.context_count(), (THREADS as usize, THREADS as usize));
}

#[test]
fn two_threads_on_one_ssrc() {
    const ROUNDS: u16 = 250;
    let profile = SrtpProfile::Aes128CmHmacSha1_80;
    let master = MasterSecret::generate(&profile.rtp_policy());
    let transformer = Arc::new(loopback(profile, &master));
    // Lockstep keeps the two sequence streams within the replay window.
    let barrier = Arc::new(Barrier::new(2));

    let workers: Vec<_> = (0..2u16)
        .map(|t| {
            let transformer = Arc::clone(&transformer);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    barrier.wait();
                    let plain = rtp_packet(SSRC, round * 2 + t, 24);
                    let mut pkt = plain.clone();
                    transformer.transform(&mut pkt).unwrap();
                    transformer.reverse_transform(&mut pkt, false).unwrap();
                    assert_eq!(pkt, plain);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(transformer.context_count(), (1, 1));
    assert_eq!(
        transformer.transform(&mut rtp_packet(SSRC, ROUNDS * 2 - 1, 24)),
        Err(TransformError::Packet(SrtpError::ReplayFail))
    );
}
