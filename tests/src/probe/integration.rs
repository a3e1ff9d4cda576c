#![cfg(test)]
use pingiv_common::config::Config;
use pingiv_common::network::stats::{ProbeEvent, ProbeStatistics};
use pingiv_common::network::target::RomanTarget;
use pingiv_core::pinger::{self, Pinger};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::utils::FakeHost;

fn fast_config(count: u16) -> Config {
    Config {
        count,
        timeout: Duration::from_secs(2),
        interval: Duration::from_millis(5),
        ..Config::default()
    }
}

fn ping_fake(
    target: &RomanTarget,
    host: FakeHost,
    cfg: &Config,
) -> (ProbeStatistics, Vec<ProbeEvent>, FakeHost) {
    let running = AtomicBool::new(true);
    let mut events = Vec::new();
    let mut pinger = Pinger::new(host, target.canonical.into(), cfg);
    let stats = pinger
        .run(|event| events.push(event.clone()), &running)
        .expect("ping run failed");
    (stats, events, pinger.into_transport())
}

/// Every spelling of the loopback address reaches the same host.
#[test]
fn loopback_spellings_reach_loopback() {
    for spelling in ["CXXVII.N.N.I", "CXXVII...I", "CXXVII.nulla.nulla.I", "cxxvii.n.n.i"] {
        let target = RomanTarget::from_str(spelling).unwrap();
        let host = FakeHost::new(Ipv4Addr::LOCALHOST);
        let (stats, events, host) = ping_fake(&target, host, &fast_config(2));

        assert_eq!(stats.packets_recv, 2, "{spelling} was not answered");
        assert_eq!(events.len(), 2);
        assert!(host.requests.iter().all(|(dst, _)| *dst == Ipv4Addr::LOCALHOST));
    }
}

#[test]
fn replies_carry_host_details() {
    let target = RomanTarget::from_str("VIII.VIII.VIII.VIII").unwrap();
    let mut host = FakeHost::new(Ipv4Addr::new(8, 8, 8, 8));
    host.ttl = 117;
    host.delay = Duration::from_millis(10);

    let (stats, events, _) = ping_fake(&target, host, &fast_config(3));

    assert_eq!(stats.packets_sent, 3);
    assert_eq!(stats.packet_loss(), 0.0);
    assert!(stats.min_rtt() >= Duration::from_millis(10));
    for event in events {
        let ProbeEvent::Reply(reply) = event else {
            panic!("unexpected duplicate");
        };
        assert_eq!(reply.ttl, 117);
        assert_eq!(reply.bytes, 64);
    }
}

/// A shortened address is padded, so it goes to a different host than the full one.
#[test]
fn padded_address_misses_full_address_host() {
    let target = RomanTarget::from_str("CXCII.CLXVIII").unwrap();
    assert_eq!(target.canonical.to_string(), "192.168.0.0");

    let host = FakeHost::new(Ipv4Addr::new(192, 168, 1, 1));
    let cfg = Config {
        timeout: Duration::from_millis(100),
        ..fast_config(2)
    };
    let (stats, events, host) = ping_fake(&target, host, &cfg);

    assert_eq!(stats.packets_sent, 2);
    assert_eq!(stats.packets_recv, 0);
    assert!(events.is_empty());
    assert_eq!(host.requests[0].0, Ipv4Addr::new(192, 168, 0, 0));
}

#[test]
fn invalid_addresses_are_rejected_before_sending() {
    let bad_inputs = [
        "",
        "   ",
        "CXXVII.N.N.I ",
        "\tCXXVII.N.N.I",
        "I.I.I.I.I",
        "CXXVII.MMM",
        "CXXVII.0.0.I",
        "localhost",
    ];
    for bad in bad_inputs {
        assert!(RomanTarget::from_str(bad).is_err(), "{bad:?} was accepted");
    }
}

/// Needs raw socket privileges.
#[test]
#[ignore]
fn raw_socket_ping_to_loopback() {
    let target = RomanTarget::from_str("CXXVII...I").unwrap();
    let running = AtomicBool::new(true);
    let stats = pinger::ping(target.canonical.into(), &fast_config(2), |_| {}, &running)
        .expect("ping failed");
    assert_eq!(stats.packets_recv, 2);
}
