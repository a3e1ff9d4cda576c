//! The **probe invoker**: sends echo requests to a single IPv4 destination and
//! matches the replies.
//!
//! The pinger is transport agnostic. It drives any [`EchoTransport`], which lets
//! the send/receive schedule be exercised without raw sockets.
//!
//! A run ends on the first of:
//! * `count` unique replies received,
//! * the overall `timeout` deadline,
//! * the `running` flag being cleared (Ctrl-C).

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use pingiv_common::config::Config;
use pingiv_common::network::stats::{EchoReply, ProbeEvent, ProbeStatistics};
use pingiv_common::warn;
use tracing::{debug, trace};

use crate::network::icmp::{self, EchoRequest, RawReply};
use crate::network::transport::{EchoTransport, IcmpTransport};

/// Upper bound for a single receive wait, so the `running` flag stays responsive.
const MAX_POLL: Duration = Duration::from_millis(100);
const MIN_POLL: Duration = Duration::from_millis(1);

pub struct Pinger<T: EchoTransport> {
    transport: T,
    destination: Ipv4Addr,
    identifier: u16,
    count: u16,
    timeout: Duration,
    interval: Duration,
    ttl: u8,
    payload: Vec<u8>,
}

impl<T: EchoTransport> Pinger<T> {
    pub fn new(transport: T, destination: Ipv4Addr, cfg: &Config) -> Self {
        Self {
            transport,
            destination,
            identifier: rand::random(),
            count: cfg.count,
            timeout: cfg.timeout,
            interval: cfg.interval,
            ttl: cfg.ttl,
            payload: icmp::make_payload(cfg.payload_size),
        }
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn may_send(&self, sent: usize) -> bool {
        self.count == 0 || sent < self.count as usize
    }

    fn is_complete(&self, received: usize) -> bool {
        self.count != 0 && received >= self.count as usize
    }

    /// Runs the probe until it completes, times out or is cancelled.
    ///
    /// `on_event` is called for every matched reply, in arrival order.
    pub fn run<F>(
        &mut self,
        mut on_event: F,
        running: &AtomicBool,
    ) -> anyhow::Result<ProbeStatistics>
    where
        F: FnMut(&ProbeEvent),
    {
        let start: Instant = Instant::now();
        let deadline: Instant = start + self.timeout;
        let mut next_send: Instant = start;
        let mut seq: u16 = 0;
        let mut stats = ProbeStatistics::default();
        let mut in_flight: HashMap<u16, Instant> = HashMap::new();
        let mut answered: HashSet<u16> = HashSet::new();

        debug!(
            "probing {} with identifier {:#06x}, {} bytes of payload",
            self.destination,
            self.identifier,
            self.payload.len()
        );

        while running.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                debug!("deadline of {:?} reached", self.timeout);
                break;
            }
            if self.is_complete(stats.packets_recv) {
                break;
            }

            if self.may_send(stats.packets_sent) && now >= next_send {
                let sent_at = Instant::now();
                self.send(seq);
                in_flight.insert(seq, sent_at);
                answered.remove(&seq);
                stats.record_sent();
                seq = seq.wrapping_add(1);
                next_send += self.interval;
            }

            let wake_at = if self.may_send(stats.packets_sent) {
                next_send.min(deadline)
            } else {
                deadline
            };
            let wait = wake_at
                .saturating_duration_since(Instant::now())
                .clamp(MIN_POLL, MAX_POLL);

            let Some(raw) = self.transport.recv_echo(wait)? else {
                continue;
            };
            if !self.is_ours(&raw) {
                trace!("ignoring echo reply from {} id={:#06x}", raw.source, raw.identifier);
                continue;
            }
            let Some(sent_at) = in_flight.get(&raw.seq) else {
                trace!("ignoring reply for unsent icmp_seq={}", raw.seq);
                continue;
            };

            let reply = EchoReply {
                seq: raw.seq,
                bytes: raw.bytes,
                ttl: raw.ttl,
                rtt: raw.received_at.saturating_duration_since(*sent_at),
            };

            if answered.insert(raw.seq) {
                stats.record_reply(reply.rtt);
                on_event(&ProbeEvent::Reply(reply));
            } else {
                stats.record_duplicate();
                on_event(&ProbeEvent::Duplicate(reply));
            }
        }

        debug!("probe finished after {:.2}s", start.elapsed().as_secs_f64());
        Ok(stats)
    }

    /// A failed send still counts as transmitted, it simply never gets an answer.
    fn send(&mut self, seq: u16) {
        let request = EchoRequest {
            destination: self.destination,
            identifier: self.identifier,
            seq,
            ttl: self.ttl,
            payload: &self.payload,
        };
        if let Err(e) = self.transport.send_echo(&request) {
            warn!("{:#}", e);
        }
    }

    fn is_ours(&self, raw: &RawReply) -> bool {
        raw.identifier == self.identifier && raw.source == IpAddr::V4(self.destination)
    }
}

/// Pings `destination` over a raw ICMP socket.
pub fn ping<F>(
    destination: Ipv4Addr,
    cfg: &Config,
    on_event: F,
    running: &AtomicBool,
) -> anyhow::Result<ProbeStatistics>
where
    F: FnMut(&ProbeEvent),
{
    let transport = IcmpTransport::open()?;
    Pinger::new(transport, destination, cfg).run(on_event, running)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
