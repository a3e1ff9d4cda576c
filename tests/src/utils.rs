use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use pingiv_core::network::icmp::{EchoRequest, RawReply, ICMP_ECHO_HDR_LEN};
use pingiv_core::network::transport::EchoTransport;

/// Plays the part of a remote host: every request to `alive` is answered, with a
/// fixed delay and TTL.
pub struct FakeHost {
    pub alive: Ipv4Addr,
    pub delay: Duration,
    pub ttl: u8,
    pub requests: Vec<(Ipv4Addr, u16)>,
    pending: VecDeque<RawReply>,
}

impl FakeHost {
    pub fn new(alive: Ipv4Addr) -> Self {
        Self {
            alive,
            delay: Duration::from_millis(2),
            ttl: 64,
            requests: Vec::new(),
            pending: VecDeque::new(),
        }
    }
}

impl EchoTransport for FakeHost {
    fn send_echo(&mut self, request: &EchoRequest) -> anyhow::Result<()> {
        self.requests.push((request.destination, request.seq));
        if request.destination != self.alive {
            return Ok(());
        }
        self.pending.push_back(RawReply {
            source: IpAddr::V4(request.destination),
            identifier: request.identifier,
            seq: request.seq,
            bytes: ICMP_ECHO_HDR_LEN + request.payload.len(),
            ttl: self.ttl,
            received_at: Instant::now() + self.delay,
        });
        Ok(())
    }

    fn recv_echo(&mut self, wait: Duration) -> anyhow::Result<Option<RawReply>> {
        match self.pending.pop_front() {
            Some(reply) => {
                std::thread::sleep(reply.received_at.saturating_duration_since(Instant::now()));
                Ok(Some(reply))
            }
            None => {
                std::thread::sleep(wait);
                Ok(None)
            }
        }
    }
}
