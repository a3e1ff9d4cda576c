use std::net::IpAddr;
use std::time::{Duration, Instant};

use anyhow::Context;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::transport::{self, TransportChannelType, TransportReceiver, TransportSender};
use tracing::trace;

use crate::network::icmp::{self, EchoRequest, RawReply};

const TRANSPORT_BUFFER_SIZE: usize = 4096;
const CHANNEL_TYPE_ICMP: TransportChannelType =
    TransportChannelType::Layer3(IpNextHeaderProtocols::Icmp);

/// Moves echo requests and replies between the pinger and the network.
pub trait EchoTransport {
    fn send_echo(&mut self, request: &EchoRequest) -> anyhow::Result<()>;

    /// Waits at most `wait` for the next echo reply.
    ///
    /// `Ok(None)` means nothing usable arrived in time. Callers filter replies that
    /// belong to other processes themselves.
    fn recv_echo(&mut self, wait: Duration) -> anyhow::Result<Option<RawReply>>;
}

/// Raw ICMP transport on a layer 3 channel, so the IPv4 header (and its TTL)
/// is visible on both directions.
pub struct IcmpTransport {
    tx: TransportSender,
    rx: TransportReceiver,
}

impl IcmpTransport {
    pub fn open() -> anyhow::Result<Self> {
        let (tx, rx) = open_channel().context("opening raw ICMP channel")?;
        Ok(Self { tx, rx })
    }
}

impl EchoTransport for IcmpTransport {
    fn send_echo(&mut self, request: &EchoRequest) -> anyhow::Result<()> {
        let pkt: Vec<u8> = icmp::create_echo_request(request)?;
        let ipv4_pkt = Ipv4Packet::new(&pkt).context("wrapping echo request")?;
        self.tx
            .send_to(ipv4_pkt, IpAddr::V4(request.destination))
            .with_context(|| {
                format!("sending icmp_seq={} to {}", request.seq, request.destination)
            })?;
        trace!("sent icmp_seq={} to {}", request.seq, request.destination);
        Ok(())
    }

    fn recv_echo(&mut self, wait: Duration) -> anyhow::Result<Option<RawReply>> {
        let mut iterator = transport::ipv4_packet_iter(&mut self.rx);
        let received = iterator
            .next_with_timeout(wait)
            .context("receiving ICMP packet")?;

        Ok(received.and_then(|(packet, _)| icmp::parse_echo_reply(&packet, Instant::now())))
    }
}

fn open_channel() -> anyhow::Result<(TransportSender, TransportReceiver)> {
    let (tx, rx) = transport::transport_channel(TRANSPORT_BUFFER_SIZE, CHANNEL_TYPE_ICMP)?;
    Ok((tx, rx))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
