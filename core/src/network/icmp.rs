use std::net::{IpAddr, Ipv4Addr};
use std::time::Instant;

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpPacket, IcmpTypes, checksum};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::{self, Ipv4Flags, Ipv4Packet, MutableIpv4Packet};

pub const IP_V4_HDR_LEN: usize = 20;
pub const ICMP_ECHO_HDR_LEN: usize = 8;

/// Everything needed to put one echo request on the wire.
#[derive(Debug, Clone, Copy)]
pub struct EchoRequest<'a> {
    pub destination: Ipv4Addr,
    pub identifier: u16,
    pub seq: u16,
    pub ttl: u8,
    pub payload: &'a [u8],
}

/// An echo reply as read off the wire, before it is matched to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReply {
    pub source: IpAddr,
    pub identifier: u16,
    pub seq: u16,
    /// ICMP message length, header included.
    pub bytes: usize,
    pub ttl: u8,
    pub received_at: Instant,
}

/// Fills a payload of `size` bytes with a repeating pattern.
pub fn make_payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % u8::MAX as usize) as u8).collect()
}

/// Builds a complete IPv4 datagram carrying an ICMP echo request.
///
/// The source address is left unspecified, the kernel fills it in on raw sockets.
pub fn create_echo_request(request: &EchoRequest) -> anyhow::Result<Vec<u8>> {
    let icmp_len: usize = ICMP_ECHO_HDR_LEN + request.payload.len();
    let total_len: usize = IP_V4_HDR_LEN + icmp_len;
    let total_len_u16: u16 = u16::try_from(total_len)
        .with_context(|| format!("echo request of {total_len} bytes does not fit in IPv4"))?;
    let mut pkt: Vec<u8> = vec![0u8; total_len];

    create_ipv4_header(&mut pkt, total_len_u16, request.ttl, request.destination)?;

    let mut icmp = MutableEchoRequestPacket::new(&mut pkt[IP_V4_HDR_LEN..])
        .context("failed to create echo request packet")?;
    icmp.set_icmp_type(IcmpTypes::EchoRequest);
    icmp.set_icmp_code(IcmpCode::new(0));
    icmp.set_identifier(request.identifier);
    icmp.set_sequence_number(request.seq);
    icmp.set_payload(request.payload);

    icmp.set_checksum(0);
    let icmp_imm = icmp.to_immutable();
    let icmp_pkt = IcmpPacket::new(icmp_imm.packet()).context("failed to create ICMP packet")?;
    let csm = checksum(&icmp_pkt);
    icmp.set_checksum(csm);

    Ok(pkt)
}

fn create_ipv4_header(
    buf: &mut [u8],
    total_length: u16,
    ttl: u8,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<()> {
    let mut ipv4 =
        MutableIpv4Packet::new(&mut buf[..IP_V4_HDR_LEN]).context("creating ipv4 packet")?;
    ipv4.set_version(4);
    ipv4.set_header_length(5);
    ipv4.set_dscp(0);
    ipv4.set_ecn(0);
    ipv4.set_total_length(total_length);
    ipv4.set_identification(rand::random());
    ipv4.set_flags(Ipv4Flags::DontFragment);
    ipv4.set_fragment_offset(0);
    ipv4.set_ttl(ttl);
    ipv4.set_next_level_protocol(IpNextHeaderProtocols::Icmp);
    ipv4.set_source(Ipv4Addr::UNSPECIFIED);
    ipv4.set_destination(dst_addr);

    ipv4.set_checksum(0);
    let ipv4_imm = ipv4.to_immutable();
    let ipv4_pkt = Ipv4Packet::new(ipv4_imm.packet()).context("transforming ipv4 to packet")?;
    let csm = ipv4::checksum(&ipv4_pkt);
    ipv4.set_checksum(csm);
    Ok(())
}

/// Extracts an echo reply from a received IPv4 datagram.
///
/// Returns `None` for anything that is not an ICMP echo reply, including our own
/// requests looping back on the loopback interface.
pub fn parse_echo_reply(packet: &Ipv4Packet, received_at: Instant) -> Option<RawReply> {
    if packet.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
        return None;
    }

    let icmp_bytes: &[u8] = packet.payload();
    let reply = EchoReplyPacket::new(icmp_bytes)?;
    if reply.get_icmp_type() != IcmpTypes::EchoReply {
        return None;
    }

    Some(RawReply {
        source: IpAddr::V4(packet.get_source()),
        identifier: reply.get_identifier(),
        seq: reply.get_sequence_number(),
        bytes: icmp_bytes.len(),
        ttl: packet.get_ttl(),
        received_at,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::packet::icmp::echo_request::EchoRequestPacket;

    fn request(payload: &[u8]) -> EchoRequest<'_> {
        EchoRequest {
            destination: Ipv4Addr::new(8, 8, 8, 8),
            identifier: 0xBEEF,
            seq: 7,
            ttl: 64,
            payload,
        }
    }

    /// Turns an outgoing request into the reply a peer would send back.
    fn as_reply(mut pkt: Vec<u8>, source: Ipv4Addr, ttl: u8) -> Vec<u8> {
        {
            let mut ipv4 = MutableIpv4Packet::new(&mut pkt).unwrap();
            ipv4.set_source(source);
            ipv4.set_destination(Ipv4Addr::new(10, 0, 0, 2));
            ipv4.set_ttl(ttl);
        }
        pkt[IP_V4_HDR_LEN] = IcmpTypes::EchoReply.0;
        pkt
    }

    #[test]
    fn echo_request_layout() {
        let payload = make_payload(56);
        let pkt = create_echo_request(&request(&payload)).unwrap();
        assert_eq!(pkt.len(), IP_V4_HDR_LEN + ICMP_ECHO_HDR_LEN + 56);

        let ipv4 = Ipv4Packet::new(&pkt).unwrap();
        assert_eq!(ipv4.get_version(), 4);
        assert_eq!(ipv4.get_total_length() as usize, pkt.len());
        assert_eq!(ipv4.get_ttl(), 64);
        assert_eq!(ipv4.get_destination(), Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(ipv4.get_next_level_protocol(), IpNextHeaderProtocols::Icmp);
        assert_eq!(ipv4.get_checksum(), ipv4::checksum(&ipv4));

        let echo = EchoRequestPacket::new(ipv4.payload()).unwrap();
        assert_eq!(echo.get_icmp_type(), IcmpTypes::EchoRequest);
        assert_eq!(echo.get_identifier(), 0xBEEF);
        assert_eq!(echo.get_sequence_number(), 7);
        assert_eq!(echo.payload(), payload.as_slice());

        let icmp = IcmpPacket::new(ipv4.payload()).unwrap();
        assert_eq!(icmp.get_checksum(), checksum(&icmp));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; u16::MAX as usize];
        assert!(create_echo_request(&request(&payload)).is_err());
    }

    #[test]
    fn parses_echo_reply() {
        let payload = make_payload(16);
        let pkt = create_echo_request(&request(&payload)).unwrap();
        let reply_pkt = as_reply(pkt, Ipv4Addr::new(8, 8, 8, 8), 117);
        let now = Instant::now();

        let reply = parse_echo_reply(&Ipv4Packet::new(&reply_pkt).unwrap(), now).unwrap();
        assert_eq!(reply.source, IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(reply.identifier, 0xBEEF);
        assert_eq!(reply.seq, 7);
        assert_eq!(reply.ttl, 117);
        assert_eq!(reply.bytes, ICMP_ECHO_HDR_LEN + 16);
        assert_eq!(reply.received_at, now);
    }

    #[test]
    fn ignores_echo_requests() {
        let payload = make_payload(8);
        let pkt = create_echo_request(&request(&payload)).unwrap();
        let parsed = parse_echo_reply(&Ipv4Packet::new(&pkt).unwrap(), Instant::now());
        assert!(parsed.is_none());
    }

    #[test]
    fn payload_pattern() {
        assert_eq!(make_payload(4), vec![0, 1, 2, 3]);
        assert!(make_payload(0).is_empty());
    }
}
