//! Per-packet results and the aggregate statistics of a probe run.

use std::time::Duration;

/// A single echo reply matched to one of our requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    pub seq: u16,
    /// Size of the ICMP message, header included.
    pub bytes: usize,
    pub ttl: u8,
    pub rtt: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEvent {
    Reply(EchoReply),
    /// A reply for a sequence number that was already answered.
    Duplicate(EchoReply),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeStatistics {
    pub packets_sent: usize,
    pub packets_recv: usize,
    pub packets_recv_duplicates: usize,
    /// Round-trip times of unique replies, in arrival order.
    pub rtts: Vec<Duration>,
}

impl ProbeStatistics {
    pub fn record_sent(&mut self) {
        self.packets_sent += 1;
    }

    pub fn record_reply(&mut self, rtt: Duration) {
        self.packets_recv += 1;
        self.rtts.push(rtt);
    }

    pub fn record_duplicate(&mut self) {
        self.packets_recv_duplicates += 1;
    }

    /// Percentage of sent packets that were never answered.
    pub fn packet_loss(&self) -> f64 {
        if self.packets_sent == 0 {
            return 0.0;
        }
        let lost = self.packets_sent.saturating_sub(self.packets_recv);
        lost as f64 / self.packets_sent as f64 * 100.0
    }

    pub fn min_rtt(&self) -> Duration {
        self.rtts.iter().min().copied().unwrap_or(Duration::ZERO)
    }

    pub fn max_rtt(&self) -> Duration {
        self.rtts.iter().max().copied().unwrap_or(Duration::ZERO)
    }

    pub fn avg_rtt(&self) -> Duration {
        if self.rtts.is_empty() {
            return Duration::ZERO;
        }
        self.rtts.iter().sum::<Duration>() / self.rtts.len() as u32
    }

    /// Population standard deviation of the round-trip times.
    pub fn std_dev_rtt(&self) -> Duration {
        if self.rtts.is_empty() {
            return Duration::ZERO;
        }
        let avg = self.avg_rtt().as_secs_f64();
        let variance = self
            .rtts
            .iter()
            .map(|rtt| (rtt.as_secs_f64() - avg).powi(2))
            .sum::<f64>()
            / self.rtts.len() as f64;
        Duration::from_secs_f64(variance.sqrt())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
