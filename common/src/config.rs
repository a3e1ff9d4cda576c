use std::time::Duration;

pub const DEFAULT_COUNT: u16 = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TTL: u8 = 64;
pub const DEFAULT_PAYLOAD_SIZE: usize = 56;

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of echo requests to send. `0` keeps sending until interrupted.
    pub count: u16,
    /// Deadline for the whole run, not for a single packet.
    pub timeout: Duration,
    /// Gap between two consecutive echo requests.
    pub interval: Duration,
    /// Time-to-live set on outgoing packets.
    pub ttl: u8,
    /// Bytes of payload carried by each echo request.
    pub payload_size: usize,
    /// Shows the Roman to decimal conversion and enables debug logs.
    pub verbose: bool,
    /// `1` hides per-packet lines, `2` prints the summary only.
    pub quiet: u8,
    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            ttl: DEFAULT_TTL,
            payload_size: DEFAULT_PAYLOAD_SIZE,
            verbose: false,
            quiet: 0,
            no_banner: false,
        }
    }
}
