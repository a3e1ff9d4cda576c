pub mod ping;

use std::time::Duration;

use clap::{ArgAction, Parser};
use pingiv_common::config::{self, Config};
use pingiv_common::network::target::RomanTarget;

const AFTER_HELP: &str = "\
Examples:
  pingiv CXXVII.N.N.I                  # Ping 127.0.0.1
  pingiv CXXVII...I                    # Ping 127.0.0.1 (725 BC format)
  pingiv CXXVII.nulla.nulla.I          # Ping 127.0.0.1 (725 BC latin format)
  pingiv -c 10 VIII.VIII.VIII.VIII     # Send 10 pings to 8.8.8.8
  pingiv -v CXCII.CLXVIII.I.I          # Verbose mode (show the conversion on top)

Shortened addresses are padded with zero octets at the end.";

#[derive(Parser)]
#[command(name = "pingiv")]
#[command(version)]
#[command(about = "A ping utility that accepts Roman numeral IPv4 addresses.")]
#[command(after_help = AFTER_HELP)]
pub struct CommandLine {
    /// Roman numeral IPv4 address, 1 to 4 octets separated by dots
    #[arg(value_name = "ROMAN_ADDRESS")]
    pub target: RomanTarget,

    /// Number of ping packets to send (0 keeps sending until Ctrl-C or timeout)
    #[arg(short, long, default_value_t = config::DEFAULT_COUNT)]
    pub count: u16,

    /// Deadline for the whole run, e.g. 5s or 1500ms
    #[arg(short, long, default_value = "5s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Interval between pings
    #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
    pub interval: Duration,

    /// Verbose output (show conversion)
    #[arg(short, long)]
    pub verbose: bool,

    /// Less output: -q hides per-packet lines, -qq prints only the statistics
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Time-to-live of outgoing packets
    #[arg(long, default_value_t = config::DEFAULT_TTL)]
    pub ttl: u8,

    /// Payload bytes per echo request
    #[arg(short = 's', long = "size", default_value_t = config::DEFAULT_PAYLOAD_SIZE)]
    pub payload_size: usize,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    pub fn config(&self) -> Config {
        Config {
            count: self.count,
            timeout: self.timeout,
            interval: self.interval,
            ttl: self.ttl,
            payload_size: self.payload_size,
            verbose: self.verbose,
            quiet: self.quiet,
            no_banner: self.no_banner,
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn unit_nanos(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" => Some(1e3),
        "ms" => Some(1e6),
        "s" => Some(1e9),
        "m" => Some(60e9),
        "h" => Some(3600e9),
        _ => None,
    }
}

/// Parses a duration such as `5s`, `250ms`, `1.5s` or `1m30s`.
///
/// Terms are summed. A bare number means seconds, but only when it is the whole input.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration cannot be empty".to_string());
    }

    let nanos: f64 = if input.chars().all(is_number_char) {
        let secs: f64 = input
            .parse()
            .map_err(|_| format!("invalid number in duration: '{input}'"))?;
        secs * 1e9
    } else {
        let mut total: f64 = 0.0;
        let mut rest: &str = input;
        while !rest.is_empty() {
            let number_end = rest.find(|c: char| !is_number_char(c)).unwrap_or(rest.len());
            let (number, tail) = rest.split_at(number_end);
            let unit_end = tail.find(is_number_char).unwrap_or(tail.len());
            let (unit, next) = tail.split_at(unit_end);

            let value: f64 = number
                .parse()
                .map_err(|_| format!("invalid number in duration: '{input}'"))?;
            if unit.is_empty() {
                return Err(format!("missing unit after '{number}' in duration: '{input}'"));
            }
            let scale = unit_nanos(unit)
                .ok_or_else(|| format!("unknown unit '{unit}' in duration: '{input}'"))?;

            total += value * scale;
            rest = next;
        }
        total
    };

    let nanos: f64 = nanos.round();
    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("duration out of range: '{input}'"));
    }

    Ok(Duration::from_nanos(nanos as u64))
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
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_valid() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn defaults_match_config_defaults() {
        let cmd = CommandLine::try_parse_from(["pingiv", "CXXVII.N.N.I"]).unwrap();
        let cfg = cmd.config();
        let defaults = Config::default();

        assert_eq!(cmd.target.canonical.to_string(), "127.0.0.1");
        assert_eq!(cfg.count, defaults.count);
        assert_eq!(cfg.timeout, defaults.timeout);
        assert_eq!(cfg.interval, defaults.interval);
        assert_eq!(cfg.ttl, defaults.ttl);
        assert_eq!(cfg.payload_size, defaults.payload_size);
        assert!(!cfg.verbose);
        assert_eq!(cfg.quiet, 0);
    }

    #[test]
    fn parses_flags() {
        let cmd = CommandLine::try_parse_from([
            "pingiv", "-c", "10", "-t", "2s", "-i", "250ms", "-v", "-qq", "VIII.VIII.VIII.VIII",
        ])
        .unwrap();

        assert_eq!(cmd.count, 10);
        assert_eq!(cmd.timeout, Duration::from_secs(2));
        assert_eq!(cmd.interval, Duration::from_millis(250));
        assert!(cmd.verbose);
        assert_eq!(cmd.quiet, 2);
        assert_eq!(cmd.target.roman, "VIII.VIII.VIII.VIII");
    }

    #[test]
    fn rejects_invalid_roman_address() {
        let err = CommandLine::try_parse_from(["pingiv", "CXXVII.MMM"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("error in octet 2 (MMM)"));
    }

    #[test]
    fn requires_an_address() {
        let err = CommandLine::try_parse_from(["pingiv"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("5"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("200ms"), Ok(Duration::from_millis(200)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
    }

    #[test]
    fn test_parse_duration_compound() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(
            parse_duration("2h45m30.5s"),
            Ok(Duration::from_millis(9_930_500))
        );
        assert_eq!(parse_duration("1s500ms"), Ok(Duration::from_millis(1500)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("1.2.3s").is_err());
        assert!(parse_duration("1h30").is_err());
        assert!(parse_duration("ms5").is_err());
        assert!(parse_duration("1m 30s").is_err());
    }
}
