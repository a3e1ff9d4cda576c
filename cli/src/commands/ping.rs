use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use colored::*;
use pingiv_common::config::Config;
use pingiv_common::network::stats::{EchoReply, ProbeEvent, ProbeStatistics};
use pingiv_common::network::target::RomanTarget;
use pingiv_common::{success, warn};
use pingiv_core::pinger;
use tracing::debug;

use crate::terminal::{colors, format, print};

pub async fn ping(target: RomanTarget, cfg: &Config) -> anyhow::Result<ExitCode> {
    if cfg.verbose {
        success!("Converting: {} -> {}", target.roman, target.canonical);
    }

    if !is_root::is_root() {
        warn!("Raw ICMP sockets usually require root privileges");
    }

    if cfg.quiet < 2 {
        print::print(&header_line(&target));
    }

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let interrupt = tokio::spawn(stop_on_ctrl_c(running.clone()));

    let destination: Ipv4Addr = target.canonical.into();
    let roman: String = target.roman.clone();
    let probe_cfg: Config = cfg.clone();
    let stats: ProbeStatistics = tokio::task::spawn_blocking(move || {
        pinger::ping(
            destination,
            &probe_cfg,
            |event| on_event(&roman, event, probe_cfg.quiet),
            &running,
        )
    })
    .await
    .context("probe task failed")??;

    interrupt.abort();

    for line in summary_lines(&target.roman, &stats) {
        print::print(&line);
    }
    print::end_of_program(cfg.quiet);

    if stats.packets_recv == 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn stop_on_ctrl_c(running: Arc<AtomicBool>) {
    if tokio::signal::ctrl_c().await.is_ok() {
        debug!("interrupted, finishing probe");
        running.store(false, Ordering::Relaxed);
    }
}

fn on_event(roman: &str, event: &ProbeEvent, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let line = match event {
        ProbeEvent::Reply(reply) => reply_line(roman, reply),
        ProbeEvent::Duplicate(reply) => {
            format!("{} {}", reply_line(roman, reply), "(DUP!)".color(colors::DUPLICATE))
        }
    };
    print::print(&line);
}

fn header_line(target: &RomanTarget) -> String {
    format!(
        "PING {} ({}):",
        target.roman.color(colors::ROMAN),
        target.canonical.to_string().color(colors::IPV4_ADDR)
    )
}

fn reply_line(roman: &str, reply: &EchoReply) -> String {
    format!(
        "{} bytes from {}: icmp_seq={} time={} ttl={}",
        reply.bytes,
        roman,
        reply.seq,
        format::duration(reply.rtt),
        reply.ttl
    )
}

fn summary_lines(roman: &str, stats: &ProbeStatistics) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("--- {} ping statistics ---", roman),
        format!(
            "{} packets transmitted, {} packets received, {}% packet loss",
            stats.packets_sent,
            stats.packets_recv,
            format::percent(stats.packet_loss())
        ),
    ];
    if stats.packets_recv_duplicates > 0 {
        lines.push(format!("{} duplicates received", stats.packets_recv_duplicates));
    }
    lines.push(format!(
        "round-trip min/avg/max/stddev = {}/{}/{}/{}",
        format::duration(stats.min_rtt()),
        format::duration(stats.avg_rtt()),
        format::duration(stats.max_rtt()),
        format::duration(stats.std_dev_rtt())
    ));
    lines
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
