use std::time::Duration;

/// Renders a duration with the largest unit that keeps the integer part non-zero,
/// e.g. `812ns`, `45.12µs`, `12.345ms`, `1.5s`.
pub fn duration(d: Duration) -> String {
    let nanos: u128 = d.as_nanos();
    let (value, unit): (f64, &str) = match nanos {
        0 => return String::from("0s"),
        n if n < 1_000 => return format!("{n}ns"),
        n if n < 1_000_000 => (n as f64 / 1e3, "µs"),
        n if n < 1_000_000_000 => (n as f64 / 1e6, "ms"),
        n => (n as f64 / 1e9, "s"),
    };
    format!("{}{unit}", trim_decimals(value, 3))
}

pub fn percent(value: f64) -> String {
    trim_decimals(value, 2)
}

fn trim_decimals(value: f64, places: usize) -> String {
    let fixed: String = format!("{value:.places$}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
