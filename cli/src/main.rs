mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, ping};
use pingiv_common::error;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = match CommandLine::try_parse_args() {
        Ok(commands) => commands,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };

    let cfg = commands.config();
    logging::init_logging(cfg.verbose);
    print::banner(cfg.no_banner, cfg.quiet);

    match ping::ping(commands.target, &cfg).await {
        Ok(code) => code,
        Err(e) => {
            error!("Error running ping: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
