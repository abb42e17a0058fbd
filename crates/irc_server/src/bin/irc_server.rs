//! Process entry point: parses argv, wires up logging, and runs the event
//! loop. Fatal startup errors (§7 class 3) are the only path that exits
//! this process non-zero.

use clap::Parser;
use irc_server::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::init();

    if let Err(err) = irc_server::server::run(args.port, &args) {
        log::error!("fatal: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
