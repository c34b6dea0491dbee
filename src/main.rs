use anyhow::Result;
use cellglyph::cli::{self, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let args = Cli::parse();

    // Routes all log::info!() etc. to the debug log file.
    // CLI --log-level takes precedence, then DEBUG_LEVEL, then config (applied below).
    cellglyph::debug::init_log_bridge(args.log_level);

    let config = args.load_config()?;
    if let Some(level) = config.log_level {
        cellglyph::debug::apply_config_level(level);
    }
    log::info!("Starting cellglyph");

    let result = cli::run(args.command, config);
    log::logger().flush();

    if let Err(ref e) = result {
        eprintln!("cellglyph: error: {e:#}");
    }
    result
}
