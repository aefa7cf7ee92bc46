// Entry point: dispatch demo, then storage demo

use std::io::{self, Write};

use tracing::{debug, Level};

use inclass::{dispatch, storage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Arguments are ignored
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::WARN)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch::run(&mut out)?;
    out.flush()?;

    storage::demo();
    debug!("demos finished");

    Ok(())
}
