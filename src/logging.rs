//! Logging setup: `log` facade with an `env_logger` backend.
//!
//! `RUST_LOG` takes precedence when set; otherwise the verbosity flag picks
//! the level (info by default, debug with `--verbose`).

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the process-wide logger. Call once, before any log macro.
pub fn init(verbose: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        builder.filter_level(level);
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });

    builder.init();
}
