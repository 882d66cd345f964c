// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run wafer yield experiments and print the report.
//!
//! See `lib.rs` for details.
//!
//! For latest usage run:
//! ```bash
//! cargo run --bin gwr-yield -- --help
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use anyhow::Result;
use gwr_yield::run_sweep;
use gwr_yield::settings::{STDOUT_REPORT_FILE, Settings};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Take the settings string and convert it to a Level
fn choose_level(lvl: &str) -> LevelFilter {
    match LevelFilter::from_str(lvl) {
        Ok(level) => level,
        Err(_) => {
            let default = LevelFilter::Error;
            eprintln!("Unable to parse level string '{lvl}', defaulting to {default}");
            default
        }
    }
}

/// Log to stderr so that the report on stdout is left untouched.
fn setup_logging(settings: &Settings) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off) // No timestamps are printed
        .set_location_level(LevelFilter::Off) // No file locations are printed
        .set_thread_level(LevelFilter::Off) // No thread information is printed
        .set_target_level(LevelFilter::Off) // No target is printed
        .build();
    TermLogger::init(
        choose_level(settings.log_level()),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn report_writer(report_file: &str) -> Result<Box<dyn Write>> {
    if report_file == STDOUT_REPORT_FILE {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(report_file)?)))
    }
}

fn main() -> Result<()> {
    let settings = Settings::parse_all_sources()?;
    setup_logging(&settings)?;

    let mut writer = report_writer(settings.report_file())?;
    run_sweep(&settings, &mut writer)?;

    Ok(())
}
