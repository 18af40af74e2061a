//! Pathlight CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use pathlight_cli::{Args, error_adapter::to_reportables};

/// Initializes `env_logger`, falling back to `warn` for unknown levels.
fn init_logger(level: &str) -> LevelFilter {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    log_level
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let log_level = init_logger(&args.log_level);

    info!(log_level:?; "Starting Pathlight");
    debug!(args:?; "Parsed arguments");

    let Err(err) = pathlight_cli::run(&args) else {
        info!("Completed successfully");
        return;
    };

    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(&err) {
        let mut writer = String::new();
        match reporter.render_report(&mut writer, &reportable) {
            Ok(()) => error!("{writer}"),
            Err(_) => error!("{reportable}"),
        }
    }
    process::exit(1);
}
