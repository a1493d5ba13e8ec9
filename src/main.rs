mod cli;
mod helper;

use crate::cli::Cli;
use crate::helper::get_snapshot_manager_instance;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::LevelFilter;

pub use crate::cli::{Handler, Result};

fn main() {
    // Without any argument, print the whole help rather than a terse usage error
    if std::env::args_os().len() <= 1 {
        if let Err(e) = <Cli as CommandFactory>::command().write_help(&mut std::io::stderr()) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    logger.format_timestamp(None).format_target(false);
    if cli.quiet {
        logger.filter_level(LevelFilter::Off);
    }
    logger.init();

    let manager = get_snapshot_manager_instance(&cli.config);

    if let Err(e) = cli.command().handler(&manager) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
