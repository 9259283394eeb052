//! Runs the CANDue console against stdin/stdout
use std::path::PathBuf;

use candue_cli::{FileStorage, HostBoard, StdinPort};
use candue_common::Settings;
use candue_console::{setup, Console, OverflowPolicy, BUILD_ID};
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// File holding the settings record. Created with factory defaults if missing.
    #[clap(long, short, default_value = "candue-settings.bin")]
    settings: PathBuf,
    /// Number of digital outputs on the simulated board
    #[clap(long, default_value = "8")]
    outputs: usize,
    /// When a line is too long, replace its last character instead of dropping the excess
    #[clap(long)]
    overwrite_last: bool,
}

fn main() {
    let args = Args::parse();

    // The stored log level takes over once setup runs
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .parse_default_env()
        .init();

    log::info!("Using settings file {}", args.settings.display());
    let mut board = HostBoard::new(FileStorage::new(args.settings), args.outputs);
    let mut settings = Settings::default();
    setup(&mut settings, &mut board);

    println!("Build number: {}\r", BUILD_ID);

    let policy = if args.overwrite_last {
        OverflowPolicy::OverwriteLast
    } else {
        OverflowPolicy::DropExcess
    };
    let mut console = Console::with_overflow_policy(&mut settings, &mut board, policy);
    let mut port = StdinPort::new(std::io::stdin().lock());

    loop {
        match console.poll(&mut port) {
            Ok(0) => break,
            Ok(_) => (),
            Err(e) => {
                log::error!("Error reading stdin: {e}");
                std::process::exit(1);
            }
        }
    }
}
