#![forbid(unsafe_code)]

//! oled-status: status-display daemon entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("oled-status: {e}");
        std::process::exit(e.exit_code());
    }
}
