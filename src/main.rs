//! situps CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, prints errors to stderr
//! and exits non-zero on failure. All logic lives in the CLI module.

use situps::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("error[{}]: {}", e.code_str(), e.message());
        std::process::exit(1);
    }
}
