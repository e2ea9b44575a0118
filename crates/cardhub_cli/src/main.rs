//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cardhub_core` linkage.
//! - Expose tag sanitization for quick local sanity checks.
//!
//! # Usage
//! - `cardhub_cli` prints ping/version.
//! - `cardhub_cli tag <raw>...` prints `slug<TAB>name` per argument.

use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None => {
            println!("cardhub_core ping={}", cardhub_core::ping());
            println!("cardhub_core version={}", cardhub_core::core_version());
            ExitCode::SUCCESS
        }
        Some("tag") => {
            for raw in args {
                let tag = cardhub_core::sanitize_tag(&raw);
                println!("{}\t{}", tag.slug, tag.name);
            }
            ExitCode::SUCCESS
        }
        Some(other) => {
            eprintln!("unknown command `{other}`; expected `tag <raw>...`");
            ExitCode::FAILURE
        }
    }
}
