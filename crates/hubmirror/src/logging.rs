//! Tracing setup for the binary.
//!
//! `RUST_LOG` wins when set. Otherwise only warnings are shown, and each
//! `-v` raises the hubmirror crates one level.

use tracing_subscriber::EnvFilter;

const TARGETS: [&str; 3] = ["hubmirror", "hubmirror_fetch", "hubmirror_mirror"];

fn directives(verbose: u8) -> Vec<String> {
    let level = match verbose {
        0 => return Vec::new(),
        1 => "info",
        _ => "debug",
    };
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect()
}

pub fn init_logging(verbose: u8) {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    for directive in directives(verbose) {
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
