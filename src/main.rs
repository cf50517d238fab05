//! dimsolve CLI - runs the classic-law catalogue.
//!
//! Usage: `dimsolve [config.yaml]`. Logging follows `RUST_LOG`.

use std::process::ExitCode;

use dimsolve::config::{self, UnitsConfig};
use dimsolve::scenarios::classic_laws;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = std::env::args().nth(1) {
        if let Err(e) = UnitsConfig::load(&path).and_then(config::install) {
            error!(%path, error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    }

    println!("dimsolve v{}", env!("CARGO_PKG_VERSION"));
    let mut formulas = Vec::new();
    let mut failed = false;

    for law in classic_laws() {
        println!();
        println!("{}:", law.name);
        match law.solve() {
            Ok(derivation) => {
                println!("{derivation}");
                formulas.push(derivation.formula().expression());
            }
            Err(e) => {
                println!("{e}");
                failed = true;
            }
        }
    }

    println!();
    for formula in &formulas {
        println!("{formula}");
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
