//! Writes a fresh self-signed root CA (`ca.cer`, `ca-cert.pem`, `ca-key.pem`)
//! into the current directory.

use std::process::ExitCode;

use createca::clock::SystemClock;
use createca::root_ca::{RootCaConfig, provision};
use rand_core::OsRng;

fn main() -> ExitCode {
    if let Err(e) = createca::logging::setup("warn") {
        eprintln!("Failed to set up logging: {e:#}");
    }

    match provision(&RootCaConfig::default(), &SystemClock, &mut OsRng) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Reported on stdout; the exit status carries the failure.
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
