use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gdgen_core::GenError;
use gdgen_core::generators::encryption::KEY_HINT;

mod cli;
use cli::Invocation;

fn main() -> ExitCode {
    // Parse CLI arguments first to get verbosity level
    let invocation = Invocation::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let filter = match invocation.cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    debug!("Parsed arguments: {:?}", invocation);

    match cli::commands::execute(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            match err.downcast_ref::<GenError>() {
                Some(e) => {
                    if matches!(e, GenError::InvalidEncryptionKey { .. }) {
                        eprintln!("{}", KEY_HINT);
                    }
                    ExitCode::from(e.exit_code())
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}
