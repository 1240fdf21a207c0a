use std::process::ExitCode;

use clap::Parser;
use habitrack::{
    cli::{run_cli, Args},
    utils::runtime::single_thread_runtime,
};
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();

    let result = single_thread_runtime().and_then(|runtime| runtime.block_on(run_cli(args)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error running cli {e:?}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
