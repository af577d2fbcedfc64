#![forbid(unsafe_code)]

//! Binary entrypoint for the `sickle` CLI.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = sickle_cli::run().await;
    process::exit(exit_code);
}
