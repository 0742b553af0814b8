//! Lead intake service entry point.

use clap::Parser;
use std::process::ExitCode;

use leadintake::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments and environment
    let args = Commands::parse();

    // Run the command
    match args.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
