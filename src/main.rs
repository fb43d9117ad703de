use std::process::ExitCode;

use clap::Parser;
use lar_mcp::cli::{Arguments, init_tracing};

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_tracing();

    if let Err(err) = lar_mcp::mcp::run_server(args.transport, &args.http_addr) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
