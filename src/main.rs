// src/main.rs

use tagexec::errors::TagexecError;
use tagexec::terminal::TerminalCaps;
use tagexec::{cli, logging, run};
use tracing::error;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if args.program.is_empty() {
        let bin = std::env::args().next().unwrap_or_else(|| "tagexec".to_string());
        println!("{}", cli::usage(&bin));
        std::process::exit(-1);
    }

    let caps = TerminalCaps::detect();
    if let Err(err) = logging::init_logging(args.log_level, caps.stderr) {
        eprintln!("tagexec error: {err:?}");
        std::process::exit(1);
    }

    // A non-zero child exit is reported by the reconciler and still ends in
    // status 0 here.
    match run(args, caps).await {
        Ok(_) => {}
        Err(TagexecError::Usage) => std::process::exit(-1),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
