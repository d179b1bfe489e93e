//! CLI application that mails PDF invoices to the recipients of their order.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::send;

/// Extract invoice fields from a PDF and email it to the order's recipients
#[derive(Parser)]
#[command(name = "invmail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    send: send::SendArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("error: failed to install logger: {e}");
        return ExitCode::FAILURE;
    }

    match send::run(cli.send) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.verbose > 0 {
                eprintln!("error: {e:?}");
            } else {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}
