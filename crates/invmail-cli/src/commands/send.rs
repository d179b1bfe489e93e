//! Send command - mail one invoice PDF to the recipients of its order.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use clap::builder::{PossibleValue, PossibleValuesParser};
use console::style;
use tracing::{debug, info};

use invmail_core::invoice::{DEFAULT_PARSER, get_parser, parser_names};
use invmail_core::mail::DispatchResult;
use invmail_core::pipeline::{Pipeline, load_inputs};

/// Number of raw text characters logged in verbose mode.
const EXCERPT_CHARS: usize = 200;

/// Arguments for the send command.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Invoice PDF to process and attach
    #[arg(long, value_name = "PATH")]
    pub pdf: PathBuf,

    /// Mail configuration (INI with [mail] and [sendemail] sections)
    #[arg(long, value_name = "PATH")]
    pub mail_config: PathBuf,

    /// Order mapping file (ORDER:email1,email2 per line)
    #[arg(long, value_name = "PATH")]
    pub map: PathBuf,

    /// Preview the email without sending it
    #[arg(long, visible_alias = "dry-run")]
    pub test: bool,

    /// Invoice layout parser
    #[arg(long, default_value = DEFAULT_PARSER, value_parser = PossibleValuesParser::new(parser_values()))]
    pub parser: String,

    /// Send without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(args: SendArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    let (config, mapping) = load_inputs(&args.mail_config, &args.map)?;
    let pipeline = Pipeline::new(&args.parser, &config, &mapping)?;
    let pdf = pipeline.read_pdf(&args.pdf)?;
    debug!("Raw text excerpt: {:?}", excerpt(&pdf.text, EXCERPT_CHARS));

    let prepared = pipeline.prepare(&pdf.text, pdf.attachment)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let json = serde_json::to_string_pretty(&prepared.record)
            .context("failed to serialize the extracted record")?;
        debug!("Extracted record:\n{}", json);
    }

    pipeline.dispatch(&prepared, true)?;

    if args.test {
        info!("Test mode, email not sent");
        debug!("Total processing time: {:?}", start.elapsed());
        return Ok(());
    }

    if !args.yes && !confirm(prepared.mail.to.len())? {
        println!("{} Sending cancelled", style("✗").yellow());
        return Ok(());
    }

    let result = pipeline.dispatch(&prepared, false)?;
    if let DispatchResult::Sent { recipients, response } = result {
        println!(
            "{} Invoice {} sent to {} recipient(s) (server replied {})",
            style("✓").green(),
            prepared.record.invoice_number,
            recipients,
            response
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

/// Registered parsers with their descriptions, for `--help`.
fn parser_values() -> Vec<PossibleValue> {
    parser_names()
        .into_iter()
        .filter_map(|name| get_parser(name).ok())
        .map(|parser| PossibleValue::new(parser.name()).help(parser.description()))
        .collect()
}

/// Ask on stderr, read the answer from stdin. Only `y`/`yes` accepts.
fn confirm(recipients: usize) -> anyhow::Result<bool> {
    eprint!("Send this email to {recipients} recipient(s)? (y/N) ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// First `max` characters of `text`, on a char boundary.
fn excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
