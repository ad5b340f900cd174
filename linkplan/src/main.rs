mod envelope;
mod options;
mod plan;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse() {
        Cli::Envelope(envelope) => envelope.run(),
        Cli::Plan(plan) => plan.run(),
    }
}
