use anyhow::Result;
use clap::Parser;
use vidcat::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
