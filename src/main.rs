use clap::Parser;
use eyre::Result;

mod cmd;

fn main() -> Result<()> {
    cmd::run(cmd::Args::parse())
}
