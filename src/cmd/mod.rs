use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use kcd::files::{DatasetSource, DEFAULT_DATASET_FILE, DEFAULT_DATA_DIR};
use tracing_subscriber::EnvFilter;

pub mod export;
pub mod search;
pub mod serve;
pub mod stats;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(
        short,
        long,
        env = "KCD_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        help = "The directory containing the disease code master"
    )]
    pub data_dir: PathBuf,

    #[arg(
        long,
        env = "KCD_DATASET_FILE",
        default_value = DEFAULT_DATASET_FILE,
        help = "The file name of the disease code master inside the data directory"
    )]
    pub dataset_file: String,

    #[arg(
        long,
        env = "KCD_ENCODING",
        default_value = "euc-kr",
        help = "The text encoding of the disease code master"
    )]
    pub encoding: String,

    #[arg(
        long,
        env = "KCD_LOG_LEVEL",
        default_value = "info",
        help = "Log level used when RUST_LOG is not set"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up disease codes by Korean name or code prefix
    Search(search::SearchArgs),
    /// Serve lookups over HTTP
    Serve(serve::ServeArgs),
    /// Count the codes in each chapter
    Stats,
    /// Write the admitted records as a JSON array of { code, ko, en }
    Export(export::ExportArgs),
}

pub fn run(args: Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = DatasetSource::new(args.data_dir.join(&args.dataset_file))
        .with_encoding_label(&args.encoding)?;

    match args.command {
        Command::Search(search_args) => search::run(source, search_args),
        Command::Serve(serve_args) => serve::run(source, serve_args),
        Command::Stats => stats::run(source),
        Command::Export(export_args) => export::run(source, export_args),
    }
}
