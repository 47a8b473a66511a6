use std::sync::Arc;

use clap::Args;
use eyre::Result;
use kcd::{server::create_app, Catalog, DatasetSource};
use tracing::info;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "KCD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(short, long, env = "KCD_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Load the dataset before accepting requests, and exit if it cannot be loaded
    #[arg(long, env = "KCD_PRELOAD")]
    pub preload: bool,
}

pub fn run(source: DatasetSource, args: ServeArgs) -> Result<()> {
    let catalog = if args.preload {
        Catalog::open(source)?
    } else {
        Catalog::new(source)
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(Arc::new(catalog), args))
}

async fn serve(catalog: Arc<Catalog>, args: ServeArgs) -> Result<()> {
    let app = create_app(catalog);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!(address = %listener.local_addr()?, "Serving KCD lookups");

    axum::serve(listener, app).await?;
    Ok(())
}
