use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use catalog_core::{CatalogService, Error};
use catalog_storage::CatalogDatabase;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[clap(name = "catalog_core", about = "Product catalog service", version)]
struct CliArgs {
    #[clap(name = "api_listener", default_value = "127.0.0.1:8080")]
    api_listener: String,
    #[clap(name = "tls_listener", default_value = "127.0.0.1:8443")]
    tls_listener: String,
    #[clap(name = "cert", default_value = "server.pem")]
    cert: String,
    #[clap(name = "key", default_value = "server.key")]
    key: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = CliArgs::parse();
    let api_listener = SocketAddr::from_str(&args.api_listener)?;
    let tls_listener = SocketAddr::from_str(&args.tls_listener)?;

    initialize_logger();
    info!(target: "catalog-core", "Initializing catalog-core");

    let db = CatalogDatabase::in_memory();

    let service = CatalogService::new(
        api_listener,
        tls_listener,
        PathBuf::from(args.cert),
        PathBuf::from(args.key),
        db,
    )
    .await?;

    service.run().await
}

fn initialize_logger() {
    let sub = tracing_subscriber::fmt::Subscriber::builder().with_writer(std::io::stderr);

    sub.with_ansi(false)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .init();
}
