use catalog_client::CatalogClient;
use catalog_types::ProductDraft;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[clap(name = "catalog_cli", about = "Product catalog client", version)]
struct CliArgs {
    #[clap(
        name = "endpoint",
        default_value = "http://localhost:8080",
        long = "endpoint"
    )]
    endpoint: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    Register {
        username: String,
        name: String,
        category: String,
        price: i64,
        description: String,
    },
    Get {
        name: String,
    },
}

#[tokio::main]
pub async fn main() {
    let args = CliArgs::parse();
    initialize_logger();

    let client = CatalogClient::new(&args.endpoint).unwrap();
    match args.command {
        Command::Register {
            username,
            name,
            category,
            price,
            description,
        } => {
            let draft = ProductDraft {
                username,
                name,
                category,
                price,
                description,
            };
            match client.create_product(&draft).await {
                Ok(product) => info!("{:?}", product),
                Err(e) => error!("{:?}", e),
            }
        }
        Command::Get { name } => match client.get_product(&name).await {
            Ok(product) => info!("{:?}", product),
            Err(e) => error!("{:?}", e),
        },
    }
}

fn initialize_logger() {
    let sub = tracing_subscriber::fmt::Subscriber::builder().with_writer(std::io::stderr);
    sub.with_ansi(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .init();
}
