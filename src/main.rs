use clap::Parser;

use book_api::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().resolve()?;
    book_api::logging::init_logger(&config.logging);

    book_api::interface::server::run(config).await
}
