// src/main.rs
use clap::Parser;
use stock_server::config::ServerConfig;
use stock_server::{log_filter, run_server};
use tracing_subscriber::{fmt, prelude::*};
use validator::Validate;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = ServerConfig::parse();
    config.validate()?;

    run_server(config).await
}
