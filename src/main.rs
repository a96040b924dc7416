use std::sync::Arc;
use std::time::Duration;

use log::info;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower_http::cors::{Any, CorsLayer};

mod api;
mod catalog;
mod config;
mod error;
mod logger;
mod pathmap;
mod remote;
mod transcode;

use crate::config::Config;
use crate::remote::{ScpConfig, ScpFetcher};
use crate::transcode::Transcoder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logger::init()?;

    let config = Config::from_env();

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);
    let db: DatabaseConnection = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    // One outbound client for the whole process, built here and injected;
    // every conversion call shares it.
    let http_client = reqwest::Client::builder()
        .timeout(config.transcoder_timeout)
        .build()?;

    let fetcher = ScpFetcher::new(ScpConfig {
        host: config.scp_host.clone(),
        port: config.scp_port,
        user: config.scp_user.clone(),
        key_path: config.scp_key_path.clone(),
        connect_timeout: config.scp_connect_timeout,
        io_timeout: config.scp_io_timeout,
    });
    let transcoder = Transcoder::new(
        http_client,
        &config.transcoder_url,
        config.convert_kinds.clone(),
    );

    let bind_address = config.bind_address();

    let state = api::AppState {
        db,
        path_mapping: Arc::new(config.path_mapping),
        fetcher: Arc::new(fetcher),
        transcoder: Arc::new(transcoder),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = api::create_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("station-api listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
