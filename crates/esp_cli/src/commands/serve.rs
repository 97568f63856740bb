use std::sync::Arc;

use clap::Args;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use esp_api::routes::app_router;
use esp_api::state::AppState;
use esp_db::{MemBlobStore, MemStorage, PgStorage, S3BlobStore};
use esp_service::EspService;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Endereço de escuta; sobrepõe BIND_ADDR.
    #[arg(short, long)]
    pub bind: Option<String>,
}

pub async fn execute(config: Config, args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            let blobs =
                S3BlobStore::from_env(config.s3_endpoint.as_deref(), &config.s3_region).await;
            EspService::new(
                Arc::new(PgStorage::new(pool)),
                Arc::new(blobs),
                config.s3_bucket.clone(),
            )
        }
        None => {
            // Sem banco configurado: memória com carga inicial, uploads
            // inline.
            let store = Arc::new(MemStorage::new());
            esp_service::seed::seed_database(store.as_ref()).await?;
            EspService::new(
                store,
                Arc::new(MemBlobStore::new()),
                config.s3_bucket.clone(),
            )
            .com_uploads_inline()
        }
    };

    let app = app_router(AppState { service });
    let bind = args.bind.unwrap_or(config.bind_addr);
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
