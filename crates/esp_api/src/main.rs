//! Servidor de desenvolvimento: backend em memória com carga inicial.
//! O binário de produção (Postgres + S3) é o `serve` da CLI.

use std::sync::Arc;

use tokio::net::TcpListener;

use esp_api::routes::app_router;
use esp_api::state::AppState;
use esp_core::models::BUCKET_PADRAO;
use esp_db::{MemBlobStore, MemStorage};
use esp_service::EspService;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let store = Arc::new(MemStorage::new());
    let blobs = Arc::new(MemBlobStore::new());
    let service = EspService::new(store.clone(), blobs, BUCKET_PADRAO.to_string())
        .com_uploads_inline();

    esp_service::seed::seed_database(store.as_ref())
        .await
        .expect("seed inicial");

    let app = app_router(AppState { service });

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
