pub mod arquivos;
pub mod cadernos;
pub mod catalogo;
pub mod esps;
pub mod export;
pub mod logs;

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
