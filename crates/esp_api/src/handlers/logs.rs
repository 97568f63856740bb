use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use esp_db::Storage;

use crate::error::{erro_de_storage, ApiResult};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FiltroLogsQuery {
    pub usuario: Option<Uuid>,
}

pub async fn listar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Query(filtro): Query<FiltroLogsQuery>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::VER_LOGS)?;
    let logs = state
        .service
        .store
        .list_logs(filtro.usuario)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao listar logs"))?;
    Ok(Json(json!({ "logs": logs })))
}
