use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use esp_core::models::{
    AtualizaCaderno, Caderno, NovoCaderno, NovoLog, StatusCaderno, UsuarioPublico,
};
use esp_db::store::{montar_caderno, FiltroCadernos};
use esp_db::Storage;

use crate::error::{erro, erro_de_storage, ApiResult};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FiltrosCadernoQuery {
    pub status: Option<StatusCaderno>,
    pub autor: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CadernoComAutor {
    #[serde(flatten)]
    caderno: Caderno,
    autor: Option<UsuarioPublico>,
}

pub async fn listar(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Query(filtros): Query<FiltrosCadernoQuery>,
) -> ApiResult<Json<Value>> {
    let store = &state.service.store;
    let cadernos = store
        .list_cadernos(FiltroCadernos {
            status: filtros.status,
            autor_id: filtros.autor,
        })
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar cadernos"))?;

    let mut com_autor = Vec::with_capacity(cadernos.len());
    for caderno in cadernos {
        let autor = store
            .get_usuario_publico(caderno.autor_id)
            .await
            .map_err(|e| erro_de_storage(e, "Erro ao buscar cadernos"))?;
        com_autor.push(CadernoComAutor { caderno, autor });
    }
    Ok(Json(json!({ "cadernos": com_autor })))
}

pub async fn buscar(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let store = &state.service.store;
    let caderno = store
        .get_caderno(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar caderno"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "Caderno não encontrado"))?;
    let autor = store
        .get_usuario_publico(caderno.autor_id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar caderno"))?;
    Ok(Json(json!({ "caderno": CadernoComAutor { caderno, autor } })))
}

pub async fn criar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Json(novo): Json<NovoCaderno>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    exigir_perfil(usuario.perfil, permissoes::CRIAR_CADERNO)?;
    let store = &state.service.store;

    let caderno = store
        .create_caderno(montar_caderno(novo, usuario.id, Utc::now()))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar caderno"))?;

    store
        .create_log(NovoLog::new(
            usuario.id,
            "CRIAR_CADERNO",
            caderno.id.to_string(),
            format!("Caderno \"{}\" criado", caderno.titulo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar caderno"))?;
    tracing::info!(caderno_id = %caderno.id, user_id = %usuario.id, "Caderno created");

    Ok((StatusCode::CREATED, Json(json!({ "caderno": caderno }))))
}

pub async fn atualizar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
    Json(patch): Json<AtualizaCaderno>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::EDITAR_CADERNO)?;

    // Mudança de status exige o conjunto de perfis próprio.
    if patch.status.is_some()
        && exigir_perfil(usuario.perfil, permissoes::MUDAR_STATUS_CADERNO).is_err()
    {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Acesso negado",
                "message": "Perfil não pode alterar status",
            })),
        ));
    }

    let store = &state.service.store;
    let caderno = store
        .update_caderno(id, patch)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao atualizar caderno"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "Caderno não encontrado"))?;

    store
        .create_log(NovoLog::new(
            usuario.id,
            "ATUALIZAR_CADERNO",
            caderno.id.to_string(),
            format!("Caderno \"{}\" atualizado", caderno.titulo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao atualizar caderno"))?;
    tracing::info!(caderno_id = %caderno.id, user_id = %usuario.id, "Caderno updated");

    Ok(Json(json!({ "caderno": caderno })))
}

pub async fn deletar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::DELETAR_CADERNO)?;
    let store = &state.service.store;

    let caderno = store
        .get_caderno(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar caderno"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "Caderno não encontrado"))?;

    let deletado = store
        .delete_caderno(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar caderno"))?;
    if !deletado {
        return Err(erro(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Erro ao deletar caderno",
        ));
    }

    store
        .create_log(NovoLog::new(
            usuario.id,
            "DELETAR_CADERNO",
            id.to_string(),
            format!("Caderno \"{}\" deletado", caderno.titulo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar caderno"))?;
    tracing::info!(caderno_id = %id, user_id = %usuario.id, "Caderno deleted");

    Ok(Json(json!({ "message": "Caderno deletado com sucesso" })))
}
