use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use esp_core::models::{
    ArquivoMeta, AtualizaEsp, Caderno, DonoArquivo, Esp, NovoEsp, NovoLog, UsuarioPublico,
};
use esp_db::store::{montar_esp, FiltroEsps};
use esp_db::Storage;

use crate::error::{erro, erro_de_storage, ApiResult};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltrosEspQuery {
    pub caderno_id: Option<Uuid>,
    pub visivel: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EspComRelacoes {
    #[serde(flatten)]
    esp: Esp,
    autor: Option<UsuarioPublico>,
    cadernos: Vec<Caderno>,
    arquivos: Vec<ArquivoMeta>,
}

async fn com_relacoes(state: &AppState, esp: Esp) -> Result<EspComRelacoes, esp_db::Error> {
    let store = &state.service.store;
    let (autor, cadernos, arquivos) = tokio::try_join!(
        store.get_usuario_publico(esp.autor_id),
        store.get_cadernos(&esp.cadernos_ids),
        store.list_arquivos_por_dono(DonoArquivo::Esp(esp.id)),
    )?;
    Ok(EspComRelacoes {
        esp,
        autor,
        cadernos,
        arquivos,
    })
}

pub async fn listar(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Query(filtros): Query<FiltrosEspQuery>,
) -> ApiResult<Json<Value>> {
    let esps = state
        .service
        .store
        .list_esps(FiltroEsps {
            caderno_id: filtros.caderno_id,
            visivel: filtros.visivel,
        })
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar ESPs"))?;

    let mut com_relacoes_lista = Vec::with_capacity(esps.len());
    for esp in esps {
        com_relacoes_lista.push(
            com_relacoes(&state, esp)
                .await
                .map_err(|e| erro_de_storage(e, "Erro ao buscar ESPs"))?,
        );
    }
    Ok(Json(json!({ "esps": com_relacoes_lista })))
}

pub async fn buscar(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let esp = state
        .service
        .store
        .get_esp(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar ESP"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "ESP não encontrada"))?;
    let completo = com_relacoes(&state, esp)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao buscar ESP"))?;
    Ok(Json(json!({ "esp": completo })))
}

pub async fn criar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Json(novo): Json<NovoEsp>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    exigir_perfil(usuario.perfil, permissoes::CRIAR_ESP)?;
    let store = &state.service.store;

    // Todos os Cadernos referenciados precisam existir.
    for caderno_id in &novo.cadernos_ids {
        let existe = store
            .get_caderno(*caderno_id)
            .await
            .map_err(|e| erro_de_storage(e, "Erro ao criar ESP"))?
            .is_some();
        if !existe {
            return Err(erro(StatusCode::NOT_FOUND, "Caderno não encontrado"));
        }
    }

    let esp = store
        .create_esp(montar_esp(novo, usuario.id, Utc::now()))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar ESP"))?;

    store
        .create_log(NovoLog::new(
            usuario.id,
            "CRIAR_ESP",
            esp.id.to_string(),
            format!("ESP \"{}\" criada", esp.codigo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar ESP"))?;
    tracing::info!(esp_id = %esp.id, user_id = %usuario.id, "ESP created");

    Ok((StatusCode::CREATED, Json(json!({ "esp": esp }))))
}

pub async fn atualizar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
    Json(patch): Json<AtualizaEsp>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::EDITAR_ESP)?;
    let store = &state.service.store;

    let esp = store
        .update_esp(id, patch)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao atualizar ESP"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "ESP não encontrada"))?;

    store
        .create_log(NovoLog::new(
            usuario.id,
            "ATUALIZAR_ESP",
            esp.id.to_string(),
            format!("ESP \"{}\" atualizada", esp.codigo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao atualizar ESP"))?;
    tracing::info!(esp_id = %esp.id, user_id = %usuario.id, "ESP updated");

    Ok(Json(json!({ "esp": esp })))
}

pub async fn deletar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::DELETAR_ESP)?;
    let store = &state.service.store;

    let esp = store
        .get_esp(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar ESP"))?
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "ESP não encontrada"))?;

    let deletada = store
        .delete_esp(id)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar ESP"))?;
    if !deletada {
        return Err(erro(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao deletar ESP"));
    }

    store
        .create_log(NovoLog::new(
            usuario.id,
            "DELETAR_ESP",
            id.to_string(),
            format!("ESP \"{}\" deletada", esp.codigo),
        ))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao deletar ESP"))?;
    tracing::info!(esp_id = %id, user_id = %usuario.id, "ESP deleted");

    Ok(Json(json!({ "message": "ESP deletada com sucesso" })))
}
