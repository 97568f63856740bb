use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use esp_core::models::{Categoria, NovoItemCatalogo};
use esp_db::store::montar_item;
use esp_db::Storage;

use crate::error::{erro, erro_de_storage, ApiResult};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

fn categoria_da_rota(segmento: &str) -> Result<Categoria, crate::error::Rejeicao> {
    Categoria::from_rota(segmento)
        .ok_or_else(|| erro(StatusCode::NOT_FOUND, "Categoria desconhecida"))
}

pub async fn listar(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(segmento): Path<String>,
) -> ApiResult<Json<Value>> {
    let categoria = categoria_da_rota(&segmento)?;
    let itens = state
        .service
        .store
        .list_itens_por_categoria(categoria)
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao listar itens do catálogo"))?;
    Ok(Json(json!({ "itens": itens })))
}

pub async fn criar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(segmento): Path<String>,
    Json(novo): Json<NovoItemCatalogo>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    exigir_perfil(usuario.perfil, permissoes::CRIAR_ITEM_CATALOGO)?;
    let categoria = categoria_da_rota(&segmento)?;
    let store = &state.service.store;

    let existente = store
        .get_item_por_nome(categoria, &novo.nome, novo.marca.as_deref())
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar item do catálogo"))?;
    if existente.is_some() {
        return Err(erro(StatusCode::CONFLICT, "Item já existe"));
    }

    let item = store
        .create_item(montar_item(novo, categoria, Utc::now()))
        .await
        .map_err(|e| erro_de_storage(e, "Erro ao criar item do catálogo"))?;
    tracing::info!(item_id = %item.id, categoria = categoria.as_str(), "Catalog item created");

    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}
