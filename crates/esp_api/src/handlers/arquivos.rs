use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use esp_core::models::DonoArquivo;
use esp_db::Storage;
use esp_service::arquivos::NovoUpload;

use crate::error::{erro, erro_de_storage, erro_do_servico, ApiResult, Rejeicao};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

struct UploadRecebido {
    dono: Option<DonoArquivo>,
    arquivos: Vec<(String, String, Vec<u8>)>,
}

async fn ler_multipart(mut multipart: Multipart) -> Result<UploadRecebido, Rejeicao> {
    let mut recebido = UploadRecebido {
        dono: None,
        arquivos: Vec::new(),
    };
    while let Some(campo) = multipart
        .next_field()
        .await
        .map_err(|_| erro(StatusCode::BAD_REQUEST, "Upload inválido"))?
    {
        match campo.name().unwrap_or_default() {
            "espId" => {
                let id = campo
                    .text()
                    .await
                    .ok()
                    .and_then(|v| Uuid::parse_str(&v).ok())
                    .ok_or_else(|| erro(StatusCode::BAD_REQUEST, "ESP ID inválido"))?;
                recebido.dono = Some(DonoArquivo::Esp(id));
            }
            "cadernoId" => {
                let id = campo
                    .text()
                    .await
                    .ok()
                    .and_then(|v| Uuid::parse_str(&v).ok())
                    .ok_or_else(|| erro(StatusCode::BAD_REQUEST, "Caderno ID inválido"))?;
                recebido.dono = Some(DonoArquivo::Caderno(id));
            }
            "files" => {
                let filename = campo.file_name().unwrap_or("arquivo").to_string();
                let content_type = campo
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = campo
                    .bytes()
                    .await
                    .map_err(|_| erro(StatusCode::BAD_REQUEST, "Upload inválido"))?;
                recebido.arquivos.push((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }
    Ok(recebido)
}

pub async fn upload(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    exigir_perfil(usuario.perfil, permissoes::CRIAR_ESP)?;

    let recebido = ler_multipart(multipart).await?;
    let dono = recebido
        .dono
        .ok_or_else(|| erro(StatusCode::BAD_REQUEST, "ESP ID é obrigatório"))?;
    if recebido.arquivos.is_empty() {
        return Err(erro(StatusCode::BAD_REQUEST, "Nenhum arquivo enviado"));
    }

    // O documento dono precisa existir antes de aceitar os bytes.
    let store = &state.service.store;
    let dono_existe = match dono {
        DonoArquivo::Esp(id) => store
            .get_esp(id)
            .await
            .map_err(|e| erro_de_storage(e, "Erro ao fazer upload de arquivos"))?
            .is_some(),
        DonoArquivo::Caderno(id) => store
            .get_caderno(id)
            .await
            .map_err(|e| erro_de_storage(e, "Erro ao fazer upload de arquivos"))?
            .is_some(),
    };
    if !dono_existe {
        return Err(erro(StatusCode::NOT_FOUND, "Documento não encontrado"));
    }

    let mut enviados = Vec::with_capacity(recebido.arquivos.len());
    for (filename, content_type, bytes) in recebido.arquivos {
        let meta = state
            .service
            .upload_arquivo(
                NovoUpload {
                    dono,
                    filename,
                    content_type,
                    bytes,
                },
                usuario.id,
            )
            .await
            .map_err(|e| erro_do_servico(e, "Erro ao fazer upload de arquivos"))?;
        enviados.push(meta);
    }

    Ok((StatusCode::CREATED, Json(json!({ "files": enviados }))))
}

pub async fn listar_por_esp(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(esp_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let arquivos = state
        .service
        .list_arquivos(DonoArquivo::Esp(esp_id))
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao listar arquivos"))?;
    Ok(Json(json!({ "files": arquivos })))
}

pub async fn listar_por_caderno(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(caderno_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let arquivos = state
        .service
        .list_arquivos(DonoArquivo::Caderno(caderno_id))
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao listar arquivos"))?;
    Ok(Json(json!({ "files": arquivos })))
}

pub async fn download(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let arquivo = state
        .service
        .get_arquivo(id)
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao baixar arquivo"))?;
    let bytes = state
        .service
        .bytes_do_arquivo(&arquivo)
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao baixar arquivo"))?;
    Ok((
        [
            (header::CONTENT_TYPE, arquivo.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", arquivo.filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Entrega os bytes sem `Content-Disposition`, para pré-visualização.
pub async fn stream(
    State(state): State<AppState>,
    UsuarioAtual(_usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let arquivo = state
        .service
        .get_arquivo(id)
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao carregar arquivo"))?;
    let bytes = state
        .service
        .bytes_do_arquivo(&arquivo)
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao carregar arquivo"))?;
    Ok(([(header::CONTENT_TYPE, arquivo.content_type.clone())], bytes).into_response())
}

pub async fn deletar(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    exigir_perfil(usuario.perfil, permissoes::CRIAR_ESP)?;
    state
        .service
        .delete_arquivo(id, usuario.id)
        .await
        .map_err(|e| erro_do_servico(e, "Erro ao deletar arquivo"))?;
    Ok(Json(json!({ "success": true })))
}
