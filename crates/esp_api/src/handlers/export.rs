use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use esp_service::Exportado;

use crate::error::{erro_do_servico, ApiResult};
use crate::extract::UsuarioAtual;
use crate::rbac::{exigir_perfil, permissoes};
use crate::state::AppState;

fn resposta_arquivo(exportado: Exportado) -> Response {
    (
        [
            (header::CONTENT_TYPE, exportado.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", exportado.filename),
            ),
        ],
        exportado.bytes,
    )
        .into_response()
}

pub async fn export_pdf(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(esp_id): Path<Uuid>,
) -> ApiResult<Response> {
    exigir_perfil(usuario.perfil, permissoes::EXPORTAR_PDF)?;
    state
        .service
        .export_esp_pdf(esp_id, usuario.id)
        .await
        .map(resposta_arquivo)
        .map_err(|e| erro_do_servico(e, "Erro ao exportar PDF"))
}

pub async fn export_docx(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(esp_id): Path<Uuid>,
) -> ApiResult<Response> {
    exigir_perfil(usuario.perfil, permissoes::EXPORTAR_DOCX)?;
    state
        .service
        .export_esp_docx(esp_id, usuario.id)
        .await
        .map(resposta_arquivo)
        .map_err(|e| erro_do_servico(e, "Erro ao exportar DOCX"))
}

pub async fn export_caderno_pdf(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(caderno_id): Path<Uuid>,
) -> ApiResult<Response> {
    exigir_perfil(usuario.perfil, permissoes::EXPORTAR_PDF)?;
    state
        .service
        .export_caderno_pdf(caderno_id, usuario.id)
        .await
        .map(resposta_arquivo)
        .map_err(|e| erro_do_servico(e, "Erro ao exportar PDF"))
}

pub async fn export_caderno_docx(
    State(state): State<AppState>,
    UsuarioAtual(usuario): UsuarioAtual,
    Path(caderno_id): Path<Uuid>,
) -> ApiResult<Response> {
    exigir_perfil(usuario.perfil, permissoes::EXPORTAR_DOCX)?;
    state
        .service
        .export_caderno_docx(caderno_id, usuario.id)
        .await
        .map(resposta_arquivo)
        .map_err(|e| erro_do_servico(e, "Erro ao exportar DOCX"))
}
