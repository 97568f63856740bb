use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{self, arquivos, cadernos, catalogo, esps, export, logs};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Exportação
        .route("/api/export/pdf/{esp_id}", post(export::export_pdf))
        .route("/api/export/docx/{esp_id}", post(export::export_docx))
        .route(
            "/api/export/pdf-caderno/{caderno_id}",
            post(export::export_caderno_pdf),
        )
        .route(
            "/api/export/docx-caderno/{caderno_id}",
            post(export::export_caderno_docx),
        )
        // ESPs
        .route("/api/esp", get(esps::listar).post(esps::criar))
        .route(
            "/api/esp/{id}",
            get(esps::buscar).patch(esps::atualizar).delete(esps::deletar),
        )
        .route("/api/esp/{id}/arquivos", get(arquivos::listar_por_esp))
        // Cadernos
        .route("/api/cadernos", get(cadernos::listar).post(cadernos::criar))
        .route(
            "/api/cadernos/{id}",
            get(cadernos::buscar)
                .patch(cadernos::atualizar)
                .delete(cadernos::deletar),
        )
        .route(
            "/api/cadernos/{id}/arquivos",
            get(arquivos::listar_por_caderno),
        )
        // Catálogo
        .route(
            "/api/catalogo/{categoria}",
            get(catalogo::listar).post(catalogo::criar),
        )
        // Arquivos
        .route("/api/arquivos/upload", post(arquivos::upload))
        .route("/api/arquivos/{id}/download", get(arquivos::download))
        .route("/api/arquivos/{id}/stream", get(arquivos::stream))
        .route("/api/arquivos/{id}", delete(arquivos::deletar))
        // Logs
        .route("/api/logs", get(logs::listar))
        .with_state(state)
}
