//! Identidade da requisição.
//!
//! A emissão e validação de tokens fica fora deste sistema; a API confia
//! no cabeçalho `x-user-id` preenchido pela camada de autenticação e
//! apenas carrega e valida o usuário correspondente.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use uuid::Uuid;

use esp_core::models::Usuario;
use esp_db::Storage;

use crate::error::{erro, Rejeicao};
use crate::state::AppState;

pub struct UsuarioAtual(pub Usuario);

fn nao_autenticado() -> Rejeicao {
    erro(StatusCode::UNAUTHORIZED, "Não autenticado")
}

impl FromRequestParts<AppState> for UsuarioAtual {
    type Rejection = Rejeicao;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bruto = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(nao_autenticado)?;
        let id = Uuid::parse_str(bruto).map_err(|_| nao_autenticado())?;

        let usuario = state
            .service
            .store
            .get_usuario(id)
            .await
            .map_err(|e| {
                tracing::error!(erro = %e, "Error loading request user");
                erro(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
            })?
            .ok_or_else(nao_autenticado)?;

        if !usuario.ativo {
            return Err(nao_autenticado());
        }
        Ok(UsuarioAtual(usuario))
    }
}
