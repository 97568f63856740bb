use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use esp_service::ServiceError;

/// Rejeição padrão da API: status HTTP mais payload `{"error": ...}`.
pub type Rejeicao = (StatusCode, Json<Value>);

pub type ApiResult<T> = Result<T, Rejeicao>;

pub fn erro(status: StatusCode, mensagem: &str) -> Rejeicao {
    (status, Json(json!({ "error": mensagem })))
}

/// Traduz erros do serviço para a borda HTTP. Erros internos não vazam
/// detalhes: vão para o log e o cliente recebe a mensagem genérica dada.
pub fn erro_do_servico(e: ServiceError, mensagem_interna: &str) -> Rejeicao {
    match e {
        ServiceError::NotFound(mensagem) => erro(StatusCode::NOT_FOUND, &mensagem),
        ServiceError::Upload(mensagem) => erro(StatusCode::BAD_REQUEST, &mensagem),
        outro => {
            tracing::error!(erro = %outro, "Internal error");
            erro(StatusCode::INTERNAL_SERVER_ERROR, mensagem_interna)
        }
    }
}

pub fn erro_de_storage(e: esp_db::Error, mensagem_interna: &str) -> Rejeicao {
    tracing::error!(erro = %e, "Storage error");
    erro(StatusCode::INTERNAL_SERVER_ERROR, mensagem_interna)
}
