use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registro de auditoria de uma ação de usuário.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAtividade {
    pub id: Uuid,
    pub user_id: Uuid,
    pub acao: String,
    pub alvo: String,
    pub detalhes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoLog {
    pub user_id: Uuid,
    pub acao: String,
    pub alvo: String,
    pub detalhes: Option<String>,
}

impl NovoLog {
    pub fn new(
        user_id: Uuid,
        acao: impl Into<String>,
        alvo: impl Into<String>,
        detalhes: impl Into<String>,
    ) -> NovoLog {
        NovoLog {
            user_id,
            acao: acao.into(),
            alvo: alvo.into(),
            detalhes: Some(detalhes.into()),
        }
    }
}
