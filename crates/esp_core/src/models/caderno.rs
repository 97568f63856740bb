use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::esp::{ConteudoSecoes, PatchSecoes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCaderno {
    Obsoleto,
    EmAndamento,
    Aprovado,
}

impl StatusCaderno {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCaderno::Obsoleto => "OBSOLETO",
            StatusCaderno::EmAndamento => "EM_ANDAMENTO",
            StatusCaderno::Aprovado => "APROVADO",
        }
    }
}

impl fmt::Display for StatusCaderno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCaderno {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OBSOLETO" => Ok(StatusCaderno::Obsoleto),
            "EM_ANDAMENTO" => Ok(StatusCaderno::EmAndamento),
            "APROVADO" => Ok(StatusCaderno::Aprovado),
            other => Err(format!("status de caderno desconhecido: {}", other)),
        }
    }
}

/// Caderno de especificação reutilizável. Várias ESPs podem referenciar o
/// mesmo Caderno; os ciclos de vida são independentes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caderno {
    pub id: Uuid,
    pub titulo: String,
    pub descricao: Option<String>,
    pub status: StatusCaderno,
    pub autor_id: Uuid,
    #[serde(flatten)]
    pub secoes: ConteudoSecoes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoCaderno {
    pub titulo: String,
    pub descricao: Option<String>,
    pub status: Option<StatusCaderno>,
    #[serde(flatten)]
    pub secoes: ConteudoSecoes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtualizaCaderno {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub status: Option<StatusCaderno>,
    #[serde(flatten)]
    pub secoes: PatchSecoes,
}

impl Caderno {
    pub fn aplicar(&mut self, patch: AtualizaCaderno, agora: DateTime<Utc>) {
        if let Some(v) = patch.titulo {
            self.titulo = v;
        }
        if let Some(v) = patch.descricao {
            self.descricao = Some(v);
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.secoes.aplicar(patch.secoes);
        self.updated_at = agora;
    }
}
