use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ponteiro::Ponteiro;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoArquivo {
    Imagem,
    Pdf,
    Docx,
}

impl TipoArquivo {
    /// Classifica um arquivo a partir do content-type declarado no upload.
    pub fn from_content_type(content_type: &str) -> TipoArquivo {
        if content_type.starts_with("image/") {
            TipoArquivo::Imagem
        } else if content_type == "application/pdf" {
            TipoArquivo::Pdf
        } else {
            TipoArquivo::Docx
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TipoArquivo::Imagem => "IMAGEM",
            TipoArquivo::Pdf => "PDF",
            TipoArquivo::Docx => "DOCX",
        }
    }
}

impl std::str::FromStr for TipoArquivo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMAGEM" => Ok(TipoArquivo::Imagem),
            "PDF" => Ok(TipoArquivo::Pdf),
            "DOCX" => Ok(TipoArquivo::Docx),
            other => Err(format!("tipo de arquivo desconhecido: {}", other)),
        }
    }
}

/// Documento dono de um anexo. Um arquivo pertence a exatamente uma ESP
/// ou a exatamente um Caderno, nunca a ambos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonoArquivo {
    Esp(Uuid),
    Caderno(Uuid),
}

impl DonoArquivo {
    pub fn id(&self) -> Uuid {
        match self {
            DonoArquivo::Esp(id) | DonoArquivo::Caderno(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArquivoMidia {
    pub id: Uuid,
    pub dono: DonoArquivo,
    pub tipo: TipoArquivo,
    pub filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub ponteiro: Ponteiro,
    pub created_at: DateTime<Utc>,
}

/// Metadados de um anexo, sem o ponteiro (listagens não materializam
/// payloads inline).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArquivoMeta {
    pub id: Uuid,
    pub dono: DonoArquivo,
    pub tipo: TipoArquivo,
    pub filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&ArquivoMidia> for ArquivoMeta {
    fn from(a: &ArquivoMidia) -> Self {
        ArquivoMeta {
            id: a.id,
            dono: a.dono,
            tipo: a.tipo,
            filename: a.filename.clone(),
            content_type: a.content_type.clone(),
            file_size: a.file_size,
            created_at: a.created_at,
        }
    }
}
