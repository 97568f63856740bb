use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket usado quando o ponteiro externo não nomeia um (forma legada de
/// duas partes).
pub const BUCKET_PADRAO: &str = "esp_files";

const MARCADOR_EXTERNO: &str = "blob";

/// Ponteiro de armazenamento de um arquivo anexado.
///
/// A forma persistida é uma string em um de três formatos:
/// - payload base64 puro (conteúdo inline);
/// - `blob:<bucket>:<objeto>` (referência externa com bucket nomeado);
/// - `blob:<objeto>` (forma legada, bucket padrão `esp_files`).
///
/// A decisão inline/externo é tomada uma única vez, aqui, no momento do
/// parse; os consumidores trabalham apenas com as variantes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ponteiro {
    /// Payload codificado em base64, armazenado junto ao registro.
    Inline(String),
    /// Referência opaca para o armazenamento externo de blobs.
    Externo { bucket: String, objeto: String },
}

impl Ponteiro {
    pub fn parse(raw: &str) -> Ponteiro {
        match raw.strip_prefix(MARCADOR_EXTERNO).and_then(|r| r.strip_prefix(':')) {
            Some(resto) => match resto.split_once(':') {
                Some((bucket, objeto)) => Ponteiro::Externo {
                    bucket: bucket.to_string(),
                    objeto: objeto.to_string(),
                },
                None => Ponteiro::Externo {
                    bucket: BUCKET_PADRAO.to_string(),
                    objeto: resto.to_string(),
                },
            },
            None => Ponteiro::Inline(raw.to_string()),
        }
    }

    pub fn externo(bucket: impl Into<String>, objeto: impl Into<String>) -> Ponteiro {
        Ponteiro::Externo {
            bucket: bucket.into(),
            objeto: objeto.into(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Ponteiro::Inline(_))
    }
}

impl fmt::Display for Ponteiro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ponteiro::Inline(dados) => f.write_str(dados),
            Ponteiro::Externo { bucket, objeto } => {
                write!(f, "{}:{}:{}", MARCADOR_EXTERNO, bucket, objeto)
            }
        }
    }
}

impl From<String> for Ponteiro {
    fn from(raw: String) -> Self {
        Ponteiro::parse(&raw)
    }
}

impl From<Ponteiro> for String {
    fn from(p: Ponteiro) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_puro_vira_inline() {
        let p = Ponteiro::parse("aGVsbG8=");
        assert_eq!(p, Ponteiro::Inline("aGVsbG8=".to_string()));
    }

    #[test]
    fn tres_partes_usa_bucket_nomeado() {
        let p = Ponteiro::parse("blob:projetos:abc123");
        assert_eq!(p, Ponteiro::externo("projetos", "abc123"));
    }

    #[test]
    fn duas_partes_usa_bucket_padrao() {
        let p = Ponteiro::parse("blob:abc123");
        assert_eq!(p, Ponteiro::externo(BUCKET_PADRAO, "abc123"));
    }

    #[test]
    fn round_trip_da_forma_persistida() {
        for raw in ["aGVsbG8=", "blob:projetos:abc123"] {
            assert_eq!(Ponteiro::parse(raw).to_string(), raw);
        }
        // A forma legada é normalizada para o bucket padrão explícito.
        assert_eq!(
            Ponteiro::parse("blob:abc123").to_string(),
            "blob:esp_files:abc123"
        );
    }
}
