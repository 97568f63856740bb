use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categorias fixas do catálogo de itens reutilizáveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Categoria {
    Constituinte,
    Acessorio,
    Acabamento,
    PrototipoComercial,
    Aplicacao,
    FichaRecebimento,
    ServicoIncluido,
    FichaReferencia,
}

impl Categoria {
    pub fn as_str(&self) -> &'static str {
        match self {
            Categoria::Constituinte => "CONSTITUINTE",
            Categoria::Acessorio => "ACESSORIO",
            Categoria::Acabamento => "ACABAMENTO",
            Categoria::PrototipoComercial => "PROTOTIPO_COMERCIAL",
            Categoria::Aplicacao => "APLICACAO",
            Categoria::FichaRecebimento => "FICHA_RECEBIMENTO",
            Categoria::ServicoIncluido => "SERVICO_INCLUIDO",
            Categoria::FichaReferencia => "FICHA_REFERENCIA",
        }
    }

    /// Resolve o segmento de rota usado pela API (`/api/catalogo/{segmento}`).
    pub fn from_rota(segmento: &str) -> Option<Categoria> {
        match segmento {
            "constituintes" => Some(Categoria::Constituinte),
            "acessorios" => Some(Categoria::Acessorio),
            "acabamentos" => Some(Categoria::Acabamento),
            "prototipos" => Some(Categoria::PrototipoComercial),
            "aplicacoes" => Some(Categoria::Aplicacao),
            "fichas-recebimento" => Some(Categoria::FichaRecebimento),
            "servicos-incluidos" => Some(Categoria::ServicoIncluido),
            "fichas-referencia" => Some(Categoria::FichaReferencia),
            _ => None,
        }
    }
}

impl fmt::Display for Categoria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Categoria {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONSTITUINTE" => Ok(Categoria::Constituinte),
            "ACESSORIO" => Ok(Categoria::Acessorio),
            "ACABAMENTO" => Ok(Categoria::Acabamento),
            "PROTOTIPO_COMERCIAL" => Ok(Categoria::PrototipoComercial),
            "APLICACAO" => Ok(Categoria::Aplicacao),
            "FICHA_RECEBIMENTO" => Ok(Categoria::FichaRecebimento),
            "SERVICO_INCLUIDO" => Ok(Categoria::ServicoIncluido),
            "FICHA_REFERENCIA" => Ok(Categoria::FichaReferencia),
            other => Err(format!("categoria desconhecida: {}", other)),
        }
    }
}

/// Entrada imutável do catálogo, referenciada por ID a partir das seções
/// de ESPs e Cadernos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCatalogo {
    pub id: Uuid,
    pub categoria: Categoria,
    pub nome: String,
    /// Rótulo secundário (marca), usado por protótipos comerciais.
    pub marca: Option<String>,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

impl ItemCatalogo {
    /// Rótulo de exibição usado nas listas com marcadores dos documentos.
    pub fn rotulo(&self) -> String {
        match &self.marca {
            Some(marca) => format!("{} - {}", self.nome, marca),
            None => self.nome.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoItemCatalogo {
    pub nome: String,
    pub marca: Option<String>,
    pub descricao: Option<String>,
}
