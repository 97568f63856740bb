use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Classificação de selo visual de uma ESP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selo {
    Ambiental,
    Nenhum,
}

impl Selo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selo::Ambiental => "AMBIENTAL",
            Selo::Nenhum => "NENHUM",
        }
    }
}

impl fmt::Display for Selo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AMBIENTAL" => Ok(Selo::Ambiental),
            "NENHUM" => Ok(Selo::Nenhum),
            other => Err(format!("selo desconhecido: {}", other)),
        }
    }
}

/// Campos de seção compartilhados entre ESPs e Cadernos: os textos livres
/// e as listas de IDs de catálogo pareadas a cada seção.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConteudoSecoes {
    pub descricao_aplicacao: Option<String>,
    pub execucao: Option<String>,
    pub fichas_referencia: Option<String>,
    pub recebimento: Option<String>,
    pub servicos_incluidos: Option<String>,
    pub criterios_medicao: Option<String>,
    pub legislacao: Option<String>,
    pub referencias: Option<String>,
    pub introduzir_componente: Option<String>,
    #[serde(default)]
    pub constituintes_ids: Vec<Uuid>,
    #[serde(default)]
    pub acessorios_ids: Vec<Uuid>,
    #[serde(default)]
    pub acabamentos_ids: Vec<Uuid>,
    #[serde(default)]
    pub prototipos_ids: Vec<Uuid>,
    #[serde(default)]
    pub aplicacoes_ids: Vec<Uuid>,
    #[serde(default)]
    pub constituintes_execucao_ids: Vec<Uuid>,
    #[serde(default)]
    pub fichas_referencia_ids: Vec<Uuid>,
    #[serde(default)]
    pub fichas_recebimento_ids: Vec<Uuid>,
    #[serde(default)]
    pub servicos_incluidos_ids: Vec<Uuid>,
}

/// Atualização parcial dos campos de seção. `None` preserva o valor atual.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSecoes {
    pub descricao_aplicacao: Option<String>,
    pub execucao: Option<String>,
    pub fichas_referencia: Option<String>,
    pub recebimento: Option<String>,
    pub servicos_incluidos: Option<String>,
    pub criterios_medicao: Option<String>,
    pub legislacao: Option<String>,
    pub referencias: Option<String>,
    pub introduzir_componente: Option<String>,
    pub constituintes_ids: Option<Vec<Uuid>>,
    pub acessorios_ids: Option<Vec<Uuid>>,
    pub acabamentos_ids: Option<Vec<Uuid>>,
    pub prototipos_ids: Option<Vec<Uuid>>,
    pub aplicacoes_ids: Option<Vec<Uuid>>,
    pub constituintes_execucao_ids: Option<Vec<Uuid>>,
    pub fichas_referencia_ids: Option<Vec<Uuid>>,
    pub fichas_recebimento_ids: Option<Vec<Uuid>>,
    pub servicos_incluidos_ids: Option<Vec<Uuid>>,
}

impl ConteudoSecoes {
    pub fn aplicar(&mut self, patch: PatchSecoes) {
        macro_rules! aplica {
            ($($campo:ident),* $(,)?) => {
                $(if let Some(v) = patch.$campo { self.$campo = Some(v); })*
            };
        }
        macro_rules! aplica_ids {
            ($($campo:ident),* $(,)?) => {
                $(if let Some(v) = patch.$campo { self.$campo = v; })*
            };
        }
        aplica!(
            descricao_aplicacao,
            execucao,
            fichas_referencia,
            recebimento,
            servicos_incluidos,
            criterios_medicao,
            legislacao,
            referencias,
            introduzir_componente,
        );
        aplica_ids!(
            constituintes_ids,
            acessorios_ids,
            acabamentos_ids,
            prototipos_ids,
            aplicacoes_ids,
            constituintes_execucao_ids,
            fichas_referencia_ids,
            fichas_recebimento_ids,
            servicos_incluidos_ids,
        );
    }
}

/// Documento exportável de especificação técnica.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Esp {
    pub id: Uuid,
    pub codigo: String,
    pub titulo: String,
    pub tipologia: String,
    pub revisao: String,
    pub data_publicacao: DateTime<Utc>,
    pub autor_id: Uuid,
    pub selo: Selo,
    pub visivel: bool,
    /// Cadernos referenciados, na ordem em que devem ser agregados.
    #[serde(default)]
    pub cadernos_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub secoes: ConteudoSecoes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoEsp {
    pub codigo: String,
    pub titulo: String,
    pub tipologia: String,
    pub revisao: String,
    pub data_publicacao: DateTime<Utc>,
    pub selo: Option<Selo>,
    pub visivel: Option<bool>,
    #[serde(default)]
    pub cadernos_ids: Vec<Uuid>,
    #[serde(flatten)]
    pub secoes: ConteudoSecoes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtualizaEsp {
    pub codigo: Option<String>,
    pub titulo: Option<String>,
    pub tipologia: Option<String>,
    pub revisao: Option<String>,
    pub data_publicacao: Option<DateTime<Utc>>,
    pub selo: Option<Selo>,
    pub visivel: Option<bool>,
    pub cadernos_ids: Option<Vec<Uuid>>,
    #[serde(flatten)]
    pub secoes: PatchSecoes,
}

impl Esp {
    pub fn aplicar(&mut self, patch: AtualizaEsp, agora: DateTime<Utc>) {
        if let Some(v) = patch.codigo {
            self.codigo = v;
        }
        if let Some(v) = patch.titulo {
            self.titulo = v;
        }
        if let Some(v) = patch.tipologia {
            self.tipologia = v;
        }
        if let Some(v) = patch.revisao {
            self.revisao = v;
        }
        if let Some(v) = patch.data_publicacao {
            self.data_publicacao = v;
        }
        if let Some(v) = patch.selo {
            self.selo = v;
        }
        if let Some(v) = patch.visivel {
            self.visivel = v;
        }
        if let Some(v) = patch.cadernos_ids {
            self.cadernos_ids = v;
        }
        self.secoes.aplicar(patch.secoes);
        self.updated_at = agora;
    }
}
