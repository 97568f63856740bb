//! Tabela única e ordenada das seções renderizáveis.
//!
//! O agregador e os dois renderizadores consomem esta mesma tabela, de
//! modo que a ordem das seções, os títulos exibidos e o pareamento
//! campo-texto/lista-de-catálogo não podem divergir entre as saídas PDF e
//! DOCX.

use uuid::Uuid;

use crate::models::{Categoria, ConteudoSecoes};

/// Campo de texto livre de uma seção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoTexto {
    DescricaoAplicacao,
    Execucao,
    FichasReferencia,
    Recebimento,
    ServicosIncluidos,
    CriteriosMedicao,
    Legislacao,
    Referencias,
}

/// Lista de IDs de catálogo pareada a uma seção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoIds {
    Constituintes,
    Acessorios,
    Acabamentos,
    Prototipos,
    Aplicacoes,
    ConstituintesExecucao,
    FichasReferencia,
    FichasRecebimento,
    ServicosIncluidos,
}

impl ConteudoSecoes {
    pub fn texto(&self, campo: CampoTexto) -> Option<&str> {
        let valor = match campo {
            CampoTexto::DescricaoAplicacao => &self.descricao_aplicacao,
            CampoTexto::Execucao => &self.execucao,
            CampoTexto::FichasReferencia => &self.fichas_referencia,
            CampoTexto::Recebimento => &self.recebimento,
            CampoTexto::ServicosIncluidos => &self.servicos_incluidos,
            CampoTexto::CriteriosMedicao => &self.criterios_medicao,
            CampoTexto::Legislacao => &self.legislacao,
            CampoTexto::Referencias => &self.referencias,
        };
        valor.as_deref()
    }

    pub fn ids(&self, campo: CampoIds) -> &[Uuid] {
        match campo {
            CampoIds::Constituintes => &self.constituintes_ids,
            CampoIds::Acessorios => &self.acessorios_ids,
            CampoIds::Acabamentos => &self.acabamentos_ids,
            CampoIds::Prototipos => &self.prototipos_ids,
            CampoIds::Aplicacoes => &self.aplicacoes_ids,
            CampoIds::ConstituintesExecucao => &self.constituintes_execucao_ids,
            CampoIds::FichasReferencia => &self.fichas_referencia_ids,
            CampoIds::FichasRecebimento => &self.fichas_recebimento_ids,
            CampoIds::ServicosIncluidos => &self.servicos_incluidos_ids,
        }
    }
}

/// Bloco de catálogo anexado ao texto livre de uma seção.
#[derive(Debug)]
pub struct BlocoCatalogo {
    /// Rótulo exibido antes da lista (sem os dois-pontos).
    pub rotulo: &'static str,
    pub categoria: Categoria,
    pub campo: CampoIds,
}

/// Uma entrada da tabela de seções.
#[derive(Debug)]
pub struct Secao {
    pub titulo: &'static str,
    pub campo: CampoTexto,
    pub blocos: &'static [BlocoCatalogo],
}

pub const SECOES: &[Secao] = &[
    Secao {
        titulo: "DESCRIÇÃO E APLICAÇÃO",
        campo: CampoTexto::DescricaoAplicacao,
        blocos: &[
            BlocoCatalogo {
                rotulo: "Constituintes",
                categoria: Categoria::Constituinte,
                campo: CampoIds::Constituintes,
            },
            BlocoCatalogo {
                rotulo: "Acessórios",
                categoria: Categoria::Acessorio,
                campo: CampoIds::Acessorios,
            },
            BlocoCatalogo {
                rotulo: "Acabamentos",
                categoria: Categoria::Acabamento,
                campo: CampoIds::Acabamentos,
            },
            BlocoCatalogo {
                rotulo: "Protótipo Comercial",
                categoria: Categoria::PrototipoComercial,
                campo: CampoIds::Prototipos,
            },
            BlocoCatalogo {
                rotulo: "Aplicação",
                categoria: Categoria::Aplicacao,
                campo: CampoIds::Aplicacoes,
            },
        ],
    },
    Secao {
        titulo: "EXECUÇÃO",
        campo: CampoTexto::Execucao,
        blocos: &[BlocoCatalogo {
            rotulo: "Constituintes (Execução)",
            categoria: Categoria::Constituinte,
            campo: CampoIds::ConstituintesExecucao,
        }],
    },
    Secao {
        titulo: "FICHAS DE REFERÊNCIA",
        campo: CampoTexto::FichasReferencia,
        blocos: &[BlocoCatalogo {
            rotulo: "Fichas de Referência",
            categoria: Categoria::FichaReferencia,
            campo: CampoIds::FichasReferencia,
        }],
    },
    Secao {
        titulo: "RECEBIMENTO",
        campo: CampoTexto::Recebimento,
        blocos: &[BlocoCatalogo {
            rotulo: "Fichas de Recebimento",
            categoria: Categoria::FichaRecebimento,
            campo: CampoIds::FichasRecebimento,
        }],
    },
    Secao {
        titulo: "SERVIÇOS INCLUÍDOS",
        campo: CampoTexto::ServicosIncluidos,
        blocos: &[BlocoCatalogo {
            rotulo: "Serviços da lista",
            categoria: Categoria::ServicoIncluido,
            campo: CampoIds::ServicosIncluidos,
        }],
    },
    Secao {
        titulo: "CRITÉRIOS DE MEDIÇÃO",
        campo: CampoTexto::CriteriosMedicao,
        blocos: &[],
    },
    Secao {
        titulo: "LEGISLAÇÃO",
        campo: CampoTexto::Legislacao,
        blocos: &[],
    },
    Secao {
        titulo: "REFERÊNCIAS",
        campo: CampoTexto::Referencias,
        blocos: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordem_fixa_das_secoes() {
        let titulos: Vec<&str> = SECOES.iter().map(|s| s.titulo).collect();
        assert_eq!(
            titulos,
            [
                "DESCRIÇÃO E APLICAÇÃO",
                "EXECUÇÃO",
                "FICHAS DE REFERÊNCIA",
                "RECEBIMENTO",
                "SERVIÇOS INCLUÍDOS",
                "CRITÉRIOS DE MEDIÇÃO",
                "LEGISLAÇÃO",
                "REFERÊNCIAS",
            ]
        );
    }

    #[test]
    fn descricao_aplicacao_carrega_cinco_blocos() {
        assert_eq!(SECOES[0].blocos.len(), 5);
        assert!(SECOES[5].blocos.is_empty());
    }
}
