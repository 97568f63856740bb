//! Resolução de texto de seções: índice de catálogo, resolvedor de seção
//! e agregador entre documentos.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Categoria, ConteudoSecoes, ItemCatalogo};
use crate::render::SecaoRender;
use crate::secoes::{Secao, SECOES};

/// Separador entre blocos de origens distintas na agregação.
pub const DIVISOR_BLOCOS: &str = "\n\n---\n\n";

const MARCADOR: &str = "• ";

/// Índice de itens ativos do catálogo, particionado por categoria.
///
/// IDs que não resolvem (item apagado ou desativado depois de
/// referenciado) são descartados em silêncio: inconsistência tolerada,
/// não erro.
pub struct CatalogoIndex {
    rotulos: HashMap<Categoria, HashMap<Uuid, String>>,
}

impl CatalogoIndex {
    pub fn new(itens: &[ItemCatalogo]) -> CatalogoIndex {
        let mut rotulos: HashMap<Categoria, HashMap<Uuid, String>> = HashMap::new();
        for item in itens.iter().filter(|i| i.ativo) {
            rotulos
                .entry(item.categoria)
                .or_default()
                .insert(item.id, item.rotulo());
        }
        CatalogoIndex { rotulos }
    }

    /// Resolve uma lista de IDs para uma lista com marcadores, um rótulo
    /// por linha, na ordem de entrada. Lista vazia resolve para `""`.
    pub fn resolve(&self, categoria: Categoria, ids: &[Uuid]) -> String {
        if ids.is_empty() {
            return String::new();
        }
        let mapa = match self.rotulos.get(&categoria) {
            Some(m) => m,
            None => return String::new(),
        };
        ids.iter()
            .filter_map(|id| mapa.get(id))
            .map(|rotulo| format!("{}{}", MARCADOR, rotulo))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Texto final de uma seção de um único documento: texto livre seguido
/// dos blocos de catálogo não vazios, separados por linha em branco.
/// Tudo vazio resolve para `""` e a seção é omitida da renderização.
pub fn resolve_section(
    conteudo: &ConteudoSecoes,
    secao: &Secao,
    catalogo: &CatalogoIndex,
) -> String {
    let mut partes: Vec<String> = Vec::new();

    if let Some(texto) = conteudo.texto(secao.campo) {
        let texto = texto.trim();
        if !texto.is_empty() {
            partes.push(texto.to_string());
        }
    }

    for bloco in secao.blocos {
        let resolvido = catalogo.resolve(bloco.categoria, conteudo.ids(bloco.campo));
        if !resolvido.is_empty() {
            partes.push(format!("{}:\n{}", bloco.rotulo, resolvido));
        }
    }

    partes.join("\n\n")
}

/// Texto combinado de uma seção para uma ESP que referencia Cadernos.
///
/// O bloco da própria ESP vem primeiro, seguido de um bloco por Caderno
/// na ordem de referência armazenada, cada um rotulado pela origem. Sem
/// Cadernos referenciados o texto resolvido da ESP é usado sem rótulo.
pub fn aggregate_section(
    esp: &ConteudoSecoes,
    cadernos: &[(&str, &ConteudoSecoes)],
    secao: &Secao,
    catalogo: &CatalogoIndex,
) -> String {
    let texto_esp = resolve_section(esp, secao, catalogo);
    if cadernos.is_empty() {
        return texto_esp;
    }

    let mut blocos: Vec<String> = Vec::new();
    if !texto_esp.is_empty() {
        blocos.push(format!("ESP:\n{}", texto_esp));
    }
    for (titulo, conteudo) in cadernos {
        let texto = resolve_section(conteudo, secao, catalogo);
        if !texto.is_empty() {
            blocos.push(format!("Caderno {}:\n{}", titulo, texto));
        }
    }

    blocos.join(DIVISOR_BLOCOS)
}

/// Resolve as oito seções de um documento isolado, na ordem da tabela.
pub fn resolve_all_sections(
    conteudo: &ConteudoSecoes,
    catalogo: &CatalogoIndex,
) -> Vec<SecaoRender> {
    SECOES
        .iter()
        .map(|secao| SecaoRender {
            titulo: secao.titulo.to_string(),
            conteudo: resolve_section(conteudo, secao, catalogo),
        })
        .collect()
}

/// Resolve as oito seções agregadas de uma ESP com seus Cadernos.
pub fn aggregate_all_sections(
    esp: &ConteudoSecoes,
    cadernos: &[(&str, &ConteudoSecoes)],
    catalogo: &CatalogoIndex,
) -> Vec<SecaoRender> {
    SECOES
        .iter()
        .map(|secao| SecaoRender {
            titulo: secao.titulo.to_string(),
            conteudo: aggregate_section(esp, cadernos, secao, catalogo),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::ItemCatalogo;
    use crate::secoes::SECOES;

    fn item(id: Uuid, categoria: Categoria, nome: &str, ativo: bool) -> ItemCatalogo {
        ItemCatalogo {
            id,
            categoria,
            nome: nome.to_string(),
            marca: None,
            descricao: None,
            ativo,
            created_at: Utc::now(),
        }
    }

    fn secao_execucao() -> &'static Secao {
        &SECOES[1]
    }

    #[test]
    fn ids_desconhecidos_sao_descartados_em_silencio() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let itens = vec![
            item(a, Categoria::Constituinte, "Aço CA-50", true),
            item(c, Categoria::Constituinte, "Tinta epóxi", true),
        ];
        let catalogo = CatalogoIndex::new(&itens);

        let texto = catalogo.resolve(Categoria::Constituinte, &[a, b, c]);
        assert_eq!(texto, "• Aço CA-50\n• Tinta epóxi");
    }

    #[test]
    fn itens_inativos_nao_entram_no_indice() {
        let a = Uuid::new_v4();
        let itens = vec![item(a, Categoria::Constituinte, "Bloco cerâmico", false)];
        let catalogo = CatalogoIndex::new(&itens);

        assert_eq!(catalogo.resolve(Categoria::Constituinte, &[a]), "");
    }

    #[test]
    fn lista_vazia_resolve_para_vazio() {
        let catalogo = CatalogoIndex::new(&[]);
        assert_eq!(catalogo.resolve(Categoria::Acessorio, &[]), "");
    }

    #[test]
    fn resolucao_preserva_ordem_de_entrada() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let itens = vec![
            item(a, Categoria::Acessorio, "Parafusos", true),
            item(b, Categoria::Acessorio, "Buchas", true),
        ];
        let catalogo = CatalogoIndex::new(&itens);

        assert_eq!(
            catalogo.resolve(Categoria::Acessorio, &[b, a]),
            "• Buchas\n• Parafusos"
        );
    }

    #[test]
    fn secao_combina_texto_livre_e_bloco_rotulado() {
        let id = Uuid::new_v4();
        let itens = vec![item(id, Categoria::Constituinte, "Argamassa ACIII", true)];
        let catalogo = CatalogoIndex::new(&itens);

        let conteudo = ConteudoSecoes {
            execucao: Some("Aplicar argamassa.".to_string()),
            constituintes_execucao_ids: vec![id],
            ..Default::default()
        };

        let texto = resolve_section(&conteudo, secao_execucao(), &catalogo);
        assert_eq!(
            texto,
            "Aplicar argamassa.\n\nConstituintes (Execução):\n• Argamassa ACIII"
        );
    }

    #[test]
    fn secao_sem_conteudo_resolve_para_vazio() {
        let catalogo = CatalogoIndex::new(&[]);
        let conteudo = ConteudoSecoes::default();
        for secao in SECOES {
            assert_eq!(resolve_section(&conteudo, secao, &catalogo), "");
        }
    }

    #[test]
    fn secao_somente_com_bloco_de_catalogo() {
        let id = Uuid::new_v4();
        let itens = vec![item(id, Categoria::FichaRecebimento, "Ficha Elétrica", true)];
        let catalogo = CatalogoIndex::new(&itens);

        let conteudo = ConteudoSecoes {
            fichas_recebimento_ids: vec![id],
            ..Default::default()
        };

        let texto = resolve_section(&conteudo, &SECOES[3], &catalogo);
        assert_eq!(texto, "Fichas de Recebimento:\n• Ficha Elétrica");
    }

    #[test]
    fn agregacao_ordena_esp_depois_cadernos_na_ordem_armazenada() {
        let catalogo = CatalogoIndex::new(&[]);
        let esp = ConteudoSecoes {
            execucao: Some("Texto da ESP.".to_string()),
            ..Default::default()
        };
        let c1 = ConteudoSecoes {
            execucao: Some("Texto do primeiro.".to_string()),
            ..Default::default()
        };
        let c2 = ConteudoSecoes {
            execucao: Some("Texto do segundo.".to_string()),
            ..Default::default()
        };

        let texto = aggregate_section(
            &esp,
            &[("Zeta", &c1), ("Alfa", &c2)],
            secao_execucao(),
            &catalogo,
        );

        assert_eq!(
            texto,
            "ESP:\nTexto da ESP.\n\n---\n\nCaderno Zeta:\nTexto do primeiro.\n\n---\n\nCaderno Alfa:\nTexto do segundo."
        );
    }

    #[test]
    fn agregacao_sem_cadernos_nao_rotula() {
        let catalogo = CatalogoIndex::new(&[]);
        let esp = ConteudoSecoes {
            execucao: Some("Somente a ESP.".to_string()),
            ..Default::default()
        };
        let texto = aggregate_section(&esp, &[], secao_execucao(), &catalogo);
        assert_eq!(texto, "Somente a ESP.");
    }

    #[test]
    fn agregacao_pula_origens_vazias() {
        let catalogo = CatalogoIndex::new(&[]);
        let esp = ConteudoSecoes::default();
        let c1 = ConteudoSecoes::default();
        let c2 = ConteudoSecoes {
            execucao: Some("Só este tem texto.".to_string()),
            ..Default::default()
        };

        let texto = aggregate_section(
            &esp,
            &[("Vazio", &c1), ("Cheio", &c2)],
            secao_execucao(),
            &catalogo,
        );
        assert_eq!(texto, "Caderno Cheio:\nSó este tem texto.");
    }

    #[test]
    fn agregacao_totalmente_vazia_resolve_para_vazio() {
        let catalogo = CatalogoIndex::new(&[]);
        let esp = ConteudoSecoes::default();
        let c1 = ConteudoSecoes::default();
        let texto = aggregate_section(&esp, &[("C1", &c1)], secao_execucao(), &catalogo);
        assert_eq!(texto, "");
    }

    #[test]
    fn cadernos_resolvem_seus_proprios_ids_de_catalogo() {
        let id = Uuid::new_v4();
        let itens = vec![item(id, Categoria::Constituinte, "Concreto estrutural", true)];
        let catalogo = CatalogoIndex::new(&itens);

        let esp = ConteudoSecoes::default();
        let c1 = ConteudoSecoes {
            constituintes_execucao_ids: vec![id],
            ..Default::default()
        };

        let texto = aggregate_section(&esp, &[("Estruturas", &c1)], secao_execucao(), &catalogo);
        assert_eq!(
            texto,
            "Caderno Estruturas:\nConstituintes (Execução):\n• Concreto estrutural"
        );
    }
}
