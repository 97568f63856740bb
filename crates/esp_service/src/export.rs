//! Pipeline de exportação: busca os dados do documento e de seus
//! colaboradores, agrega as seções e invoca o renderizador pedido.
//!
//! As buscas independentes de um documento (autor, Cadernos, arquivos,
//! catálogo) saem em paralelo; a agregação entre Cadernos é estritamente
//! sequencial na ordem de referência armazenada. O único efeito colateral
//! é o registro de auditoria após a geração bem-sucedida.

use chrono::Local;
use tracing::{error, info};
use uuid::Uuid;

use esp_core::models::{Caderno, DonoArquivo, Esp, TipoArquivo, UsuarioPublico};
use esp_core::render::docx::render_docx;
use esp_core::render::pdf::render_pdf;
use esp_core::render::{ImagemRender, RenderInput, SecaoRender};
use esp_core::resolver::{aggregate_all_sections, resolve_all_sections, CatalogoIndex};
use esp_db::Storage;

use crate::error::{Result, ServiceError};
use crate::EspService;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Resultado de uma exportação: bytes prontos e cabeçalhos sugeridos.
#[derive(Debug)]
pub struct Exportado {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EspService {
    pub async fn export_esp_pdf(&self, esp_id: Uuid, solicitante: Uuid) -> Result<Exportado> {
        let (esp, input) = self.montar_input_esp(esp_id, true).await?;
        let bytes = render_pdf(&input)?;
        self.auditar(
            solicitante,
            "EXPORTAR_PDF",
            esp.id,
            format!("PDF exportado para ESP \"{}\"", esp.codigo),
        )
        .await?;
        info!(esp_id = %esp.id, "PDF exported");
        Ok(Exportado {
            filename: format!("{}.pdf", esp.codigo),
            content_type: MIME_PDF.to_string(),
            bytes,
        })
    }

    pub async fn export_esp_docx(&self, esp_id: Uuid, solicitante: Uuid) -> Result<Exportado> {
        let (esp, input) = self.montar_input_esp(esp_id, false).await?;
        let bytes = render_docx(&input)?;
        self.auditar(
            solicitante,
            "EXPORTAR_DOCX",
            esp.id,
            format!("DOCX exportado para ESP \"{}\"", esp.codigo),
        )
        .await?;
        info!(esp_id = %esp.id, "DOCX exported");
        Ok(Exportado {
            filename: format!("{}.docx", esp.codigo),
            content_type: MIME_DOCX.to_string(),
            bytes,
        })
    }

    pub async fn export_caderno_pdf(
        &self,
        caderno_id: Uuid,
        solicitante: Uuid,
    ) -> Result<Exportado> {
        let (caderno, input) = self.montar_input_caderno(caderno_id, true).await?;
        let bytes = render_pdf(&input)?;
        self.auditar(
            solicitante,
            "EXPORTAR_CADERNO_PDF",
            caderno.id,
            format!("PDF exportado para Caderno \"{}\"", caderno.titulo),
        )
        .await?;
        info!(caderno_id = %caderno.id, "Caderno PDF exported");
        Ok(Exportado {
            filename: format!("caderno_{}.pdf", nome_seguro(&caderno.titulo)),
            content_type: MIME_PDF.to_string(),
            bytes,
        })
    }

    pub async fn export_caderno_docx(
        &self,
        caderno_id: Uuid,
        solicitante: Uuid,
    ) -> Result<Exportado> {
        let (caderno, input) = self.montar_input_caderno(caderno_id, false).await?;
        let bytes = render_docx(&input)?;
        self.auditar(
            solicitante,
            "EXPORTAR_CADERNO_DOCX",
            caderno.id,
            format!("DOCX exportado para Caderno \"{}\"", caderno.titulo),
        )
        .await?;
        info!(caderno_id = %caderno.id, "Caderno DOCX exported");
        Ok(Exportado {
            filename: format!("caderno_{}.docx", nome_seguro(&caderno.titulo)),
            content_type: MIME_DOCX.to_string(),
            bytes,
        })
    }

    /// Carrega a ESP e seus colaboradores e monta o insumo de renderização.
    async fn montar_input_esp(
        &self,
        esp_id: Uuid,
        com_imagens: bool,
    ) -> Result<(Esp, RenderInput)> {
        let esp = self
            .store
            .get_esp(esp_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ESP não encontrada".to_string()))?;

        // Buscas independentes em paralelo; a ordem dos Cadernos devolvida
        // por get_cadernos já é a ordem de referência armazenada.
        let (autor, cadernos, arquivos, itens) = tokio::try_join!(
            self.store.get_usuario_publico(esp.autor_id),
            self.store.get_cadernos(&esp.cadernos_ids),
            self.store.list_arquivos_por_dono(DonoArquivo::Esp(esp.id)),
            self.store.list_itens_ativos(),
        )?;
        let autor =
            autor.ok_or_else(|| ServiceError::NotFound("Autor não encontrado".to_string()))?;

        let catalogo = CatalogoIndex::new(&itens);
        let origens: Vec<(&str, &esp_core::models::ConteudoSecoes)> = cadernos
            .iter()
            .map(|c| (c.titulo.as_str(), &c.secoes))
            .collect();
        let secoes = aggregate_all_sections(&esp.secoes, &origens, &catalogo);

        let imagens = if com_imagens {
            self.carregar_imagens(&arquivos).await
        } else {
            vec![]
        };

        let input = RenderInput {
            subtitulo: format!("ESP: {}", esp.codigo),
            titulo: esp.titulo.clone(),
            identificacao_titulo: "IDENTIFICAÇÃO".to_string(),
            identificacao: identificacao_esp(&esp, &autor),
            secoes,
            imagens,
            gerado_em: Local::now().naive_local(),
        };
        Ok((esp, input))
    }

    async fn montar_input_caderno(
        &self,
        caderno_id: Uuid,
        com_imagens: bool,
    ) -> Result<(Caderno, RenderInput)> {
        let caderno = self
            .store
            .get_caderno(caderno_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Caderno não encontrado".to_string()))?;

        let (autor, arquivos, itens) = tokio::try_join!(
            self.store.get_usuario_publico(caderno.autor_id),
            self.store
                .list_arquivos_por_dono(DonoArquivo::Caderno(caderno.id)),
            self.store.list_itens_ativos(),
        )?;
        let autor =
            autor.ok_or_else(|| ServiceError::NotFound("Autor não encontrado".to_string()))?;

        let catalogo = CatalogoIndex::new(&itens);
        let mut secoes = Vec::new();
        if let Some(descricao) = caderno.descricao.as_deref() {
            if !descricao.trim().is_empty() {
                secoes.push(SecaoRender {
                    titulo: "DESCRIÇÃO".to_string(),
                    conteudo: descricao.trim().to_string(),
                });
            }
        }
        secoes.extend(resolve_all_sections(&caderno.secoes, &catalogo));

        let imagens = if com_imagens {
            self.carregar_imagens(&arquivos).await
        } else {
            vec![]
        };

        let input = RenderInput {
            subtitulo: "Caderno".to_string(),
            titulo: caderno.titulo.clone(),
            identificacao_titulo: "INFORMAÇÕES DO CADERNO".to_string(),
            identificacao: vec![
                ("Título".to_string(), caderno.titulo.clone()),
                ("Status".to_string(), caderno.status.to_string()),
                ("Autor".to_string(), autor.nome.clone()),
                (
                    "Criado em".to_string(),
                    caderno.created_at.format("%d/%m/%Y").to_string(),
                ),
                (
                    "Atualizado em".to_string(),
                    caderno.updated_at.format("%d/%m/%Y").to_string(),
                ),
            ],
            secoes,
            imagens,
            gerado_em: Local::now().naive_local(),
        };
        Ok((caderno, input))
    }

    /// Materializa somente os anexos de imagem. Falha ao carregar um
    /// anexo não derruba a exportação: o arquivo é pulado com log.
    async fn carregar_imagens(
        &self,
        arquivos: &[esp_core::models::ArquivoMeta],
    ) -> Vec<ImagemRender> {
        let mut imagens = Vec::new();
        for meta in arquivos.iter().filter(|a| a.tipo == TipoArquivo::Imagem) {
            let arquivo = match self.store.get_arquivo(meta.id).await {
                Ok(Some(arquivo)) => arquivo,
                Ok(None) => continue,
                Err(e) => {
                    error!(arquivo_id = %meta.id, erro = %e, "Error loading image for PDF");
                    continue;
                }
            };
            match self.bytes_do_arquivo(&arquivo).await {
                Ok(bytes) => imagens.push(ImagemRender {
                    filename: Some(arquivo.filename.clone()),
                    bytes,
                }),
                Err(e) => {
                    error!(arquivo_id = %meta.id, erro = %e, "Error loading image for PDF");
                }
            }
        }
        imagens
    }

    async fn auditar(
        &self,
        solicitante: Uuid,
        acao: &str,
        alvo: Uuid,
        detalhes: String,
    ) -> Result<()> {
        self.store
            .create_log(esp_core::models::NovoLog::new(
                solicitante,
                acao,
                alvo.to_string(),
                detalhes,
            ))
            .await?;
        Ok(())
    }
}

fn identificacao_esp(esp: &Esp, autor: &UsuarioPublico) -> Vec<(String, String)> {
    vec![
        ("Tipologia".to_string(), esp.tipologia.clone()),
        ("Código".to_string(), esp.codigo.clone()),
        ("Revisão".to_string(), esp.revisao.clone()),
        (
            "Data de Publicação".to_string(),
            esp.data_publicacao.format("%d/%m/%Y").to_string(),
        ),
        ("Autor".to_string(), autor.nome.clone()),
        ("Selo".to_string(), esp.selo.to_string()),
        (
            "Visível".to_string(),
            if esp.visivel { "Sim" } else { "Não" }.to_string(),
        ),
    ]
}

/// Nome de arquivo seguro derivado de um título livre.
fn nome_seguro(titulo: &str) -> String {
    let mut saida = String::new();
    let mut anterior_separador = true;
    for c in titulo.chars() {
        if c.is_alphanumeric() {
            saida.push(c.to_ascii_lowercase());
            anterior_separador = false;
        } else if !anterior_separador {
            saida.push('_');
            anterior_separador = true;
        }
    }
    let saida = saida.trim_end_matches('_').to_string();
    if saida.is_empty() {
        "documento".to_string()
    } else {
        saida
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_seguro_normaliza_titulos() {
        assert_eq!(nome_seguro("Piso Cerâmico"), "piso_cerâmico");
        assert_eq!(nome_seguro("A/B: C"), "a_b_c");
        assert_eq!(nome_seguro("   "), "documento");
    }
}
