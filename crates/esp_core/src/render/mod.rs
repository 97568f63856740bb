//! Renderizadores de documento (PDF e DOCX).
//!
//! Os dois renderizadores recebem o mesmo insumo já resolvido: metadados,
//! bloco de identificação, seções em ordem fixa e, no caso do PDF, as
//! imagens anexadas. Seções com conteúdo vazio são omitidas por inteiro
//! (nem o título é emitido), em ambos os formatos.

pub mod docx;
pub mod pdf;

use chrono::NaiveDateTime;

/// Nome do sistema, exibido no topo de todos os documentos exportados.
pub const TITULO_SISTEMA: &str = "SEEDF - Sistema ESP";

#[derive(Debug, Clone)]
pub struct SecaoRender {
    pub titulo: String,
    pub conteudo: String,
}

#[derive(Debug, Clone)]
pub struct ImagemRender {
    /// Nome do arquivo; ausente, o renderizador usa um rótulo posicional.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Insumo comum aos dois renderizadores.
#[derive(Debug, Clone)]
pub struct RenderInput {
    /// Linha abaixo do nome do sistema, ex.: `ESP: ESP-001` ou `Caderno`.
    pub subtitulo: String,
    pub titulo: String,
    /// Título do bloco de identificação (`IDENTIFICAÇÃO` ou
    /// `INFORMAÇÕES DO CADERNO`).
    pub identificacao_titulo: String,
    /// Pares rótulo/valor do bloco de identificação, na ordem de exibição.
    pub identificacao: Vec<(String, String)>,
    pub secoes: Vec<SecaoRender>,
    /// Somente o renderizador PDF embute imagens.
    pub imagens: Vec<ImagemRender>,
    /// Momento da geração, injetado para manter o conteúdo determinístico
    /// sob entradas fixas.
    pub gerado_em: NaiveDateTime,
}

impl RenderInput {
    pub fn rodape(&self) -> String {
        format!(
            "Gerado em {} às {}",
            self.gerado_em.format("%d/%m/%Y"),
            self.gerado_em.format("%H:%M:%S")
        )
    }
}
