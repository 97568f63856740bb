//! Renderizador PDF.
//!
//! Gera um documento A4 paginado com `lopdf`: bloco de título
//! centralizado, identificação, uma página por imagem anexada e um bloco
//! por seção não vazia, com rodapé de geração na última página. Falha de
//! decodificação de uma imagem degrada para um marcador de erro no lugar
//! da imagem; qualquer outro erro rejeita a geração inteira.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::error::{CoreError, Result};
use crate::render::{ImagemRender, RenderInput, TITULO_SISTEMA};

const LARGURA: f32 = 595.28;
const ALTURA: f32 = 841.89;
const MARGEM: f32 = 50.0;
const LARGURA_UTIL: f32 = LARGURA - 2.0 * MARGEM;

/// Caixa máxima de uma imagem embutida, em pontos.
const CAIXA_IMAGEM: f32 = 500.0;

/// Fator médio de largura de glifo da Helvetica, usado para quebra de
/// linha e centralização aproximadas.
const FATOR_LARGURA: f32 = 0.5;

const AZUL: (f32, f32, f32) = (0.012, 0.380, 0.678); // #0361ad
const PRETO: (f32, f32, f32) = (0.0, 0.0, 0.0);
const CINZA: (f32, f32, f32) = (0.4, 0.4, 0.4); // #666666
const VERMELHO: (f32, f32, f32) = (1.0, 0.0, 0.0);

pub fn render_pdf(input: &RenderInput) -> Result<Vec<u8>> {
    let mut comp = Compositor::new();

    // Bloco de título.
    comp.linha_centralizada(TITULO_SISTEMA, 20.0, AZUL);
    comp.espaco(20.0 * 1.35);
    comp.linha_centralizada(&input.subtitulo, 16.0, PRETO);
    comp.espaco(8.0);
    comp.linha_centralizada(&input.titulo, 14.0, PRETO);
    comp.espaco(2.0 * 14.0 * 1.35);

    // Identificação.
    comp.titulo_secao(&input.identificacao_titulo);
    comp.espaco(6.0);
    for (rotulo, valor) in &input.identificacao {
        comp.paragrafo(&format!("{}: {}", rotulo, valor), 10.0, PRETO);
    }
    comp.espaco(18.0);

    // Uma página por imagem anexada.
    for (indice, imagem) in input.imagens.iter().enumerate() {
        comp.pagina_de_imagem(imagem, indice);
    }

    // Seções, na ordem da tabela; vazias são omitidas por inteiro.
    for secao in &input.secoes {
        if secao.conteudo.is_empty() {
            continue;
        }
        comp.titulo_secao(&secao.titulo);
        comp.espaco(6.0);
        comp.paragrafo(&secao.conteudo, 10.0, PRETO);
        comp.espaco(18.0);
    }

    comp.rodape(&input.rodape());
    comp.build()
}

struct ImagemPosicionada {
    stream: Stream,
    posicao: (f32, f32),
    tamanho: (f32, f32),
}

#[derive(Default)]
struct Pagina {
    ops: Vec<Operation>,
    imagens: Vec<ImagemPosicionada>,
}

struct Compositor {
    paginas: Vec<Pagina>,
    cursor: f32,
}

impl Compositor {
    fn new() -> Compositor {
        Compositor {
            paginas: vec![Pagina::default()],
            cursor: ALTURA - MARGEM,
        }
    }

    fn nova_pagina(&mut self) {
        self.paginas.push(Pagina::default());
        self.cursor = ALTURA - MARGEM;
    }

    fn pagina_atual(&mut self) -> &mut Pagina {
        self.paginas.last_mut().expect("sempre há uma página")
    }

    /// Desce o cursor pela altura dada, abrindo página nova se o texto
    /// não couber acima da margem inferior.
    fn avancar(&mut self, altura: f32) {
        if self.cursor - altura < MARGEM {
            self.nova_pagina();
        }
        self.cursor -= altura;
    }

    fn espaco(&mut self, altura: f32) {
        self.cursor -= altura;
    }

    fn emitir_linha(&mut self, texto: &str, tamanho: f32, cor: (f32, f32, f32), x: f32) {
        let y = self.cursor;
        let ops = &mut self.pagina_atual().ops;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), tamanho.into()]));
        ops.push(Operation::new(
            "rg",
            vec![cor.0.into(), cor.1.into(), cor.2.into()],
        ));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(winansi(texto), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn linha(&mut self, texto: &str, tamanho: f32, cor: (f32, f32, f32)) {
        self.avancar(tamanho * 1.35);
        self.emitir_linha(texto, tamanho, cor, MARGEM);
    }

    fn linha_centralizada(&mut self, texto: &str, tamanho: f32, cor: (f32, f32, f32)) {
        self.avancar(tamanho * 1.35);
        let largura_texto = largura_estimada(texto, tamanho);
        let x = ((LARGURA - largura_texto) / 2.0).max(MARGEM);
        self.emitir_linha(texto, tamanho, cor, x);
    }

    /// Título de seção: 12pt na cor institucional, sublinhado.
    fn titulo_secao(&mut self, texto: &str) {
        self.avancar(12.0 * 1.35);
        let y = self.cursor;
        self.emitir_linha(texto, 12.0, AZUL, MARGEM);
        let largura_texto = largura_estimada(texto, 12.0);
        let ops = &mut self.pagina_atual().ops;
        ops.push(Operation::new(
            "RG",
            vec![AZUL.0.into(), AZUL.1.into(), AZUL.2.into()],
        ));
        ops.push(Operation::new("w", vec![Object::Real(0.7)]));
        ops.push(Operation::new("m", vec![MARGEM.into(), (y - 2.0).into()]));
        ops.push(Operation::new(
            "l",
            vec![(MARGEM + largura_texto).into(), (y - 2.0).into()],
        ));
        ops.push(Operation::new("S", vec![]));
    }

    /// Texto corrido com quebra de linha e paginação.
    fn paragrafo(&mut self, texto: &str, tamanho: f32, cor: (f32, f32, f32)) {
        let max_colunas = (LARGURA_UTIL / (tamanho * FATOR_LARGURA)).floor() as usize;
        for linha_crua in texto.split('\n') {
            if linha_crua.is_empty() {
                self.espaco(tamanho * 1.35);
                continue;
            }
            for pedaco in quebrar_linha(linha_crua, max_colunas) {
                self.linha(&pedaco, tamanho, cor);
            }
        }
    }

    /// Página dedicada a uma imagem de projeto. Falha de decodificação
    /// vira um marcador visível no lugar da imagem.
    fn pagina_de_imagem(&mut self, imagem: &ImagemRender, indice: usize) {
        self.nova_pagina();
        self.titulo_secao("PROJETOS");
        self.espaco(6.0);
        let rotulo = match &imagem.filename {
            Some(nome) if !nome.is_empty() => nome.clone(),
            _ => format!("Imagem {}", indice + 1),
        };
        self.linha(&rotulo, 10.0, PRETO);
        self.espaco(6.0);

        match decodificar_imagem(&imagem.bytes) {
            Some((stream, largura, altura)) => {
                let escala = (CAIXA_IMAGEM / largura).min(CAIXA_IMAGEM / altura);
                let (w, h) = (largura * escala, altura * escala);
                let x = ((LARGURA - w) / 2.0).max(0.0);
                let y = self.cursor - h;
                self.pagina_atual().imagens.push(ImagemPosicionada {
                    stream,
                    posicao: (x, y),
                    tamanho: (w, h),
                });
                self.cursor = y - 12.0;
            }
            None => {
                self.linha("Erro ao carregar imagem.", 10.0, VERMELHO);
            }
        }
    }

    /// Rodapé fixo junto à margem inferior da última página.
    fn rodape(&mut self, texto: &str) {
        let largura_texto = largura_estimada(texto, 8.0);
        let x = ((LARGURA - largura_texto) / 2.0).max(MARGEM);
        self.cursor = MARGEM;
        self.emitir_linha(texto, 8.0, CINZA, x);
    }

    fn build(self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let fonte_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => fonte_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        let mut page_ids = Vec::new();
        for pagina in &self.paginas {
            let content = Content {
                operations: pagina.ops.clone(),
            };
            let encoded = content
                .encode()
                .map_err(|e| CoreError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), LARGURA.into(), ALTURA.into()],
            });
            kids.push(page_id.into());
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.paginas.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        for (indice, pagina) in self.paginas.into_iter().enumerate() {
            for imagem in pagina.imagens {
                doc.insert_image(page_ids[indice], imagem.stream, imagem.posicao, imagem.tamanho)
                    .map_err(|e| CoreError::Pdf(e.to_string()))?;
            }
        }

        doc.compress();
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| CoreError::Pdf(e.to_string()))?;
        Ok(buffer)
    }
}

/// Decodifica os bytes de uma imagem em um XObject com as dimensões
/// originais. `None` quando os bytes não são uma imagem suportada.
fn decodificar_imagem(bytes: &[u8]) -> Option<(Stream, f32, f32)> {
    let stream = lopdf::xobject::image_from(bytes.to_vec()).ok()?;
    let largura = stream.dict.get(b"Width").ok()?.as_i64().ok()? as f32;
    let altura = stream.dict.get(b"Height").ok()?.as_i64().ok()? as f32;
    if largura <= 0.0 || altura <= 0.0 {
        return None;
    }
    Some((stream, largura, altura))
}

fn largura_estimada(texto: &str, tamanho: f32) -> f32 {
    texto.chars().count() as f32 * tamanho * FATOR_LARGURA
}

/// Quebra gulosa por palavras; palavras maiores que a linha são cortadas.
fn quebrar_linha(texto: &str, max_colunas: usize) -> Vec<String> {
    let max = max_colunas.max(1);
    let mut linhas = Vec::new();
    let mut atual = String::new();
    for palavra in texto.split_whitespace() {
        let comprimento = palavra.chars().count();
        if comprimento > max {
            if !atual.is_empty() {
                linhas.push(std::mem::take(&mut atual));
            }
            let chars: Vec<char> = palavra.chars().collect();
            for pedaco in chars.chunks(max) {
                linhas.push(pedaco.iter().collect());
            }
            continue;
        }
        let precisa = if atual.is_empty() {
            comprimento
        } else {
            atual.chars().count() + 1 + comprimento
        };
        if precisa > max {
            linhas.push(std::mem::take(&mut atual));
        }
        if !atual.is_empty() {
            atual.push(' ');
        }
        atual.push_str(palavra);
    }
    if !atual.is_empty() {
        linhas.push(atual);
    }
    if linhas.is_empty() {
        linhas.push(String::new());
    }
    linhas
}

/// Codifica texto para WinAnsi (Latin-1 mais os pontuadores da faixa
/// 0x80-0x9F). Caracteres fora da tabela viram `?`.
fn winansi(texto: &str) -> Vec<u8> {
    texto
        .chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => {
                let cp = c as u32;
                if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
                    cp as u8
                } else {
                    b'?'
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quebra_respeita_limite_de_colunas() {
        let linhas = quebrar_linha("um dois tres quatro cinco", 10);
        assert!(linhas.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(linhas.join(" "), "um dois tres quatro cinco");
    }

    #[test]
    fn palavra_maior_que_a_linha_e_cortada() {
        let linhas = quebrar_linha("impermeabilizacao", 6);
        assert!(linhas.len() > 1);
        assert_eq!(linhas.concat(), "impermeabilizacao");
    }

    #[test]
    fn winansi_mapeia_acentos_e_marcador() {
        let bytes = winansi("• Aço");
        assert_eq!(bytes[0], 0x95);
        assert!(bytes.contains(&0xE7)); // ç
    }

    #[test]
    fn winansi_substitui_fora_da_tabela() {
        assert_eq!(winansi("中"), b"?".to_vec());
    }
}
