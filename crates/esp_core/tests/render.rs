use std::io::Read;

use chrono::NaiveDate;
use esp_core::render::docx::render_docx;
use esp_core::render::pdf::render_pdf;
use esp_core::render::{ImagemRender, RenderInput, SecaoRender};

fn input_basico() -> RenderInput {
    RenderInput {
        subtitulo: "ESP: ESP-001".to_string(),
        titulo: "Piso Cerâmico".to_string(),
        identificacao_titulo: "IDENTIFICAÇÃO".to_string(),
        identificacao: vec![
            ("Tipologia".to_string(), "Revestimento".to_string()),
            ("Código".to_string(), "ESP-001".to_string()),
            ("Revisão".to_string(), "R01".to_string()),
            ("Autor".to_string(), "João Arquiteto".to_string()),
            ("Visível".to_string(), "Sim".to_string()),
        ],
        secoes: vec![
            SecaoRender {
                titulo: "EXECUÇÃO".to_string(),
                conteudo: "Aplicar argamassa.\n\nConstituintes (Execução):\n• Argamassa ACIII"
                    .to_string(),
            },
            SecaoRender {
                titulo: "RECEBIMENTO".to_string(),
                conteudo: String::new(),
            },
            SecaoRender {
                titulo: "LEGISLAÇÃO".to_string(),
                conteudo: "NBR 13753".to_string(),
            },
        ],
        imagens: vec![],
        gerado_em: NaiveDate::from_ymd_opt(2026, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap(),
    }
}

fn texto_do_pdf(bytes: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(bytes).expect("PDF gerado deve reabrir");
    let paginas: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&paginas).expect("texto extraível")
}

#[test]
fn pdf_contem_cabecalho_secoes_e_rodape() {
    let bytes = render_pdf(&input_basico()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let texto = texto_do_pdf(&bytes);
    assert!(texto.contains("SEEDF - Sistema ESP"));
    assert!(texto.contains("ESP: ESP-001"));
    assert!(texto.contains("EXECUÇÃO"));
    assert!(texto.contains("Aplicar argamassa."));
    assert!(texto.contains("Constituintes (Execução):"));
    assert!(texto.contains("Argamassa ACIII"));
    assert!(texto.contains("Gerado em 05/03/2026 às 14:30:00"));
}

#[test]
fn pdf_omite_secao_vazia() {
    let texto = texto_do_pdf(&render_pdf(&input_basico()).unwrap());
    assert!(!texto.contains("RECEBIMENTO"));
    assert!(texto.contains("LEGISLAÇÃO"));
}

#[test]
fn pdf_e_deterministico_para_entrada_fixa() {
    let input = input_basico();
    let primeiro = texto_do_pdf(&render_pdf(&input).unwrap());
    let segundo = texto_do_pdf(&render_pdf(&input).unwrap());
    assert_eq!(primeiro, segundo);
}

#[test]
fn pdf_com_imagem_invalida_degrada_para_marcador() {
    let mut input = input_basico();
    input.imagens.push(ImagemRender {
        filename: Some("planta.png".to_string()),
        bytes: vec![0xde, 0xad, 0xbe, 0xef],
    });

    let bytes = render_pdf(&input).unwrap();
    let texto = texto_do_pdf(&bytes);
    assert!(texto.contains("PROJETOS"));
    assert!(texto.contains("planta.png"));
    assert!(texto.contains("Erro ao carregar imagem."));
    // As seções seguem presentes depois da página de imagem.
    assert!(texto.contains("EXECUÇÃO"));
}

#[test]
fn pdf_rotula_imagem_sem_nome_pela_posicao() {
    let mut input = input_basico();
    input.imagens.push(ImagemRender {
        filename: None,
        bytes: vec![0x00],
    });
    let texto = texto_do_pdf(&render_pdf(&input).unwrap());
    assert!(texto.contains("Imagem 1"));
}

#[test]
fn pdf_pagina_textos_longos() {
    let mut input = input_basico();
    let paragrafo = "Linha de texto de execução repetida para forçar paginação. ".repeat(80);
    input.secoes[0].conteudo = paragrafo;

    let bytes = render_pdf(&input).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(doc.get_pages().len() > 1);
}

fn documento_xml(bytes: &[u8]) -> String {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut zip = zip::ZipArchive::new(cursor).expect("DOCX gerado deve reabrir");
    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .expect("parte principal presente")
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn docx_contem_cabecalho_e_secoes() {
    let bytes = render_docx(&input_basico()).unwrap();
    let xml = documento_xml(&bytes);
    assert!(xml.contains("SEEDF - Sistema ESP"));
    assert!(xml.contains("ESP: ESP-001"));
    assert!(xml.contains("EXECUÇÃO"));
    assert!(xml.contains("Aplicar argamassa."));
    assert!(xml.contains("Gerado em 05/03/2026 às 14:30:00"));
}

#[test]
fn docx_omite_secao_vazia_como_o_pdf() {
    let xml = documento_xml(&render_docx(&input_basico()).unwrap());
    assert!(!xml.contains("RECEBIMENTO"));
    assert!(xml.contains("LEGISLAÇÃO"));
}

#[test]
fn docx_nao_embute_imagens() {
    let mut input = input_basico();
    input.imagens.push(ImagemRender {
        filename: Some("planta.png".to_string()),
        bytes: vec![1, 2, 3],
    });
    let xml = documento_xml(&render_docx(&input).unwrap());
    assert!(!xml.contains("planta.png"));
    assert!(!xml.contains("PROJETOS"));
}

#[test]
fn docx_tem_partes_ooxml_minimas() {
    let bytes = render_docx(&input_basico()).unwrap();
    let cursor = std::io::Cursor::new(bytes);
    let mut zip = zip::ZipArchive::new(cursor).unwrap();
    for parte in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
    ] {
        assert!(zip.by_name(parte).is_ok(), "parte ausente: {}", parte);
    }
}
