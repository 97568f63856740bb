//! Renderizador DOCX.
//!
//! Mesmo conteúdo informacional do PDF, com estrutura diferente:
//! parágrafos com estilo de título (negrito e variação de tamanho) em vez
//! de posicionamento próprio, e sem imagens embutidas. O pacote é um zip
//! OOXML mínimo montado em memória.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{CoreError, Result};
use crate::render::{RenderInput, TITULO_SISTEMA};

pub fn render_docx(input: &RenderInput) -> Result<Vec<u8>> {
    let mut corpo = String::new();

    heading(&mut corpo, "Heading1", TITULO_SISTEMA, true, 0, 200);
    paragrafo_destaque(&mut corpo, &input.subtitulo, 28, 100);
    paragrafo_centralizado(&mut corpo, &input.titulo, 400);

    heading(&mut corpo, "Heading2", &input.identificacao_titulo, false, 200, 200);
    for (rotulo, valor) in &input.identificacao {
        paragrafo(&mut corpo, &format!("{}: {}", rotulo, valor), 100);
    }

    for secao in &input.secoes {
        if secao.conteudo.is_empty() {
            continue;
        }
        heading(&mut corpo, "Heading2", &secao.titulo, false, 200, 200);
        paragrafo(&mut corpo, &secao.conteudo, 400);
    }

    rodape(&mut corpo, &input.rodape());

    empacotar(&documento_xml(&corpo))
}

fn heading(corpo: &mut String, estilo: &str, texto: &str, centrado: bool, antes: u32, depois: u32) {
    corpo.push_str("<w:p><w:pPr>");
    corpo.push_str(&format!("<w:pStyle w:val=\"{}\"/>", estilo));
    if centrado {
        corpo.push_str("<w:jc w:val=\"center\"/>");
    }
    corpo.push_str(&format!(
        "<w:spacing w:before=\"{}\" w:after=\"{}\"/>",
        antes, depois
    ));
    corpo.push_str("</w:pPr>");
    run(corpo, texto, "");
    corpo.push_str("</w:p>");
}

/// Parágrafo centralizado em negrito com tamanho próprio (meios-pontos),
/// usado para o código do documento abaixo do título.
fn paragrafo_destaque(corpo: &mut String, texto: &str, tamanho: u32, depois: u32) {
    corpo.push_str("<w:p><w:pPr><w:jc w:val=\"center\"/>");
    corpo.push_str(&format!("<w:spacing w:after=\"{}\"/>", depois));
    corpo.push_str("</w:pPr>");
    run(
        corpo,
        texto,
        &format!("<w:b/><w:sz w:val=\"{}\"/>", tamanho),
    );
    corpo.push_str("</w:p>");
}

fn paragrafo_centralizado(corpo: &mut String, texto: &str, depois: u32) {
    corpo.push_str("<w:p><w:pPr><w:jc w:val=\"center\"/>");
    corpo.push_str(&format!("<w:spacing w:after=\"{}\"/>", depois));
    corpo.push_str("</w:pPr>");
    run(corpo, texto, "");
    corpo.push_str("</w:p>");
}

fn paragrafo(corpo: &mut String, texto: &str, depois: u32) {
    corpo.push_str("<w:p><w:pPr>");
    corpo.push_str(&format!("<w:spacing w:after=\"{}\"/>", depois));
    corpo.push_str("</w:pPr>");
    run(corpo, texto, "");
    corpo.push_str("</w:p>");
}

fn rodape(corpo: &mut String, texto: &str) {
    corpo.push_str("<w:p><w:pPr><w:jc w:val=\"center\"/><w:spacing w:before=\"400\"/></w:pPr>");
    run(
        corpo,
        texto,
        "<w:sz w:val=\"18\"/><w:color w:val=\"666666\"/>",
    );
    corpo.push_str("</w:p>");
}

/// Emite um run; quebras de linha do texto viram `<w:br/>`.
fn run(corpo: &mut String, texto: &str, props: &str) {
    corpo.push_str("<w:r>");
    if !props.is_empty() {
        corpo.push_str(&format!("<w:rPr>{}</w:rPr>", props));
    }
    for (indice, linha) in texto.split('\n').enumerate() {
        if indice > 0 {
            corpo.push_str("<w:br/>");
        }
        corpo.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape(linha)
        ));
    }
    corpo.push_str("</w:r>");
}

fn documento_xml(corpo: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
         <w:pgMar w:top=\"1417\" w:right=\"1417\" w:bottom=\"1417\" w:left=\"1417\"/>\
         </w:sectPr></w:body></w:document>",
        corpo
    )
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1">
    <w:name w:val="Normal"/>
    <w:rPr><w:sz w:val="20"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/><w:color w:val="0361AD"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="24"/><w:color w:val="0361AD"/></w:rPr>
  </w:style>
</w:styles>"#;

fn empacotar(documento: &str) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let partes: [(&str, &[u8]); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", RELS.as_bytes()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
            ("word/document.xml", documento.as_bytes()),
            ("word/styles.xml", STYLES.as_bytes()),
        ];
        for (nome, conteudo) in partes {
            zip.start_file(nome, options)
                .map_err(|e| CoreError::Docx(e.to_string()))?;
            zip.write_all(conteudo)
                .map_err(|e| CoreError::Docx(e.to_string()))?;
        }
        zip.finish().map_err(|e| CoreError::Docx(e.to_string()))?;
    }
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_escapa_e_preserva_quebras() {
        let mut corpo = String::new();
        run(&mut corpo, "a < b\nc & d", "");
        assert!(corpo.contains("a &lt; b"));
        assert!(corpo.contains("<w:br/>"));
        assert!(corpo.contains("c &amp; d"));
    }

    #[test]
    fn documento_fecha_o_corpo() {
        let xml = documento_xml("<w:p/>");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<w:p/>"));
        assert!(xml.ends_with("</w:body></w:document>"));
    }
}
