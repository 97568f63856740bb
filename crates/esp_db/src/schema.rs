//! Reconstrução do esquema a partir dos arquivos SQL embutidos no
//! binário, aplicados em uma única transação.

use rust_embed::RustEmbed;
use sqlx::{Executor, PgPool};
use std::str;

use crate::error::{Error, Result};

#[derive(RustEmbed)]
#[folder = "schema/"]
struct SchemaAssets;

/// Lê o manifesto de ordem de build e aplica todos os SQL incluídos.
pub async fn rebuild_database(pool: &PgPool) -> Result<()> {
    let manifesto = get_file_content("00_build_order.sql")
        .ok_or_else(|| Error::Database("manifesto 00_build_order.sql ausente".to_string()))?;

    let mut script = String::new();
    for linha in manifesto.lines() {
        let aparada = linha.trim();
        // Forma: -- @include arquivo.sql
        if let Some(caminho) = parse_include_directive(aparada) {
            let conteudo = get_file_content(caminho)
                .ok_or_else(|| Error::Database(format!("arquivo incluído ausente: {}", caminho)))?;
            script.push_str(&conteudo);
            script.push('\n');
        } else if !aparada.starts_with("--") {
            script.push_str(linha);
            script.push('\n');
        }
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
    tx.execute(script.as_str())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
    tx.commit().await.map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

fn get_file_content(caminho: &str) -> Option<String> {
    SchemaAssets::get(caminho).map(|f| str::from_utf8(f.data.as_ref()).unwrap_or("").to_string())
}

fn parse_include_directive(linha: &str) -> Option<&str> {
    if linha.starts_with("--") && linha.contains("@include") {
        linha.split_whitespace().last()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diretiva_include_extrai_o_caminho() {
        assert_eq!(
            parse_include_directive("-- @include 01_usuarios.sql"),
            Some("01_usuarios.sql")
        );
        assert_eq!(parse_include_directive("CREATE TABLE x ();"), None);
    }

    #[test]
    fn manifesto_referencia_arquivos_existentes() {
        let manifesto = get_file_content("00_build_order.sql").expect("manifesto embutido");
        for linha in manifesto.lines() {
            if let Some(caminho) = parse_include_directive(linha.trim()) {
                assert!(
                    get_file_content(caminho).is_some(),
                    "arquivo ausente: {}",
                    caminho
                );
            }
        }
    }
}
