//! Backend Postgres do contrato `Storage`.
//!
//! Enums são persistidos como TEXT na forma SCREAMING_SNAKE_CASE, listas
//! de IDs como UUID[] e o ponteiro de armazenamento na sua forma de
//! string; o parse de volta acontece no mapeamento de linha.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use esp_core::models::{
    ArquivoMeta, ArquivoMidia, AtualizaCaderno, AtualizaEsp, Caderno, Categoria, ConteudoSecoes,
    DonoArquivo, Esp, ItemCatalogo, LogAtividade, NovoLog, Ponteiro, Usuario,
};

use crate::error::{Error, Result};
use crate::store::{FiltroCadernos, FiltroEsps, Storage};

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> PgStorage {
        PgStorage { pool }
    }
}

fn db_err(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

fn parse_err(e: String) -> Error {
    Error::Database(e)
}

const COLUNAS_SECOES: &str = "descricao_aplicacao, execucao, fichas_referencia, recebimento, \
     servicos_incluidos, criterios_medicao, legislacao, referencias, introduzir_componente, \
     constituintes_ids, acessorios_ids, acabamentos_ids, prototipos_ids, aplicacoes_ids, \
     constituintes_execucao_ids, fichas_referencia_ids, fichas_recebimento_ids, \
     servicos_incluidos_ids";

fn secoes_from_row(row: &PgRow) -> Result<ConteudoSecoes> {
    Ok(ConteudoSecoes {
        descricao_aplicacao: row.try_get("descricao_aplicacao").map_err(db_err)?,
        execucao: row.try_get("execucao").map_err(db_err)?,
        fichas_referencia: row.try_get("fichas_referencia").map_err(db_err)?,
        recebimento: row.try_get("recebimento").map_err(db_err)?,
        servicos_incluidos: row.try_get("servicos_incluidos").map_err(db_err)?,
        criterios_medicao: row.try_get("criterios_medicao").map_err(db_err)?,
        legislacao: row.try_get("legislacao").map_err(db_err)?,
        referencias: row.try_get("referencias").map_err(db_err)?,
        introduzir_componente: row.try_get("introduzir_componente").map_err(db_err)?,
        constituintes_ids: row.try_get("constituintes_ids").map_err(db_err)?,
        acessorios_ids: row.try_get("acessorios_ids").map_err(db_err)?,
        acabamentos_ids: row.try_get("acabamentos_ids").map_err(db_err)?,
        prototipos_ids: row.try_get("prototipos_ids").map_err(db_err)?,
        aplicacoes_ids: row.try_get("aplicacoes_ids").map_err(db_err)?,
        constituintes_execucao_ids: row.try_get("constituintes_execucao_ids").map_err(db_err)?,
        fichas_referencia_ids: row.try_get("fichas_referencia_ids").map_err(db_err)?,
        fichas_recebimento_ids: row.try_get("fichas_recebimento_ids").map_err(db_err)?,
        servicos_incluidos_ids: row.try_get("servicos_incluidos_ids").map_err(db_err)?,
    })
}

fn usuario_from_row(row: &PgRow) -> Result<Usuario> {
    let perfil: String = row.try_get("perfil").map_err(db_err)?;
    Ok(Usuario {
        id: row.try_get("id").map_err(db_err)?,
        nome: row.try_get("nome").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        hash_senha: row.try_get("hash_senha").map_err(db_err)?,
        perfil: perfil.parse().map_err(parse_err)?,
        ativo: row.try_get("ativo").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn caderno_from_row(row: &PgRow) -> Result<Caderno> {
    let status: String = row.try_get("status").map_err(db_err)?;
    Ok(Caderno {
        id: row.try_get("id").map_err(db_err)?,
        titulo: row.try_get("titulo").map_err(db_err)?,
        descricao: row.try_get("descricao").map_err(db_err)?,
        status: status.parse().map_err(parse_err)?,
        autor_id: row.try_get("autor_id").map_err(db_err)?,
        secoes: secoes_from_row(row)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn esp_from_row(row: &PgRow) -> Result<Esp> {
    let selo: String = row.try_get("selo").map_err(db_err)?;
    Ok(Esp {
        id: row.try_get("id").map_err(db_err)?,
        codigo: row.try_get("codigo").map_err(db_err)?,
        titulo: row.try_get("titulo").map_err(db_err)?,
        tipologia: row.try_get("tipologia").map_err(db_err)?,
        revisao: row.try_get("revisao").map_err(db_err)?,
        data_publicacao: row.try_get("data_publicacao").map_err(db_err)?,
        autor_id: row.try_get("autor_id").map_err(db_err)?,
        selo: selo.parse().map_err(parse_err)?,
        visivel: row.try_get("visivel").map_err(db_err)?,
        cadernos_ids: row.try_get("cadernos_ids").map_err(db_err)?,
        secoes: secoes_from_row(row)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn item_from_row(row: &PgRow) -> Result<ItemCatalogo> {
    let categoria: String = row.try_get("categoria").map_err(db_err)?;
    Ok(ItemCatalogo {
        id: row.try_get("id").map_err(db_err)?,
        categoria: categoria.parse().map_err(parse_err)?,
        nome: row.try_get("nome").map_err(db_err)?,
        marca: row.try_get("marca").map_err(db_err)?,
        descricao: row.try_get("descricao").map_err(db_err)?,
        ativo: row.try_get("ativo").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn dono_from_row(row: &PgRow) -> Result<DonoArquivo> {
    let esp_id: Option<Uuid> = row.try_get("esp_id").map_err(db_err)?;
    let caderno_id: Option<Uuid> = row.try_get("caderno_id").map_err(db_err)?;
    match (esp_id, caderno_id) {
        (Some(id), None) => Ok(DonoArquivo::Esp(id)),
        (None, Some(id)) => Ok(DonoArquivo::Caderno(id)),
        _ => Err(Error::Database(
            "arquivo sem dono único (esp_id/caderno_id)".to_string(),
        )),
    }
}

fn arquivo_from_row(row: &PgRow) -> Result<ArquivoMidia> {
    let tipo: String = row.try_get("tipo").map_err(db_err)?;
    let ponteiro: String = row.try_get("ponteiro").map_err(db_err)?;
    Ok(ArquivoMidia {
        id: row.try_get("id").map_err(db_err)?,
        dono: dono_from_row(row)?,
        tipo: tipo.parse().map_err(parse_err)?,
        filename: row.try_get("filename").map_err(db_err)?,
        content_type: row.try_get("content_type").map_err(db_err)?,
        file_size: row.try_get("file_size").map_err(db_err)?,
        ponteiro: Ponteiro::parse(&ponteiro),
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn log_from_row(row: &PgRow) -> Result<LogAtividade> {
    Ok(LogAtividade {
        id: row.try_get("id").map_err(db_err)?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        acao: row.try_get("acao").map_err(db_err)?,
        alvo: row.try_get("alvo").map_err(db_err)?,
        detalhes: row.try_get("detalhes").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_usuario(&self, id: Uuid) -> Result<Option<Usuario>> {
        let row = sqlx::query("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(usuario_from_row).transpose()
    }

    async fn get_usuario_por_email(&self, email: &str) -> Result<Option<Usuario>> {
        let row = sqlx::query("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(usuario_from_row).transpose()
    }

    async fn create_usuario(&self, usuario: Usuario) -> Result<Usuario> {
        sqlx::query(
            r#"
            INSERT INTO usuarios (id, nome, email, hash_senha, perfil, ativo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(usuario.id)
        .bind(&usuario.nome)
        .bind(&usuario.email)
        .bind(&usuario.hash_senha)
        .bind(usuario.perfil.as_str())
        .bind(usuario.ativo)
        .bind(usuario.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(usuario)
    }

    async fn get_caderno(&self, id: Uuid) -> Result<Option<Caderno>> {
        let row = sqlx::query("SELECT * FROM cadernos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(caderno_from_row).transpose()
    }

    async fn get_cadernos(&self, ids: &[Uuid]) -> Result<Vec<Caderno>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query("SELECT * FROM cadernos WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        let encontrados = rows
            .iter()
            .map(caderno_from_row)
            .collect::<Result<Vec<_>>>()?;
        // O banco não garante a ordem do ANY; reordena pela lista pedida.
        let mut ordenados = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(caderno) = encontrados.iter().find(|c| c.id == *id) {
                ordenados.push(caderno.clone());
            }
        }
        Ok(ordenados)
    }

    async fn list_cadernos(&self, filtro: FiltroCadernos) -> Result<Vec<Caderno>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM cadernos
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR autor_id = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filtro.status.map(|s| s.as_str().to_string()))
        .bind(filtro.autor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(caderno_from_row).collect()
    }

    async fn create_caderno(&self, caderno: Caderno) -> Result<Caderno> {
        sqlx::query(
            r#"
            INSERT INTO cadernos
            (id, titulo, descricao, status, autor_id,
             descricao_aplicacao, execucao, fichas_referencia, recebimento,
             servicos_incluidos, criterios_medicao, legislacao, referencias,
             introduzir_componente, constituintes_ids, acessorios_ids,
             acabamentos_ids, prototipos_ids, aplicacoes_ids,
             constituintes_execucao_ids, fichas_referencia_ids,
             fichas_recebimento_ids, servicos_incluidos_ids,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            "#,
        )
        .bind(caderno.id)
        .bind(&caderno.titulo)
        .bind(&caderno.descricao)
        .bind(caderno.status.as_str())
        .bind(caderno.autor_id)
        .bind(&caderno.secoes.descricao_aplicacao)
        .bind(&caderno.secoes.execucao)
        .bind(&caderno.secoes.fichas_referencia)
        .bind(&caderno.secoes.recebimento)
        .bind(&caderno.secoes.servicos_incluidos)
        .bind(&caderno.secoes.criterios_medicao)
        .bind(&caderno.secoes.legislacao)
        .bind(&caderno.secoes.referencias)
        .bind(&caderno.secoes.introduzir_componente)
        .bind(&caderno.secoes.constituintes_ids)
        .bind(&caderno.secoes.acessorios_ids)
        .bind(&caderno.secoes.acabamentos_ids)
        .bind(&caderno.secoes.prototipos_ids)
        .bind(&caderno.secoes.aplicacoes_ids)
        .bind(&caderno.secoes.constituintes_execucao_ids)
        .bind(&caderno.secoes.fichas_referencia_ids)
        .bind(&caderno.secoes.fichas_recebimento_ids)
        .bind(&caderno.secoes.servicos_incluidos_ids)
        .bind(caderno.created_at)
        .bind(caderno.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(caderno)
    }

    async fn update_caderno(&self, id: Uuid, patch: AtualizaCaderno) -> Result<Option<Caderno>> {
        let Some(mut caderno) = self.get_caderno(id).await? else {
            return Ok(None);
        };
        caderno.aplicar(patch, Utc::now());
        sqlx::query(&format!(
            r#"
            UPDATE cadernos SET
            titulo = $2, descricao = $3, status = $4, updated_at = $5,
            ({}) = ($6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23)
            WHERE id = $1
            "#,
            COLUNAS_SECOES
        ))
        .bind(caderno.id)
        .bind(&caderno.titulo)
        .bind(&caderno.descricao)
        .bind(caderno.status.as_str())
        .bind(caderno.updated_at)
        .bind(&caderno.secoes.descricao_aplicacao)
        .bind(&caderno.secoes.execucao)
        .bind(&caderno.secoes.fichas_referencia)
        .bind(&caderno.secoes.recebimento)
        .bind(&caderno.secoes.servicos_incluidos)
        .bind(&caderno.secoes.criterios_medicao)
        .bind(&caderno.secoes.legislacao)
        .bind(&caderno.secoes.referencias)
        .bind(&caderno.secoes.introduzir_componente)
        .bind(&caderno.secoes.constituintes_ids)
        .bind(&caderno.secoes.acessorios_ids)
        .bind(&caderno.secoes.acabamentos_ids)
        .bind(&caderno.secoes.prototipos_ids)
        .bind(&caderno.secoes.aplicacoes_ids)
        .bind(&caderno.secoes.constituintes_execucao_ids)
        .bind(&caderno.secoes.fichas_referencia_ids)
        .bind(&caderno.secoes.fichas_recebimento_ids)
        .bind(&caderno.secoes.servicos_incluidos_ids)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(Some(caderno))
    }

    async fn delete_caderno(&self, id: Uuid) -> Result<bool> {
        let feito = sqlx::query("DELETE FROM cadernos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(feito.rows_affected() > 0)
    }

    async fn get_esp(&self, id: Uuid) -> Result<Option<Esp>> {
        let row = sqlx::query("SELECT * FROM esps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(esp_from_row).transpose()
    }

    async fn list_esps(&self, filtro: FiltroEsps) -> Result<Vec<Esp>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM esps
            WHERE ($1::uuid IS NULL OR $1 = ANY(cadernos_ids))
              AND ($2::boolean IS NULL OR visivel = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filtro.caderno_id)
        .bind(filtro.visivel)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(esp_from_row).collect()
    }

    async fn create_esp(&self, esp: Esp) -> Result<Esp> {
        sqlx::query(
            r#"
            INSERT INTO esps
            (id, codigo, titulo, tipologia, revisao, data_publicacao, autor_id,
             selo, visivel, cadernos_ids,
             descricao_aplicacao, execucao, fichas_referencia, recebimento,
             servicos_incluidos, criterios_medicao, legislacao, referencias,
             introduzir_componente, constituintes_ids, acessorios_ids,
             acabamentos_ids, prototipos_ids, aplicacoes_ids,
             constituintes_execucao_ids, fichas_referencia_ids,
             fichas_recebimento_ids, servicos_incluidos_ids,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24,
                    $25, $26, $27, $28, $29, $30)
            "#,
        )
        .bind(esp.id)
        .bind(&esp.codigo)
        .bind(&esp.titulo)
        .bind(&esp.tipologia)
        .bind(&esp.revisao)
        .bind(esp.data_publicacao)
        .bind(esp.autor_id)
        .bind(esp.selo.as_str())
        .bind(esp.visivel)
        .bind(&esp.cadernos_ids)
        .bind(&esp.secoes.descricao_aplicacao)
        .bind(&esp.secoes.execucao)
        .bind(&esp.secoes.fichas_referencia)
        .bind(&esp.secoes.recebimento)
        .bind(&esp.secoes.servicos_incluidos)
        .bind(&esp.secoes.criterios_medicao)
        .bind(&esp.secoes.legislacao)
        .bind(&esp.secoes.referencias)
        .bind(&esp.secoes.introduzir_componente)
        .bind(&esp.secoes.constituintes_ids)
        .bind(&esp.secoes.acessorios_ids)
        .bind(&esp.secoes.acabamentos_ids)
        .bind(&esp.secoes.prototipos_ids)
        .bind(&esp.secoes.aplicacoes_ids)
        .bind(&esp.secoes.constituintes_execucao_ids)
        .bind(&esp.secoes.fichas_referencia_ids)
        .bind(&esp.secoes.fichas_recebimento_ids)
        .bind(&esp.secoes.servicos_incluidos_ids)
        .bind(esp.created_at)
        .bind(esp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(esp)
    }

    async fn update_esp(&self, id: Uuid, patch: AtualizaEsp) -> Result<Option<Esp>> {
        let Some(mut esp) = self.get_esp(id).await? else {
            return Ok(None);
        };
        esp.aplicar(patch, Utc::now());
        sqlx::query(&format!(
            r#"
            UPDATE esps SET
            codigo = $2, titulo = $3, tipologia = $4, revisao = $5,
            data_publicacao = $6, selo = $7, visivel = $8, cadernos_ids = $9,
            updated_at = $10,
            ({}) = ($11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21,
                    $22, $23, $24, $25, $26, $27, $28)
            WHERE id = $1
            "#,
            COLUNAS_SECOES
        ))
        .bind(esp.id)
        .bind(&esp.codigo)
        .bind(&esp.titulo)
        .bind(&esp.tipologia)
        .bind(&esp.revisao)
        .bind(esp.data_publicacao)
        .bind(esp.selo.as_str())
        .bind(esp.visivel)
        .bind(&esp.cadernos_ids)
        .bind(esp.updated_at)
        .bind(&esp.secoes.descricao_aplicacao)
        .bind(&esp.secoes.execucao)
        .bind(&esp.secoes.fichas_referencia)
        .bind(&esp.secoes.recebimento)
        .bind(&esp.secoes.servicos_incluidos)
        .bind(&esp.secoes.criterios_medicao)
        .bind(&esp.secoes.legislacao)
        .bind(&esp.secoes.referencias)
        .bind(&esp.secoes.introduzir_componente)
        .bind(&esp.secoes.constituintes_ids)
        .bind(&esp.secoes.acessorios_ids)
        .bind(&esp.secoes.acabamentos_ids)
        .bind(&esp.secoes.prototipos_ids)
        .bind(&esp.secoes.aplicacoes_ids)
        .bind(&esp.secoes.constituintes_execucao_ids)
        .bind(&esp.secoes.fichas_referencia_ids)
        .bind(&esp.secoes.fichas_recebimento_ids)
        .bind(&esp.secoes.servicos_incluidos_ids)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(Some(esp))
    }

    async fn delete_esp(&self, id: Uuid) -> Result<bool> {
        let feito = sqlx::query("DELETE FROM esps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(feito.rows_affected() > 0)
    }

    async fn list_itens_ativos(&self) -> Result<Vec<ItemCatalogo>> {
        let rows = sqlx::query("SELECT * FROM itens_catalogo WHERE ativo = TRUE")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(item_from_row).collect()
    }

    async fn list_itens_por_categoria(&self, categoria: Categoria) -> Result<Vec<ItemCatalogo>> {
        let rows =
            sqlx::query("SELECT * FROM itens_catalogo WHERE categoria = $1 ORDER BY nome ASC")
                .bind(categoria.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        rows.iter().map(item_from_row).collect()
    }

    async fn get_item_por_nome(
        &self,
        categoria: Categoria,
        nome: &str,
        marca: Option<&str>,
    ) -> Result<Option<ItemCatalogo>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM itens_catalogo
            WHERE categoria = $1 AND nome = $2 AND marca IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(categoria.as_str())
        .bind(nome)
        .bind(marca)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn create_item(&self, item: ItemCatalogo) -> Result<ItemCatalogo> {
        sqlx::query(
            r#"
            INSERT INTO itens_catalogo
            (id, categoria, nome, marca, descricao, ativo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id)
        .bind(item.categoria.as_str())
        .bind(&item.nome)
        .bind(&item.marca)
        .bind(&item.descricao)
        .bind(item.ativo)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(item)
    }

    async fn list_arquivos_por_dono(&self, dono: DonoArquivo) -> Result<Vec<ArquivoMeta>> {
        let (esp_id, caderno_id) = match dono {
            DonoArquivo::Esp(id) => (Some(id), None),
            DonoArquivo::Caderno(id) => (None, Some(id)),
        };
        let rows = sqlx::query(
            r#"
            SELECT id, esp_id, caderno_id, tipo, filename, content_type,
                   file_size, ponteiro, created_at
            FROM arquivos_midia
            WHERE esp_id IS NOT DISTINCT FROM $1
              AND caderno_id IS NOT DISTINCT FROM $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(esp_id)
        .bind(caderno_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter()
            .map(|row| arquivo_from_row(row).map(|a| ArquivoMeta::from(&a)))
            .collect()
    }

    async fn get_arquivo(&self, id: Uuid) -> Result<Option<ArquivoMidia>> {
        let row = sqlx::query("SELECT * FROM arquivos_midia WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(arquivo_from_row).transpose()
    }

    async fn create_arquivo(&self, arquivo: ArquivoMidia) -> Result<ArquivoMidia> {
        let (esp_id, caderno_id) = match arquivo.dono {
            DonoArquivo::Esp(id) => (Some(id), None),
            DonoArquivo::Caderno(id) => (None, Some(id)),
        };
        sqlx::query(
            r#"
            INSERT INTO arquivos_midia
            (id, esp_id, caderno_id, tipo, filename, content_type, file_size,
             ponteiro, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(arquivo.id)
        .bind(esp_id)
        .bind(caderno_id)
        .bind(arquivo.tipo.as_str())
        .bind(&arquivo.filename)
        .bind(&arquivo.content_type)
        .bind(arquivo.file_size)
        .bind(arquivo.ponteiro.to_string())
        .bind(arquivo.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(arquivo)
    }

    async fn delete_arquivo(&self, id: Uuid) -> Result<bool> {
        let feito = sqlx::query("DELETE FROM arquivos_midia WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(feito.rows_affected() > 0)
    }

    async fn create_log(&self, log: NovoLog) -> Result<LogAtividade> {
        let registro = LogAtividade {
            id: Uuid::new_v4(),
            user_id: log.user_id,
            acao: log.acao,
            alvo: log.alvo,
            detalhes: log.detalhes,
            created_at: Utc::now(),
        };
        sqlx::query(
            r#"
            INSERT INTO logs_atividade (id, user_id, acao, alvo, detalhes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(registro.id)
        .bind(registro.user_id)
        .bind(&registro.acao)
        .bind(&registro.alvo)
        .bind(&registro.detalhes)
        .bind(registro.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(registro)
    }

    async fn list_logs(&self, user_id: Option<Uuid>) -> Result<Vec<LogAtividade>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM logs_atividade
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(log_from_row).collect()
    }
}
