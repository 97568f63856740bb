//! Contrato de repositório do sistema.
//!
//! O pipeline de exportação e os handlers HTTP dependem apenas deste
//! trait; os backends concretos (memória, Postgres) são injetados na
//! montagem. Linha ausente é `Ok(None)`, nunca erro.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use esp_core::models::{
    ArquivoMeta, ArquivoMidia, AtualizaCaderno, AtualizaEsp, Caderno, Categoria, DonoArquivo, Esp,
    ItemCatalogo, LogAtividade, NovoCaderno, NovoEsp, NovoItemCatalogo, NovoLog, Selo,
    StatusCaderno, Usuario, UsuarioPublico,
};

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct FiltroCadernos {
    pub status: Option<StatusCaderno>,
    pub autor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroEsps {
    pub caderno_id: Option<Uuid>,
    pub visivel: Option<bool>,
}

#[async_trait]
pub trait Storage: Send + Sync {
    // Usuários
    async fn get_usuario(&self, id: Uuid) -> Result<Option<Usuario>>;
    async fn get_usuario_por_email(&self, email: &str) -> Result<Option<Usuario>>;
    async fn create_usuario(&self, usuario: Usuario) -> Result<Usuario>;

    // Cadernos
    async fn get_caderno(&self, id: Uuid) -> Result<Option<Caderno>>;
    /// Busca vários Cadernos preservando a ordem dos IDs pedidos;
    /// ausentes são simplesmente omitidos.
    async fn get_cadernos(&self, ids: &[Uuid]) -> Result<Vec<Caderno>>;
    async fn list_cadernos(&self, filtro: FiltroCadernos) -> Result<Vec<Caderno>>;
    async fn create_caderno(&self, caderno: Caderno) -> Result<Caderno>;
    async fn update_caderno(&self, id: Uuid, patch: AtualizaCaderno) -> Result<Option<Caderno>>;
    async fn delete_caderno(&self, id: Uuid) -> Result<bool>;

    // ESPs
    async fn get_esp(&self, id: Uuid) -> Result<Option<Esp>>;
    async fn list_esps(&self, filtro: FiltroEsps) -> Result<Vec<Esp>>;
    async fn create_esp(&self, esp: Esp) -> Result<Esp>;
    async fn update_esp(&self, id: Uuid, patch: AtualizaEsp) -> Result<Option<Esp>>;
    async fn delete_esp(&self, id: Uuid) -> Result<bool>;

    // Catálogo
    async fn list_itens_ativos(&self) -> Result<Vec<ItemCatalogo>>;
    async fn list_itens_por_categoria(&self, categoria: Categoria) -> Result<Vec<ItemCatalogo>>;
    async fn get_item_por_nome(
        &self,
        categoria: Categoria,
        nome: &str,
        marca: Option<&str>,
    ) -> Result<Option<ItemCatalogo>>;
    async fn create_item(&self, item: ItemCatalogo) -> Result<ItemCatalogo>;

    // Arquivos
    async fn list_arquivos_por_dono(&self, dono: DonoArquivo) -> Result<Vec<ArquivoMeta>>;
    async fn get_arquivo(&self, id: Uuid) -> Result<Option<ArquivoMidia>>;
    async fn create_arquivo(&self, arquivo: ArquivoMidia) -> Result<ArquivoMidia>;
    async fn delete_arquivo(&self, id: Uuid) -> Result<bool>;

    // Logs de atividade
    async fn create_log(&self, log: NovoLog) -> Result<LogAtividade>;
    /// Mais recentes primeiro.
    async fn list_logs(&self, user_id: Option<Uuid>) -> Result<Vec<LogAtividade>>;

    /// Projeção sem hash de senha, para respostas da API.
    async fn get_usuario_publico(&self, id: Uuid) -> Result<Option<UsuarioPublico>> {
        Ok(self.get_usuario(id).await?.map(UsuarioPublico::from))
    }
}

// Montadores de entidades a partir dos insumos da API. Os backends
// recebem entidades completas; a geração de IDs e carimbos acontece aqui.

pub fn montar_esp(novo: NovoEsp, autor_id: Uuid, agora: DateTime<Utc>) -> Esp {
    Esp {
        id: Uuid::new_v4(),
        codigo: novo.codigo,
        titulo: novo.titulo,
        tipologia: novo.tipologia,
        revisao: novo.revisao,
        data_publicacao: novo.data_publicacao,
        autor_id,
        selo: novo.selo.unwrap_or(Selo::Nenhum),
        visivel: novo.visivel.unwrap_or(true),
        cadernos_ids: novo.cadernos_ids,
        secoes: novo.secoes,
        created_at: agora,
        updated_at: agora,
    }
}

pub fn montar_caderno(novo: NovoCaderno, autor_id: Uuid, agora: DateTime<Utc>) -> Caderno {
    Caderno {
        id: Uuid::new_v4(),
        titulo: novo.titulo,
        descricao: novo.descricao,
        status: novo.status.unwrap_or(StatusCaderno::EmAndamento),
        autor_id,
        secoes: novo.secoes,
        created_at: agora,
        updated_at: agora,
    }
}

pub fn montar_item(
    novo: NovoItemCatalogo,
    categoria: Categoria,
    agora: DateTime<Utc>,
) -> ItemCatalogo {
    ItemCatalogo {
        id: Uuid::new_v4(),
        categoria,
        nome: novo.nome,
        marca: novo.marca,
        descricao: novo.descricao,
        ativo: true,
        created_at: agora,
    }
}
