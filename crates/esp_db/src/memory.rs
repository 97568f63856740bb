//! Backend de repositório em memória, usado por testes, pelo modo de
//! desenvolvimento e como padrão da CLI quando não há `DATABASE_URL`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use esp_core::models::{
    ArquivoMeta, ArquivoMidia, AtualizaCaderno, AtualizaEsp, Caderno, Categoria, DonoArquivo, Esp,
    ItemCatalogo, LogAtividade, NovoLog, Usuario,
};

use crate::error::Result;
use crate::store::{FiltroCadernos, FiltroEsps, Storage};

#[derive(Default)]
pub struct MemStorage {
    usuarios: RwLock<HashMap<Uuid, Usuario>>,
    cadernos: RwLock<HashMap<Uuid, Caderno>>,
    esps: RwLock<HashMap<Uuid, Esp>>,
    itens: RwLock<HashMap<Uuid, ItemCatalogo>>,
    arquivos: RwLock<HashMap<Uuid, ArquivoMidia>>,
    logs: RwLock<Vec<LogAtividade>>,
}

impl MemStorage {
    pub fn new() -> MemStorage {
        MemStorage::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_usuario(&self, id: Uuid) -> Result<Option<Usuario>> {
        Ok(self.usuarios.read().await.get(&id).cloned())
    }

    async fn get_usuario_por_email(&self, email: &str) -> Result<Option<Usuario>> {
        Ok(self
            .usuarios
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_usuario(&self, usuario: Usuario) -> Result<Usuario> {
        self.usuarios
            .write()
            .await
            .insert(usuario.id, usuario.clone());
        Ok(usuario)
    }

    async fn get_caderno(&self, id: Uuid) -> Result<Option<Caderno>> {
        Ok(self.cadernos.read().await.get(&id).cloned())
    }

    async fn get_cadernos(&self, ids: &[Uuid]) -> Result<Vec<Caderno>> {
        let mapa = self.cadernos.read().await;
        Ok(ids.iter().filter_map(|id| mapa.get(id).cloned()).collect())
    }

    async fn list_cadernos(&self, filtro: FiltroCadernos) -> Result<Vec<Caderno>> {
        let mut lista: Vec<Caderno> = self
            .cadernos
            .read()
            .await
            .values()
            .filter(|c| filtro.status.is_none_or(|s| c.status == s))
            .filter(|c| filtro.autor_id.is_none_or(|a| c.autor_id == a))
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(lista)
    }

    async fn create_caderno(&self, caderno: Caderno) -> Result<Caderno> {
        self.cadernos
            .write()
            .await
            .insert(caderno.id, caderno.clone());
        Ok(caderno)
    }

    async fn update_caderno(&self, id: Uuid, patch: AtualizaCaderno) -> Result<Option<Caderno>> {
        let mut mapa = self.cadernos.write().await;
        let Some(caderno) = mapa.get_mut(&id) else {
            return Ok(None);
        };
        caderno.aplicar(patch, Utc::now());
        Ok(Some(caderno.clone()))
    }

    async fn delete_caderno(&self, id: Uuid) -> Result<bool> {
        Ok(self.cadernos.write().await.remove(&id).is_some())
    }

    async fn get_esp(&self, id: Uuid) -> Result<Option<Esp>> {
        Ok(self.esps.read().await.get(&id).cloned())
    }

    async fn list_esps(&self, filtro: FiltroEsps) -> Result<Vec<Esp>> {
        let mut lista: Vec<Esp> = self
            .esps
            .read()
            .await
            .values()
            .filter(|e| filtro.caderno_id.is_none_or(|c| e.cadernos_ids.contains(&c)))
            .filter(|e| filtro.visivel.is_none_or(|v| e.visivel == v))
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(lista)
    }

    async fn create_esp(&self, esp: Esp) -> Result<Esp> {
        self.esps.write().await.insert(esp.id, esp.clone());
        Ok(esp)
    }

    async fn update_esp(&self, id: Uuid, patch: AtualizaEsp) -> Result<Option<Esp>> {
        let mut mapa = self.esps.write().await;
        let Some(esp) = mapa.get_mut(&id) else {
            return Ok(None);
        };
        esp.aplicar(patch, Utc::now());
        Ok(Some(esp.clone()))
    }

    async fn delete_esp(&self, id: Uuid) -> Result<bool> {
        Ok(self.esps.write().await.remove(&id).is_some())
    }

    async fn list_itens_ativos(&self) -> Result<Vec<ItemCatalogo>> {
        Ok(self
            .itens
            .read()
            .await
            .values()
            .filter(|i| i.ativo)
            .cloned()
            .collect())
    }

    async fn list_itens_por_categoria(&self, categoria: Categoria) -> Result<Vec<ItemCatalogo>> {
        let mut lista: Vec<ItemCatalogo> = self
            .itens
            .read()
            .await
            .values()
            .filter(|i| i.categoria == categoria)
            .cloned()
            .collect();
        lista.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(lista)
    }

    async fn get_item_por_nome(
        &self,
        categoria: Categoria,
        nome: &str,
        marca: Option<&str>,
    ) -> Result<Option<ItemCatalogo>> {
        Ok(self
            .itens
            .read()
            .await
            .values()
            .find(|i| i.categoria == categoria && i.nome == nome && i.marca.as_deref() == marca)
            .cloned())
    }

    async fn create_item(&self, item: ItemCatalogo) -> Result<ItemCatalogo> {
        self.itens.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list_arquivos_por_dono(&self, dono: DonoArquivo) -> Result<Vec<ArquivoMeta>> {
        let mut lista: Vec<ArquivoMeta> = self
            .arquivos
            .read()
            .await
            .values()
            .filter(|a| a.dono == dono)
            .map(ArquivoMeta::from)
            .collect();
        lista.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(lista)
    }

    async fn get_arquivo(&self, id: Uuid) -> Result<Option<ArquivoMidia>> {
        Ok(self.arquivos.read().await.get(&id).cloned())
    }

    async fn create_arquivo(&self, arquivo: ArquivoMidia) -> Result<ArquivoMidia> {
        self.arquivos
            .write()
            .await
            .insert(arquivo.id, arquivo.clone());
        Ok(arquivo)
    }

    async fn delete_arquivo(&self, id: Uuid) -> Result<bool> {
        Ok(self.arquivos.write().await.remove(&id).is_some())
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
        self.logs.write().await.push(registro.clone());
        Ok(registro)
    }

    async fn list_logs(&self, user_id: Option<Uuid>) -> Result<Vec<LogAtividade>> {
        let mut lista: Vec<LogAtividade> = self
            .logs
            .read()
            .await
            .iter()
            .filter(|l| user_id.is_none_or(|u| l.user_id == u))
            .cloned()
            .collect();
        lista.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(lista)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{montar_caderno, montar_esp};
    use esp_core::models::{NovoCaderno, NovoEsp};

    fn novo_esp(codigo: &str) -> NovoEsp {
        NovoEsp {
            codigo: codigo.to_string(),
            titulo: "Título".to_string(),
            tipologia: "Tipologia".to_string(),
            revisao: "R00".to_string(),
            data_publicacao: Utc::now(),
            selo: None,
            visivel: None,
            cadernos_ids: vec![],
            secoes: Default::default(),
        }
    }

    #[tokio::test]
    async fn get_cadernos_preserva_a_ordem_pedida() {
        let store = MemStorage::new();
        let autor = Uuid::new_v4();
        let agora = Utc::now();

        let c1 = montar_caderno(
            NovoCaderno {
                titulo: "Primeiro".to_string(),
                descricao: None,
                status: None,
                secoes: Default::default(),
            },
            autor,
            agora,
        );
        let c2 = montar_caderno(
            NovoCaderno {
                titulo: "Segundo".to_string(),
                descricao: None,
                status: None,
                secoes: Default::default(),
            },
            autor,
            agora,
        );
        store.create_caderno(c1.clone()).await.unwrap();
        store.create_caderno(c2.clone()).await.unwrap();

        let fantasma = Uuid::new_v4();
        let lista = store
            .get_cadernos(&[c2.id, fantasma, c1.id])
            .await
            .unwrap();
        let titulos: Vec<&str> = lista.iter().map(|c| c.titulo.as_str()).collect();
        assert_eq!(titulos, ["Segundo", "Primeiro"]);
    }

    #[tokio::test]
    async fn update_esp_ausente_devolve_none() {
        let store = MemStorage::new();
        let resultado = store
            .update_esp(Uuid::new_v4(), AtualizaEsp::default())
            .await
            .unwrap();
        assert!(resultado.is_none());
    }

    #[tokio::test]
    async fn filtro_de_esps_por_visibilidade() {
        let store = MemStorage::new();
        let autor = Uuid::new_v4();
        let agora = Utc::now();

        let mut visivel = montar_esp(novo_esp("ESP-001"), autor, agora);
        visivel.visivel = true;
        let mut oculta = montar_esp(novo_esp("ESP-002"), autor, agora);
        oculta.visivel = false;
        store.create_esp(visivel).await.unwrap();
        store.create_esp(oculta).await.unwrap();

        let lista = store
            .list_esps(FiltroEsps {
                caderno_id: None,
                visivel: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(lista.len(), 1);
        assert_eq!(lista[0].codigo, "ESP-001");
    }

    #[tokio::test]
    async fn logs_listam_mais_recentes_primeiro() {
        let store = MemStorage::new();
        let usuario = Uuid::new_v4();
        for acao in ["CRIAR_ESP", "ATUALIZAR_ESP", "EXPORTAR_PDF"] {
            store
                .create_log(NovoLog::new(usuario, acao, "alvo", "detalhes"))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let logs = store.list_logs(None).await.unwrap();
        assert_eq!(logs[0].acao, "EXPORTAR_PDF");
        assert_eq!(logs[2].acao, "CRIAR_ESP");
    }
}
