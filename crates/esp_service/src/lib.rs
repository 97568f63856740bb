//! Serviço de orquestração do sistema ESP.
//!
//! Concentra o pipeline de exportação (busca de dados, agregação de
//! seções, renderização e trilha de auditoria) e o ciclo de vida de
//! anexos. Depende apenas dos contratos `Storage` e `BlobStore`; os
//! backends concretos são injetados na montagem.

pub mod arquivos;
pub mod error;
pub mod export;
pub mod seed;

use std::sync::Arc;

use esp_db::{BlobStore, Storage};

pub use error::{Result, ServiceError};
pub use export::Exportado;

#[derive(Clone)]
pub struct EspService {
    pub store: Arc<dyn Storage>,
    pub blobs: Arc<dyn BlobStore>,
    pub bucket: String,
    /// Quando ligado, uploads são gravados como base64 junto ao registro
    /// em vez de irem ao armazenamento externo de blobs.
    uploads_inline: bool,
}

impl EspService {
    pub fn new(store: Arc<dyn Storage>, blobs: Arc<dyn BlobStore>, bucket: String) -> EspService {
        EspService {
            store,
            blobs,
            bucket,
            uploads_inline: false,
        }
    }

    /// Modo de armazenamento inline, usado em desenvolvimento e testes.
    pub fn com_uploads_inline(mut self) -> EspService {
        self.uploads_inline = true;
        self
    }
}
