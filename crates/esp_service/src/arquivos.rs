//! Ciclo de vida de anexos: upload com validação, recuperação de bytes
//! pelas duas vias do ponteiro e remoção com auditoria.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use esp_core::models::{
    ArquivoMeta, ArquivoMidia, DonoArquivo, NovoLog, Ponteiro, TipoArquivo,
};
use esp_db::{BlobStore, Storage};

use crate::error::{Result, ServiceError};
use crate::EspService;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const MIMES_PERMITIDOS: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug)]
pub struct NovoUpload {
    pub dono: DonoArquivo,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EspService {
    pub async fn upload_arquivo(&self, upload: NovoUpload, solicitante: Uuid) -> Result<ArquivoMeta> {
        if !MIMES_PERMITIDOS.contains(&upload.content_type.as_str()) {
            return Err(ServiceError::Upload(
                "Tipo de arquivo não permitido".to_string(),
            ));
        }
        if upload.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ServiceError::Upload(
                "Arquivo excede o tamanho máximo de 10MB".to_string(),
            ));
        }

        let tamanho = upload.bytes.len() as i64;
        let ponteiro = if self.uploads_inline {
            Ponteiro::Inline(BASE64.encode(&upload.bytes))
        } else {
            let objeto = self
                .blobs
                .guardar(
                    &self.bucket,
                    &upload.filename,
                    &upload.content_type,
                    upload.bytes,
                )
                .await?;
            Ponteiro::externo(self.bucket.clone(), objeto)
        };

        let arquivo = ArquivoMidia {
            id: Uuid::new_v4(),
            dono: upload.dono,
            tipo: TipoArquivo::from_content_type(&upload.content_type),
            filename: upload.filename,
            content_type: upload.content_type,
            file_size: tamanho,
            ponteiro,
            created_at: Utc::now(),
        };
        let arquivo = self.store.create_arquivo(arquivo).await?;

        self.store
            .create_log(NovoLog::new(
                solicitante,
                "UPLOAD_ARQUIVO",
                arquivo.dono.id().to_string(),
                format!("Arquivo \"{}\" enviado", arquivo.filename),
            ))
            .await?;
        info!(arquivo_id = %arquivo.id, "File uploaded");

        Ok(ArquivoMeta::from(&arquivo))
    }

    /// Bytes de um anexo, pela via indicada pelo ponteiro: decodificação
    /// base64 para inline, busca no bucket nomeado para externo.
    pub async fn bytes_do_arquivo(&self, arquivo: &ArquivoMidia) -> Result<Vec<u8>> {
        match &arquivo.ponteiro {
            Ponteiro::Inline(dados) => BASE64
                .decode(dados)
                .map_err(|e| ServiceError::Decode(e.to_string())),
            Ponteiro::Externo { bucket, objeto } => Ok(self.blobs.buscar(bucket, objeto).await?),
        }
    }

    pub async fn get_arquivo(&self, id: Uuid) -> Result<ArquivoMidia> {
        self.store
            .get_arquivo(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Arquivo não encontrado".to_string()))
    }

    pub async fn list_arquivos(&self, dono: DonoArquivo) -> Result<Vec<ArquivoMeta>> {
        Ok(self.store.list_arquivos_por_dono(dono).await?)
    }

    pub async fn delete_arquivo(&self, id: Uuid, solicitante: Uuid) -> Result<()> {
        let arquivo = self.get_arquivo(id).await?;
        self.store.delete_arquivo(id).await?;
        self.store
            .create_log(NovoLog::new(
                solicitante,
                "DELETE_ARQUIVO",
                arquivo.dono.id().to_string(),
                format!("Arquivo \"{}\" deletado", arquivo.filename),
            ))
            .await?;
        info!(arquivo_id = %id, "File deleted");
        Ok(())
    }
}
