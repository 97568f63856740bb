//! Armazenamento externo de blobs, particionado por bucket.
//!
//! O contrato é deliberadamente pequeno: ida e volta de bytes por
//! (bucket, objeto). O backend S3 funciona tanto contra a AWS quanto
//! contra endpoints compatíveis (MinIO) via path-style.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bytes exatos gravados em `guardar`, byte a byte.
    async fn buscar(&self, bucket: &str, objeto: &str) -> Result<Vec<u8>>;

    /// Grava os bytes e devolve o identificador opaco do objeto.
    async fn guardar(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String>;
}

pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    pub fn new(client: Client) -> S3BlobStore {
        S3BlobStore { client }
    }

    /// Monta o cliente a partir do ambiente, com endpoint opcional para
    /// deployments compatíveis com S3.
    pub async fn from_env(endpoint: Option<&str>, region: &str) -> S3BlobStore {
        let region_provider =
            RegionProviderChain::default_provider().or_else(Region::new(region.to_string()));
        let aws_config = aws_config::from_env().region(region_provider).load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config).force_path_style(true);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        S3BlobStore {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn buscar(&self, bucket: &str, objeto: &str) -> Result<Vec<u8>> {
        let saida = self
            .client
            .get_object()
            .bucket(bucket)
            .key(objeto)
            .send()
            .await
            .map_err(|e| Error::Blob(e.to_string()))?;
        let corpo = saida
            .body
            .collect()
            .await
            .map_err(|e| Error::Blob(e.to_string()))?;
        Ok(corpo.to_vec())
    }

    async fn guardar(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let objeto = Uuid::new_v4().to_string();
        self.client
            .put_object()
            .bucket(bucket)
            .key(&objeto)
            .metadata("filename", filename)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| Error::Blob(e.to_string()))?;
        Ok(objeto)
    }
}

/// Backend em memória para testes e desenvolvimento.
#[derive(Default)]
pub struct MemBlobStore {
    objetos: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemBlobStore {
    pub fn new() -> MemBlobStore {
        MemBlobStore::default()
    }
}

#[async_trait]
impl BlobStore for MemBlobStore {
    async fn buscar(&self, bucket: &str, objeto: &str) -> Result<Vec<u8>> {
        self.objetos
            .read()
            .await
            .get(&(bucket.to_string(), objeto.to_string()))
            .cloned()
            .ok_or_else(|| Error::Blob(format!("objeto ausente: {}/{}", bucket, objeto)))
    }

    async fn guardar(
        &self,
        bucket: &str,
        _filename: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let objeto = Uuid::new_v4().to_string();
        self.objetos
            .write()
            .await
            .insert((bucket.to_string(), objeto.clone()), bytes);
        Ok(objeto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_byte_a_byte() {
        let store = MemBlobStore::new();
        let bytes: Vec<u8> = (0..=255).collect();
        let objeto = store
            .guardar("esp_files", "planta.png", "image/png", bytes.clone())
            .await
            .unwrap();
        let lidos = store.buscar("esp_files", &objeto).await.unwrap();
        assert_eq!(lidos, bytes);
    }

    #[tokio::test]
    async fn buckets_sao_particoes_independentes() {
        let store = MemBlobStore::new();
        let objeto = store
            .guardar("projetos", "a.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(store.buscar("esp_files", &objeto).await.is_err());
        assert!(store.buscar("projetos", &objeto).await.is_ok());
    }
}
