use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Documento, autor ou arquivo ausente; aborta antes de qualquer
    /// geração de bytes. A mensagem é a resposta para o usuário.
    #[error("{0}")]
    NotFound(String),

    /// Upload recusado (tipo de arquivo ou tamanho).
    #[error("{0}")]
    Upload(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] esp_db::Error),

    #[error(transparent)]
    Render(#[from] esp_core::CoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
