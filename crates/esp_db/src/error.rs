use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Blob storage error: {0}")]
    Blob(String),
}

pub type Result<T> = std::result::Result<T, Error>;
