use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("DOCX generation error: {0}")]
    Docx(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
