use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use sqlx::PgPool;
use uuid::Uuid;

use esp_db::{PgStorage, S3BlobStore, Storage};
use esp_service::EspService;

use crate::config::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Formato {
    Pdf,
    Docx,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// UUID da ESP a exportar.
    #[arg(long, conflicts_with = "caderno")]
    pub esp: Option<Uuid>,

    /// UUID do Caderno a exportar.
    #[arg(long)]
    pub caderno: Option<Uuid>,

    #[arg(short, long, value_enum, default_value = "pdf")]
    pub format: Formato,

    /// Arquivo de saída; por omissão usa o nome sugerido pela exportação.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// UUID do usuário solicitante (para a trilha de auditoria); por
    /// omissão usa o diretor da carga inicial.
    #[arg(long)]
    pub user: Option<Uuid>,
}

pub async fn execute(
    pool: PgPool,
    config: Config,
    args: ExportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(PgStorage::new(pool));
    let blobs = S3BlobStore::from_env(config.s3_endpoint.as_deref(), &config.s3_region).await;
    let service = EspService::new(store.clone(), Arc::new(blobs), config.s3_bucket.clone());

    let solicitante = match args.user {
        Some(id) => id,
        None => store
            .get_usuario_por_email("diretor@seedf.df.gov.br")
            .await?
            .map(|u| u.id)
            .ok_or("nenhum usuário solicitante; informe --user")?,
    };

    let exportado = match (args.esp, args.caderno, args.format) {
        (Some(esp_id), _, Formato::Pdf) => service.export_esp_pdf(esp_id, solicitante).await?,
        (Some(esp_id), _, Formato::Docx) => service.export_esp_docx(esp_id, solicitante).await?,
        (None, Some(caderno_id), Formato::Pdf) => {
            service.export_caderno_pdf(caderno_id, solicitante).await?
        }
        (None, Some(caderno_id), Formato::Docx) => {
            service.export_caderno_docx(caderno_id, solicitante).await?
        }
        (None, None, _) => return Err("informe --esp ou --caderno".into()),
    };

    let destino = args
        .output
        .unwrap_or_else(|| PathBuf::from(&exportado.filename));
    std::fs::write(&destino, &exportado.bytes)?;
    println!(
        "🎉 Exportação concluída: {:?} ({} bytes)",
        destino,
        exportado.bytes.len()
    );
    Ok(())
}
