use clap::Args;
use sqlx::PgPool;

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// Confirma a destruição do esquema atual.
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(pool: PgPool, args: RebuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.force {
        return Err("rebuild destrói o esquema atual; rode com --force".into());
    }
    esp_db::schema::rebuild_database(&pool).await?;
    println!("🔨 Esquema reconstruído a partir dos assets embutidos.");
    Ok(())
}
