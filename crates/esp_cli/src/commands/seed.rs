use clap::Args;
use sqlx::PgPool;

use esp_db::PgStorage;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct SeedArgs {}

pub async fn execute(
    pool: PgPool,
    _config: Config,
    _args: SeedArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = PgStorage::new(pool);
    esp_service::seed::seed_database(&store).await?;
    println!("🌱 Seed concluído: usuários e catálogo carregados.");
    Ok(())
}
