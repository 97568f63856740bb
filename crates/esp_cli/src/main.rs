// esp_cli/src/main.rs
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

use esp_cli::commands;
use esp_cli::config::Config;

#[derive(Parser)]
#[command(name = "esp_forge")]
#[command(about = "Gestão e exportação de especificações técnicas (ESPs)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sobe o servidor HTTP (memória sem DATABASE_URL, Postgres com)
    Serve(commands::serve::ServeArgs),

    /// Popula usuários e catálogo no banco configurado
    Seed(commands::seed::SeedArgs),

    /// Exporta uma ESP ou um Caderno para PDF/DOCX em disco
    Export(commands::export::ExportArgs),

    /// Reconstrói o esquema do banco a partir dos assets embutidos
    Rebuild(commands::rebuild::RebuildArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Configuração primeiro: falha cedo se o ambiente estiver inválido.
    let config = Config::from_env()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            commands::serve::execute(config, args).await?;
        }
        Commands::Seed(args) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(config.require_database_url()?)
                .await?;
            commands::seed::execute(pool, config, args).await?;
        }
        Commands::Export(args) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(config.require_database_url()?)
                .await?;
            commands::export::execute(pool, config, args).await?;
        }
        Commands::Rebuild(args) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(config.require_database_url()?)
                .await?;
            commands::rebuild::execute(pool, args).await?;
        }
    }

    Ok(())
}
