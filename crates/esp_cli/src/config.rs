use std::env;

use anyhow::Result;
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    /// Ausente, a CLI sobe com o backend em memória.
    pub database_url: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_bucket: String,
    pub s3_region: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Carrega .env se presente

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok(),

            s3_endpoint: env::var("S3_ENDPOINT").ok(),

            s3_bucket: env::var("S3_BUCKET")
                .unwrap_or_else(|_| esp_core::models::BUCKET_PADRAO.to_string()),

            s3_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))
    }
}
