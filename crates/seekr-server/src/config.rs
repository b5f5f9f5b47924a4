use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// JWT secrets that ship in sample `.env` files and must never be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("SEEKR_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("SEEKR_JWT_SECRET is unset or still a placeholder");
        }

        let port = match lookup("SEEKR_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("SEEKR_PORT is not a port number: {port}"))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("SEEKR_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("SEEKR_DB_PATH")
                .unwrap_or_else(|| "seekr.db".into())
                .into(),
            jwt_secret,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
