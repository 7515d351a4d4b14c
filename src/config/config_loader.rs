use anyhow::{Context, Result};

use super::config_model::{Database, DotEnvyConfig, Server};

const DEFAULT_PORT: u16 = 3019;
const DEFAULT_BODY_LIMIT_MB: u64 = 1;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/plan_directory";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: env_or("SERVER_PORT", DEFAULT_PORT)?,
        body_limit: env_or("SERVER_BODY_LIMIT", DEFAULT_BODY_LIMIT_MB)?,
        timeout: env_or("SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
    };

    Ok(DotEnvyConfig { server, database })
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} is invalid", key)),
        Err(_) => Ok(default),
    }
}
