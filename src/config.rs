use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// 50 MiB, the per-file upload limit
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Node bits of generated ids; distinct per process writing to one database
    pub node_id: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory that `/uploads/<filename>` references are resolved against
    pub base_dir: PathBuf,
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn uploads_dir(&self) -> PathBuf {
        self.base_dir.join(crate::infrastructure::uploads::UPLOADS_DIR)
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_dir = match env::var("UPLOADS_BASE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?,
        };

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://page_builder.db?mode=rwc".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
                node_id: env::var("NODE_ID")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            },
            uploads: UploadConfig {
                base_dir,
                max_file_size: env::var("MAX_UPLOAD_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
