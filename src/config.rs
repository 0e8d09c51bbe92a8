/// Configuration management for the Trimbook client
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub backend: BackendConfig,
    pub token_storage: TokenStorageConfig,
    pub avatar_storage: AvatarStorageConfig,
}

/// HTTP-level configuration shared by all backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// User-Agent header for outgoing requests
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            user_agent: "Trimbook/0.1".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Which backend integration to speak
///
/// The platform has gone through two backend iterations; both remain
/// supported behind the same client interface and the choice is made here,
/// at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    /// Token-authenticated REST API (the current iteration)
    Rest { base_url: String },
    /// Hosted database-as-a-service API (the earlier iteration)
    Hosted { base_url: String, api_key: String },
}

/// Token persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TokenStorageConfig {
    /// Process-local only; the session does not survive a restart
    Memory,
    /// JSON file on disk, surviving restarts
    Disk { path: PathBuf },
}

/// Avatar asset storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AvatarStorageConfig {
    /// Process-local, for tests and prototyping
    Memory,
    /// Local filesystem under a base directory
    Disk { location: PathBuf },
    /// HTTP object storage endpoint serving public URLs
    Http { base_url: String },
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let user_agent =
            env::var("TRIMBOOK_USER_AGENT").unwrap_or_else(|_| "Trimbook/0.1".to_string());
        let timeout_secs = env::var("TRIMBOOK_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ClientError::Validation("Invalid HTTP timeout".to_string()))?;

        let data_directory: PathBuf = env::var("TRIMBOOK_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let backend = match env::var("TRIMBOOK_BACKEND")
            .unwrap_or_else(|_| "rest".to_string())
            .to_lowercase()
            .as_str()
        {
            "rest" => BackendConfig::Rest {
                base_url: env::var("TRIMBOOK_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            },
            "hosted" => BackendConfig::Hosted {
                base_url: env::var("TRIMBOOK_HOSTED_URL").map_err(|_| {
                    ClientError::Validation("Hosted backend URL required".to_string())
                })?,
                api_key: env::var("TRIMBOOK_HOSTED_API_KEY").map_err(|_| {
                    ClientError::Validation("Hosted backend API key required".to_string())
                })?,
            },
            other => {
                return Err(ClientError::Validation(format!(
                    "Unknown backend kind: {}",
                    other
                )))
            }
        };

        let token_storage = match env::var("TRIMBOOK_TOKEN_STORAGE")
            .unwrap_or_else(|_| "disk".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => TokenStorageConfig::Memory,
            _ => TokenStorageConfig::Disk {
                path: env::var("TRIMBOOK_TOKEN_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("tokens.json")),
            },
        };

        let avatar_storage = if let Ok(base_url) = env::var("TRIMBOOK_AVATAR_STORAGE_URL") {
            AvatarStorageConfig::Http { base_url }
        } else {
            AvatarStorageConfig::Disk {
                location: env::var("TRIMBOOK_AVATAR_DISK_LOCATION")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("avatars")),
            }
        };

        let config = ClientConfig {
            api: ApiConfig {
                user_agent,
                timeout_secs,
            },
            backend,
            token_storage,
            avatar_storage,
        };

        config.validate()?;
        Ok(config)
    }

    /// Convenience configuration for a REST backend with in-memory stores
    pub fn rest(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::default(),
            backend: BackendConfig::Rest {
                base_url: base_url.into(),
            },
            token_storage: TokenStorageConfig::Memory,
            avatar_storage: AvatarStorageConfig::Memory,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ClientResult<()> {
        if self.api.timeout_secs == 0 {
            return Err(ClientError::Validation(
                "HTTP timeout must be positive".to_string(),
            ));
        }

        match &self.backend {
            BackendConfig::Rest { base_url } => Self::validate_base_url(base_url)?,
            BackendConfig::Hosted { base_url, api_key } => {
                Self::validate_base_url(base_url)?;
                if api_key.trim().is_empty() {
                    return Err(ClientError::Validation(
                        "Hosted backend API key must not be empty".to_string(),
                    ));
                }
            }
        }

        if let AvatarStorageConfig::Http { base_url } = &self.avatar_storage {
            Self::validate_base_url(base_url)?;
        }

        Ok(())
    }

    fn validate_base_url(base_url: &str) -> ClientResult<()> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Validation(format!(
                "Base URL must be http(s): {}",
                base_url
            )));
        }
        Ok(())
    }
}
