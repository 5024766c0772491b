/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Shared secret for webhook signature verification. When unset, every
    /// webhook delivery is rejected as unauthorized.
    pub webhook_secret: Option<String>,
    /// Object-store connection settings for interview bundles.
    pub storage: StorageConfig,
    /// LLM settings for question generation.
    pub llm: LlmConfig,
}

/// S3-compatible object store settings (MinIO locally).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

/// OpenAI-compatible chat completions settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Questions per generated round when the request does not specify one.
    pub default_question_count: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                        |
    /// | `PORT`                   | `3000`                           |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                             |
    /// | `WEBHOOK_SECRET`         | (unset)                          |
    /// | `STORAGE_ENDPOINT`       | `http://localhost:9000`          |
    /// | `STORAGE_REGION`         | `us-east-1`                      |
    /// | `STORAGE_BUCKET`         | `parley-bundles`                 |
    /// | `STORAGE_ACCESS_KEY`     | `minioadmin`                     |
    /// | `STORAGE_SECRET_KEY`     | `minioadmin`                     |
    /// | `LLM_BASE_URL`           | `http://localhost:8001/v1`       |
    /// | `LLM_API_KEY`            | (empty)                          |
    /// | `LLM_MODEL`              | `qwen-plus`                      |
    /// | `DEFAULT_QUESTION_COUNT` | `5`                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let webhook_secret = std::env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty());

        let storage = StorageConfig {
            endpoint: std::env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into()),
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "parley-bundles".into()),
            access_key: std::env::var("STORAGE_ACCESS_KEY")
                .unwrap_or_else(|_| "minioadmin".into()),
            secret_key: std::env::var("STORAGE_SECRET_KEY")
                .unwrap_or_else(|_| "minioadmin".into()),
        };

        let llm = LlmConfig {
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8001/v1".into()),
            api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "qwen-plus".into()),
            default_question_count: std::env::var("DEFAULT_QUESTION_COUNT")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .expect("DEFAULT_QUESTION_COUNT must be a valid usize"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            webhook_secret,
            storage,
            llm,
        }
    }
}
