//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/client/store traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use confab_core::auth::service::AuthService;
use confab_core::chat::service::ChatService;
use confab_core::chat::turn::TurnService;
use confab_infra::crypto::password::Argon2PasswordHasher;
use confab_infra::crypto::token::JwtTokenService;
use confab_infra::llm::openai::OpenAiClient;
use confab_infra::sqlite::chat::SqliteChatRepository;
use confab_infra::sqlite::pool::DatabasePool;
use confab_infra::sqlite::user::SqliteUserRepository;
use confab_infra::storage::{resolve_data_dir, LocalUploadStore};
use confab_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenService>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteTurnService = TurnService<SqliteChatRepository, OpenAiClient, LocalUploadStore>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub turn_service: Arc<ConcreteTurnService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    ///
    /// Secrets come from the environment: `OPENAI_API_KEY` for the completion
    /// provider and `CONFAB_JWT_SECRET` for token signing.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await?;

        // Initialize database
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("confab.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY is not set (required for completion calls)")?;
        let jwt_secret = std::env::var("CONFAB_JWT_SECRET")
            .context("CONFAB_JWT_SECRET is not set (required for token signing)")?;

        // Wire auth service
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            JwtTokenService::new(jwt_secret.as_bytes(), config.auth.token_ttl_secs),
        );

        // Wire chat service
        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        // Wire turn service with its own repository instance, the provider
        // client, and the upload store under the data dir
        let client = OpenAiClient::new(
            SecretString::from(api_key),
            config.llm.model.clone(),
            Duration::from_secs(config.llm.request_timeout_secs),
        )
        .with_base_url(config.llm.base_url.clone());

        let uploads = LocalUploadStore::new(data_dir.join("uploads"), config.uploads.max_bytes);

        let turn_service = TurnService::new(
            SqliteChatRepository::new(db_pool.clone()),
            client,
            uploads,
            config.llm.clone(),
        );

        Ok(Self {
            auth_service: Arc::new(auth_service),
            chat_service: Arc::new(chat_service),
            turn_service: Arc::new(turn_service),
            config,
            data_dir,
            db_pool,
        })
    }
}

/// Load `config.toml` from the data dir; a missing file means defaults.
async fn load_config(data_dir: &Path) -> anyhow::Result<AppConfig> {
    let path = data_dir.join("config.toml");
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}
