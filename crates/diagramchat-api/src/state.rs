//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and HTTP.
//! `ChatService` is generic over its repository; AppState pins it to SQLite.

use std::path::PathBuf;
use std::sync::Arc;

use diagramchat_core::chat::service::{ChatService, GenerationSettings};
use diagramchat_core::llm::box_provider::BoxLlmProvider;
use diagramchat_infra::config::{Secrets, load_global_config};
use diagramchat_infra::crypto::signer::SessionSigner;
use diagramchat_infra::llm::create_provider;
use diagramchat_infra::sqlite::chat::SqliteChatRepository;
use diagramchat_infra::sqlite::pool::{DatabasePool, database_url};
use diagramchat_types::config::GlobalConfig;
use minijinja::Environment;
use secrecy::SecretString;

use crate::http::templates::build_templates;

/// Concrete type alias for the chat service pinned to the SQLite repository.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Directory served under `/static` unless `DIAGRAMCHAT_WEB_DIR` overrides it.
const DEFAULT_WEB_DIR: &str = "web/static";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub signer: SessionSigner,
    pub templates: Arc<Environment<'static>>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub web_dir: Option<PathBuf>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config and secrets, open the
    /// database, wire the provider and services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let secrets = Secrets::from_env();

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let llm = create_provider(&config, &secrets.api_key);

        let web_dir = std::env::var("DIAGRAMCHAT_WEB_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEB_DIR));

        let mut state = Self::from_parts(db_pool, llm, config, secrets.session_secret, data_dir)?;
        state.web_dir = Some(web_dir);
        Ok(state)
    }

    /// Assemble state from already-built collaborators.
    ///
    /// Static file serving is off until `web_dir` is set.
    pub fn from_parts(
        db_pool: DatabasePool,
        llm: BoxLlmProvider,
        config: GlobalConfig,
        session_secret: SecretString,
        data_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            llm,
            GenerationSettings::from(&config),
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            signer: SessionSigner::new(&session_secret)
                .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?,
            templates: Arc::new(build_templates()?),
            config: Arc::new(config),
            data_dir,
            web_dir: None,
            db_pool,
        })
    }
}
