//! Chat service orchestrating session lifecycle, persistence, and generation.
//!
//! ChatService sits between the HTTP handlers and the two collaborators it
//! owns: the `ChatRepository` for durable turns and the boxed LLM provider
//! for replies. Storage failures are logged here and turned into neutral
//! results (empty lists, a session id that may not be backed by a row) so the
//! request layer only ever sees validation and generation errors.

use diagramchat_types::chat::{
    contains_diagram, new_session_id, ChatMessage, MessageRole, SessionSummary,
};
use diagramchat_types::config::GlobalConfig;
use diagramchat_types::error::ChatError;
use diagramchat_types::llm::CompletionRequest;
use tracing::{debug, error, info};

use crate::chat::context::build_prompt;
use crate::chat::repository::ChatRepository;
use crate::llm::box_provider::BoxLlmProvider;

/// Prefix of the assistant turn stored when the provider call fails.
pub const AI_ERROR_PREFIX: &str = "AI service error: ";

/// Parameters of every generation call and history read.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub context_window: usize,
    pub history_limit: i64,
}

impl From<&GlobalConfig> for GenerationSettings {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            context_window: config.context_window,
            history_limit: config.history_limit,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&GlobalConfig::default())
    }
}

/// A successful assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub has_diagram: bool,
}

/// Orchestrates one conversation turn end to end.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (diagramchat-core never depends on diagramchat-infra).
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
    llm: BoxLlmProvider,
    settings: GenerationSettings,
}

impl<C: ChatRepository> ChatService<C> {
    pub fn new(chat_repo: C, llm: BoxLlmProvider, settings: GenerationSettings) -> Self {
        Self {
            chat_repo,
            llm,
            settings,
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Reject empty or whitespace-only input, returning the trimmed text.
    pub fn validate_message(text: &str) -> Result<&str, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(trimmed)
    }

    // --- Session lifecycle ---

    /// Mint a new session id and create its backing row.
    ///
    /// A storage failure is logged and the id is still returned.
    pub async fn open_session(&self) -> String {
        let session_id = new_session_id();
        match self.chat_repo.create_session(&session_id).await {
            Ok(_) => info!(session_id = %session_id, "Chat session created"),
            Err(e) => error!(session_id = %session_id, error = %e, "Failed to create chat session"),
        }
        session_id
    }

    /// Return the caller's session id, opening a new session if there is none.
    ///
    /// An existing id gets its backing row recreated when it is missing (a
    /// wiped database, or an earlier failed insert). The boolean is `true`
    /// when a new id was minted and must be handed back to the caller.
    pub async fn ensure_session(&self, current: Option<&str>) -> (String, bool) {
        let Some(id) = current else {
            return (self.open_session().await, true);
        };

        match self.chat_repo.create_session(id).await {
            Ok(true) => info!(session_id = %id, "Recreated missing chat session"),
            Ok(false) => {}
            Err(e) => error!(session_id = %id, error = %e, "Failed to ensure chat session"),
        }
        (id.to_string(), false)
    }

    /// Stored history for a session, capped at the configured limit.
    ///
    /// Returns an empty list on storage failure.
    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.history_with_limit(session_id, self.settings.history_limit)
            .await
    }

    pub async fn history_with_limit(&self, session_id: &str, limit: i64) -> Vec<ChatMessage> {
        match self.chat_repo.read_history(session_id, limit).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to read chat history");
                Vec::new()
            }
        }
    }

    /// All sessions with message counts; empty on storage failure.
    pub async fn sessions(&self) -> Vec<SessionSummary> {
        match self.chat_repo.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!(error = %e, "Failed to list chat sessions");
                Vec::new()
            }
        }
    }

    // --- Conversation turn ---

    /// Store the user's message, ask the provider for a reply, store the reply.
    ///
    /// On provider failure an assistant turn carrying the error text is stored
    /// and the same text is returned as `ChatError::Generation`.
    pub async fn send_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        let text = Self::validate_message(text)?;

        self.store_turn(session_id, MessageRole::User, text).await;

        let context = self.recent_context(session_id).await;
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: build_prompt(&context, self.settings.context_window),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        debug!(
            session_id = %session_id,
            provider = self.llm.name(),
            context_messages = request.messages.len() - 1,
            "Requesting completion"
        );

        match self.llm.complete(&request).await {
            Ok(response) => {
                info!(
                    session_id = %session_id,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    stop_reason = %response.stop_reason,
                    "Completion received"
                );
                self.store_turn(session_id, MessageRole::Assistant, &response.content)
                    .await;
                Ok(ChatReply {
                    has_diagram: contains_diagram(&response.content),
                    response: response.content,
                })
            }
            Err(e) => {
                let message = format!("{AI_ERROR_PREFIX}{e}");
                error!(session_id = %session_id, error = %e, "Completion failed");
                self.store_turn(session_id, MessageRole::Assistant, &message)
                    .await;
                Err(ChatError::Generation(message))
            }
        }
    }

    /// The newest `context_window` turns; empty on storage failure.
    async fn recent_context(&self, session_id: &str) -> Vec<ChatMessage> {
        let window = i64::try_from(self.settings.context_window).unwrap_or(i64::MAX);
        match self.chat_repo.recent_messages(session_id, window).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to read chat context");
                Vec::new()
            }
        }
    }

    async fn store_turn(&self, session_id: &str, role: MessageRole, content: &str) {
        if let Err(e) = self.chat_repo.append_message(session_id, role, content).await {
            error!(session_id = %session_id, role = %role, error = %e, "Failed to save message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use chrono::Utc;
    use diagramchat_types::chat::ChatSession;
    use diagramchat_types::error::RepositoryError;
    use diagramchat_types::llm::{CompletionResponse, LlmError, StopReason, Usage};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryChatRepository {
        sessions: Mutex<Vec<ChatSession>>,
        messages: Mutex<Vec<ChatMessage>>,
    }

    impl ChatRepository for MemoryChatRepository {
        async fn create_session(&self, session_id: &str) -> Result<bool, RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            if sessions.iter().any(|s| s.id == session_id) {
                return Ok(false);
            }
            let now = Utc::now();
            sessions.push(ChatSession {
                id: session_id.to_string(),
                created_at: now,
                updated_at: now,
            });
            Ok(true)
        }

        async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions.iter().find(|s| s.id == session_id).cloned())
        }

        async fn append_message(
            &self,
            session_id: &str,
            role: MessageRole,
            content: &str,
        ) -> Result<ChatMessage, RepositoryError> {
            if !self.sessions.lock().unwrap().iter().any(|s| s.id == session_id) {
                return Err(RepositoryError::NotFound);
            }
            let mut messages = self.messages.lock().unwrap();
            let message = ChatMessage {
                id: messages.len() as i64 + 1,
                session_id: session_id.to_string(),
                role,
                content: content.to_string(),
                created_at: Utc::now(),
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn read_history(
            &self,
            session_id: &str,
            limit: i64,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .filter(|m| m.session_id == session_id)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn recent_messages(
            &self,
            session_id: &str,
            limit: i64,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let messages = self.messages.lock().unwrap();
            let owned: Vec<ChatMessage> = messages
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect();
            let start = owned.len().saturating_sub(limit as usize);
            Ok(owned[start..].to_vec())
        }

        async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    /// Repository whose every call fails, as a locked or corrupt database would.
    struct FailingChatRepository;

    fn storage_down() -> RepositoryError {
        RepositoryError::Query("database is locked".to_string())
    }

    impl ChatRepository for FailingChatRepository {
        async fn create_session(&self, _session_id: &str) -> Result<bool, RepositoryError> {
            Err(storage_down())
        }

        async fn get_session(&self, _session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
            Err(storage_down())
        }

        async fn append_message(
            &self,
            _session_id: &str,
            _role: MessageRole,
            _content: &str,
        ) -> Result<ChatMessage, RepositoryError> {
            Err(storage_down())
        }

        async fn read_history(
            &self,
            _session_id: &str,
            _limit: i64,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            Err(storage_down())
        }

        async fn recent_messages(
            &self,
            _session_id: &str,
            _limit: i64,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            Err(storage_down())
        }

        async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError> {
            Err(storage_down())
        }
    }

    /// Provider that records every request and answers with a fixed outcome.
    struct ScriptedProvider {
        reply: Result<String, String>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Err(message) => Err(LlmError::Provider {
                    message: message.clone(),
                }),
            }
        }
    }

    fn service_with<C: ChatRepository>(
        repo: C,
        reply: Result<&str, &str>,
    ) -> (ChatService<C>, Arc<Mutex<Vec<CompletionRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
            requests: requests.clone(),
        };
        let svc = ChatService::new(
            repo,
            BoxLlmProvider::new(provider),
            GenerationSettings::default(),
        );
        (svc, requests)
    }

    fn service(
        reply: Result<&str, &str>,
    ) -> (
        ChatService<MemoryChatRepository>,
        Arc<Mutex<Vec<CompletionRequest>>>,
    ) {
        service_with(MemoryChatRepository::default(), reply)
    }

    #[tokio::test]
    async fn test_send_message_stores_both_turns() {
        let (svc, requests) = service(Ok("Hello there"));
        let session_id = svc.open_session().await;

        let reply = svc.send_message(&session_id, "  hi  ").await.unwrap();
        assert_eq!(reply.response, "Hello there");
        assert!(!reply.has_diagram);

        let history = svc.history(&session_id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].role, MessageRole::Assistant);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 2000);
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].model, "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_reply_with_mermaid_block_flags_diagram() {
        let (svc, _) = service(Ok("```mermaid\ngraph TD; A-->B\n```"));
        let session_id = svc.open_session().await;
        let reply = svc.send_message(&session_id, "draw").await.unwrap();
        assert!(reply.has_diagram);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_mutation() {
        let (svc, requests) = service(Ok("unused"));
        let session_id = svc.open_session().await;

        let err = svc.send_message(&session_id, " \n\t ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert!(svc.history(&session_id).await.is_empty());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_stores_error_turn() {
        let (svc, _) = service(Err("connection refused"));
        let session_id = svc.open_session().await;

        let err = svc.send_message(&session_id, "hi").await.unwrap_err();
        let text = match err {
            ChatError::Generation(text) => text,
            other => panic!("unexpected error: {other:?}"),
        };
        assert!(text.starts_with(AI_ERROR_PREFIX));
        assert!(text.contains("connection refused"));

        let history = svc.history(&session_id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, text);
    }

    #[tokio::test]
    async fn test_context_capped_at_window() {
        let (svc, requests) = service(Ok("ok"));
        let session_id = svc.open_session().await;

        for i in 0..15 {
            svc.send_message(&session_id, &format!("question {i}"))
                .await
                .unwrap();
        }

        let requests = requests.lock().unwrap();
        let last = requests.last().unwrap();
        // system prompt + at most 10 history messages
        assert_eq!(last.messages.len(), 11);
        assert_eq!(last.messages[0].role, MessageRole::System);
        assert_eq!(last.messages[10].content, "question 14");
        assert!(requests.iter().all(|r| r.messages.len() <= 11));
    }

    #[tokio::test]
    async fn test_ensure_session_reuses_or_mints() {
        let (svc, _) = service(Ok("ok"));

        let (existing, minted) = svc.ensure_session(Some("abc")).await;
        assert_eq!(existing, "abc");
        assert!(!minted);

        let (fresh, minted) = svc.ensure_session(None).await;
        assert!(minted);
        assert!(svc.chat_repo().get_session(&fresh).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ensure_session_recreates_missing_row() {
        let (svc, requests) = service(Ok("ok"));

        let (id, minted) = svc.ensure_session(Some("row-was-wiped")).await;
        assert!(!minted);
        assert!(svc.chat_repo().get_session(&id).await.unwrap().is_some());

        svc.send_message(&id, "hello").await.unwrap();

        let history = svc.history(&id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hello");

        let requests = requests.lock().unwrap();
        let prompt = &requests[0].messages;
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[1].role, MessageRole::User);
        assert_eq!(prompt[1].content, "hello");
    }

    #[tokio::test]
    async fn test_ensure_session_keeps_existing_row() {
        let (svc, _) = service(Ok("ok"));
        let id = svc.open_session().await;
        svc.send_message(&id, "hello").await.unwrap();

        let (same, minted) = svc.ensure_session(Some(&id)).await;
        assert_eq!(same, id);
        assert!(!minted);
        assert_eq!(svc.history(&id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_context_tracks_newest_turns_past_history_limit() {
        let (svc, requests) = service(Ok("ok"));
        let id = svc.open_session().await;
        for i in 0..100 {
            svc.chat_repo()
                .append_message(&id, MessageRole::User, &format!("old {i}"))
                .await
                .unwrap();
        }

        svc.send_message(&id, "NEWEST").await.unwrap();

        let requests = requests.lock().unwrap();
        let prompt = &requests[0].messages;
        assert_eq!(prompt.len(), 11);
        assert_eq!(prompt[1].content, "old 91");
        assert_eq!(prompt[10].content, "NEWEST");
    }

    #[tokio::test]
    async fn test_storage_failures_yield_neutral_results() {
        let (svc, _) = service_with(FailingChatRepository, Ok("ok"));

        let id = svc.open_session().await;
        assert!(!id.is_empty());

        let (kept, minted) = svc.ensure_session(Some("abc")).await;
        assert_eq!(kept, "abc");
        assert!(!minted);

        assert!(svc.history(&id).await.is_empty());
        assert!(svc.sessions().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_survives_storage_failure() {
        let (svc, requests) = service_with(FailingChatRepository, Ok("still here"));

        let reply = svc.send_message("abc", "hello").await.unwrap();
        assert_eq!(reply.response, "still here");

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn test_new_session_leaves_old_history() {
        let (svc, _) = service(Ok("ok"));
        let first = svc.open_session().await;
        svc.send_message(&first, "hello").await.unwrap();

        let second = svc.open_session().await;
        assert_ne!(first, second);
        assert_eq!(svc.history(&first).await.len(), 2);
        assert!(svc.history(&second).await.is_empty());
    }

    #[test]
    fn test_settings_follow_config() {
        let config = GlobalConfig {
            model: "gpt-4o-mini".to_string(),
            context_window: 4,
            ..GlobalConfig::default()
        };
        let settings = GenerationSettings::from(&config);
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.context_window, 4);
        assert_eq!(settings.history_limit, 100);
    }
}
