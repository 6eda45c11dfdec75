//! Context window and prompt assembly.
//!
//! The model only ever sees the fixed system instruction followed by the most
//! recent slice of the stored conversation.

use diagramchat_types::chat::ChatMessage;
use diagramchat_types::llm::{Message, MessageRole};

/// Fixed instruction placed ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. When users ask for diagrams, charts, or visual representations, provide the response in a format that can be rendered using Mermaid.js. Always wrap mermaid diagrams with ```mermaid and ``` tags. For other responses, be helpful and conversational.";

/// The most recent `size` messages of `history`, still in chronological order.
pub fn context_window(history: &[ChatMessage], size: usize) -> &[ChatMessage] {
    let start = history.len().saturating_sub(size);
    &history[start..]
}

/// Build the prompt list: system instruction, then the context window with stored roles.
pub fn build_prompt(history: &[ChatMessage], window: usize) -> Vec<Message> {
    let recent = context_window(history, window);

    let mut messages = Vec::with_capacity(recent.len() + 1);
    messages.push(Message {
        role: MessageRole::System,
        content: SYSTEM_PROMPT.to_string(),
    });
    messages.extend(recent.iter().map(|m| Message {
        role: m.role,
        content: m.content.clone(),
    }));
    messages
}
