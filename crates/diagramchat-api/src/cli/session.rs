//! Session browsing CLI commands: list sessions, print history.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use diagramchat_api::http::handlers::chat::history_entries;
use diagramchat_api::state::AppState;
use diagramchat_types::chat::MessageRole;

/// List all sessions with creation time, last activity, and message count.
///
/// ```bash
/// dchat sessions
/// dchat sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.chat_service.sessions().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("dchat serve").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Last active").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
    ]);

    for summary in &sessions {
        let session = &summary.session;
        table.add_row(vec![
            Cell::new(&session.id).fg(Color::Cyan),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(session.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(summary.message_count.to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print a session's stored messages, oldest first.
///
/// ```bash
/// dchat history 0190c6f2-7a1b-7c3d-8e4f-123456789abc --limit 20
/// ```
pub async fn show_history(
    state: &AppState,
    session_id: &str,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(state.config.history_limit);
    let messages = state
        .chat_service
        .history_with_limit(session_id, limit)
        .await;

    if json {
        let entries = history_entries(messages);
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "history": entries }))?
        );
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages for session '{}'",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        let speaker = match message.role {
            MessageRole::User => style("you").green().bold(),
            MessageRole::Assistant => style("assistant").magenta().bold(),
            MessageRole::System => style("system").dim(),
        };
        let marker = if message.has_diagram() {
            format!(" {}", style("[diagram]").yellow())
        } else {
            String::new()
        };
        println!(
            "  {} {}{}",
            speaker,
            style(message.created_at.format("%Y-%m-%d %H:%M:%S")).dim(),
            marker
        );
        for line in message.content.lines() {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}
