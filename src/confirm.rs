// ABOUTME: Interactive confirmation boundary: prompt rendering and the Confirmer trait.
// ABOUTME: StdinConfirmer reads one keyed line from the terminal; read failures fail closed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::describe::truncate_chars;
use crate::types::{ConfirmResponse, ToolCallRequest};

/// Longest argument value shown in a prompt before truncation.
const VALUE_PREVIEW_CHARS: usize = 100;

/// Asks an external actor to decide a request.
///
/// The engine renders the prompt and suspends on `confirm` with no locks
/// held; implementations are free to take as long as they need. Exactly one
/// of the four [`ConfirmResponse`] values comes back; unrecognized input
/// should already have been folded into `Deny`.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, request: &ToolCallRequest, prompt: &str) -> ConfirmResponse;
}

#[async_trait]
impl<T: Confirmer + ?Sized> Confirmer for Arc<T> {
    async fn confirm(&self, request: &ToolCallRequest, prompt: &str) -> ConfirmResponse {
        (**self).confirm(request, prompt).await
    }
}

/// Render the confirmation prompt for a request: risk badge, tool name,
/// truncated arguments, and the four-choice menu.
pub fn render_prompt(request: &ToolCallRequest) -> String {
    let mut lines = vec![
        format!(
            "\n{} permission request [{}]",
            request.risk_level.icon(),
            request.risk_level.label(),
        ),
        format!("   tool: {}", request.tool_name),
    ];

    for (key, value) in request.arguments.iter() {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let shown = if rendered.chars().count() > VALUE_PREVIEW_CHARS {
            format!("{}...", truncate_chars(&rendered, VALUE_PREVIEW_CHARS))
        } else {
            rendered
        };
        lines.push(format!("   {key}: {shown}"));
    }

    lines.push(String::new());
    lines.push("   [y] allow  [n] deny  [a] allow and whitelist  [q] quit".to_string());
    lines.push("   choice: ".to_string());
    lines.join("\n")
}

/// Terminal-backed confirmer: prints the prompt to stdout and reads a
/// single-key line from stdin.
///
/// A closed or failing stdin denies the call rather than aborting the run.
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, _request: &ToolCallRequest, prompt: &str) -> ConfirmResponse {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let mut stdout = tokio::io::stdout();
        if stdout.write_all(prompt.as_bytes()).await.is_err() {
            return ConfirmResponse::Deny;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => ConfirmResponse::Deny,
            Ok(_) => parse_choice(&line),
        }
    }
}

/// Parse a typed line: exactly one key maps through
/// [`ConfirmResponse::from_key`], anything else denies.
fn parse_choice(line: &str) -> ConfirmResponse {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => ConfirmResponse::from_key(key),
        _ => ConfirmResponse::Deny,
    }
}
