//! Prompt console: an optimistic chat log over the backend echo endpoint.
//!
//! Submissions follow a two-state machine:
//!
//! ```text
//!   Idle ──submit(text)──▶ Sending ──reply / failure──▶ Idle
//! ```
//!
//! The user message is appended as soon as a submission is accepted; the
//! assistant reply (or a placeholder when the backend is unreachable) is
//! appended once the request settles.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{ApiError, Backend, EchoResponse};

/// Reply used when the echo request fails for any reason.
pub const PLACEHOLDER_REPLY: &str =
    "Backend not reachable right now. This is a local placeholder response for your prompt.";

/// Reply used when the backend answers without a message.
pub const EMPTY_REPLY: &str = "Processed by backend.";

/// Who wrote a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn in the prompt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleMessage {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ConsoleMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConsoleState {
    #[default]
    Idle,
    Sending,
}

/// A curated prompt shown next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub label: &'static str,
    pub text: &'static str,
}

/// Prompt suggestions offered by the console.
pub const SUGGESTIONS: [Suggestion; 8] = [
    Suggestion {
        label: "Build an AI named Whiskey (MVP plan)",
        text: "I want to build an AI named Whiskey. Draft core features, personality, and a minimal MVP roadmap with milestones, risks, and success metrics.",
    },
    Suggestion {
        label: "Check frontend↔backend↔DB links",
        text: "Check the frontend-backend-database connections for Nexus. Identify issues and list concrete steps to fix them.",
    },
    Suggestion {
        label: "Fix Docker context & services",
        text: "Diagnose Docker context/compose issues for this project and provide exact steps to fix and restart all services.",
    },
    Suggestion {
        label: "PostgreSQL setup (dev profile)",
        text: "Verify local PostgreSQL for the dev profile. Create the required schema/tables and seed minimal data based on database_schema.sql.",
    },
    Suggestion {
        label: "Create demo Spring endpoint",
        text: "Generate a Spring Boot endpoint at /api/v1/demo/echo that returns JSON {\"message\":\"<input>\",\"timestamp\":<iso>}, plus a quick unit test.",
    },
    Suggestion {
        label: "Add System Logs page",
        text: "Add a System Logs page that fetches /api/logs (mock if missing) with filters and pagination.",
    },
    Suggestion {
        label: "Security hardening checklist",
        text: "Review security across backend and frontend. Provide a prioritized hardening checklist (auth, CORS, headers, secrets, logging, rate limits).",
    },
    Suggestion {
        label: "Performance tuning plan",
        text: "Create a performance optimization plan for the app (build sizes, caching, DB pool tuning, JVM flags, profiling, CI/CD gates).",
    },
];

/// Outcome of clicking a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionAction {
    /// The input line now holds the suggestion text.
    Populated,
    /// The suggestion was submitted; the caller must dispatch this text.
    Submitted(String),
    /// Nothing happened (unknown index, or a request is in flight).
    Ignored,
}

/// Chat log, input line and submission state.
#[derive(Debug, Default)]
pub struct PromptConsole {
    messages: Vec<ConsoleMessage>,
    state: ConsoleState,
    input: String,
}

impl PromptConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ConsoleState::Sending
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input_push(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Accept a submission if the console is idle and `text` is not blank.
    ///
    /// Appends the user message and moves to `Sending`. Returns the trimmed
    /// text that must be sent to the backend, or `None` if nothing happened.
    pub fn begin(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.is_sending() {
            debug!("prompt ignored, request already in flight");
            return None;
        }

        self.messages.push(ConsoleMessage::new(Role::User, text));
        self.state = ConsoleState::Sending;
        Some(text.to_string())
    }

    /// Submit whatever is in the input line, clearing it when accepted.
    pub fn begin_from_input(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.input);
        match self.begin(&text) {
            Some(sent) => Some(sent),
            None => {
                self.input = text;
                None
            }
        }
    }

    /// Settle the in-flight submission and return to `Idle`.
    pub fn finish(&mut self, reply: Result<EchoResponse, ApiError>) {
        let content = match reply {
            Ok(response) => match response.message {
                Some(message) if !message.is_empty() => message,
                _ => EMPTY_REPLY.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "prompt request failed, using placeholder reply");
                PLACEHOLDER_REPLY.to_string()
            }
        };
        self.messages.push(ConsoleMessage::new(Role::Assistant, content));
        self.state = ConsoleState::Idle;
    }

    /// Submit `text` and wait for the reply.
    ///
    /// Returns `false` if the submission was ignored (blank text or a
    /// request already in flight); no request is made in that case.
    pub async fn submit(&mut self, backend: &dyn Backend, text: &str) -> bool {
        let Some(text) = self.begin(text) else {
            return false;
        };
        let reply = backend.echo(&text).await;
        self.finish(reply);
        true
    }

    /// Apply a click on suggestion `index`.
    ///
    /// With `send_now` the suggestion is submitted and the input cleared;
    /// otherwise it only replaces the input line for editing.
    pub fn click_suggestion(&mut self, index: usize, send_now: bool) -> SuggestionAction {
        if self.is_sending() {
            return SuggestionAction::Ignored;
        }
        let Some(suggestion) = SUGGESTIONS.get(index) else {
            return SuggestionAction::Ignored;
        };

        if send_now {
            self.input.clear();
            match self.begin(suggestion.text) {
                Some(text) => SuggestionAction::Submitted(text),
                None => SuggestionAction::Ignored,
            }
        } else {
            self.input = suggestion.text.to_string();
            SuggestionAction::Populated
        }
    }
}
