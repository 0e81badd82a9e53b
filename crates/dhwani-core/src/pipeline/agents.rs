//! Intent routing across specialized handlers.
//!
//! A fixed conditional graph with one branch point: classify the request,
//! dispatch to exactly one handler, aggregate the labeled fragments into a
//! single response. Implemented as a dispatch table rather than a generic
//! graph runtime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engines::ChatSession;

/// Intent taxonomy of the agent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentIntent {
    InformationQuery,
    TaskManagement,
    SmartHome,
    GeneralChat,
    Unknown,
}

impl AgentIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InformationQuery => "information_query",
            Self::TaskManagement => "task_management",
            Self::SmartHome => "smart_home",
            Self::GeneralChat => "general_chat",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AgentIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Info,
    Task,
    Chat,
}

/// Final response of one agent-graph run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub response: String,
    pub intent: AgentIntent,
    pub language: String,
}

const FALLBACK_RESPONSE: &str = "I couldn't process your request.";

/// Routes a classified request to exactly one handler and merges the
/// handler outputs into one response.
pub struct AgentOrchestrator {
    chat_session: Option<Arc<ChatSession>>,
    simple_mode: bool,
}

impl AgentOrchestrator {
    pub fn new() -> Self {
        Self {
            chat_session: None,
            simple_mode: false,
        }
    }

    /// Back the chat handler with a live conversation session instead of
    /// the canned fragment.
    pub fn with_chat_session(mut self, session: Arc<ChatSession>) -> Self {
        self.chat_session = Some(session);
        self
    }

    /// Run the reduced path (classify → chat handler → aggregate). Output
    /// shape is identical to the full graph.
    pub fn simple_mode(mut self, enabled: bool) -> Self {
        self.simple_mode = enabled;
        self
    }

    /// Keyword classification of the agent-graph intent.
    pub fn classify(text: &str) -> AgentIntent {
        const INFO: &[&str] = &["what", "who", "where", "when", "how", "why", "tell me"];
        const TASK: &[&str] = &["remind", "schedule", "task", "todo", "calendar"];
        const HOME: &[&str] = &["light", "fan", "ac", "door", "temperature"];

        let text = text.to_lowercase();
        if INFO.iter().any(|word| text.contains(word)) {
            AgentIntent::InformationQuery
        } else if TASK.iter().any(|word| text.contains(word)) {
            AgentIntent::TaskManagement
        } else if HOME.iter().any(|word| text.contains(word)) {
            AgentIntent::SmartHome
        } else {
            AgentIntent::GeneralChat
        }
    }

    fn route(intent: AgentIntent) -> Handler {
        match intent {
            AgentIntent::InformationQuery => Handler::Info,
            AgentIntent::TaskManagement => Handler::Task,
            // No dedicated smart-home handler is wired; those requests fall
            // through to the chat handler.
            AgentIntent::SmartHome | AgentIntent::GeneralChat | AgentIntent::Unknown => {
                Handler::Chat
            }
        }
    }

    /// Process user input through the graph.
    pub async fn process(&self, user_input: &str, language: &str) -> AgentReply {
        let intent = Self::classify(user_input);
        info!("Classified intent: {intent}");

        let handler = if self.simple_mode {
            Handler::Chat
        } else {
            Self::route(intent)
        };

        // Each handler appends its labeled fragment in invocation order.
        let mut outputs: Vec<(&'static str, String)> = Vec::new();
        match handler {
            Handler::Info => {
                info!("Running info agent");
                outputs.push((
                    "info_agent",
                    format!("[Info Agent] Processing query: {user_input}"),
                ));
            }
            Handler::Task => {
                info!("Running task agent");
                outputs.push((
                    "task_agent",
                    format!("[Task Agent] Processing task request: {user_input}"),
                ));
            }
            Handler::Chat => {
                info!("Running chat agent");
                outputs.push(("chat_agent", self.chat_fragment(user_input).await));
            }
        }

        AgentReply {
            response: aggregate(&outputs),
            intent,
            language: language.to_string(),
        }
    }

    async fn chat_fragment(&self, user_input: &str) -> String {
        if let Some(session) = &self.chat_session {
            match session.chat(user_input).await {
                Ok(reply) => return reply.content,
                Err(err) => warn!("Chat handler failed, using canned response: {err}"),
            }
        }
        format!("[Chat Agent] I understand you said: {user_input}")
    }
}

impl Default for AgentOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn aggregate(outputs: &[(&'static str, String)]) -> String {
    let joined = outputs
        .iter()
        .map(|(_, response)| response.as_str())
        .filter(|response| !response.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        FALLBACK_RESPONSE.to_string()
    } else {
        joined
    }
}
