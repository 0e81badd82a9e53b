//! Two-tier intent detection: keyword triggers with an optional model
//! fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engines::{ChatEngine, ChatMessage};

/// Closed intent taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Greeting,
    Question,
    Command,
    Information,
    Task,
    Weather,
    Time,
    Reminder,
    Calculation,
    Translation,
    General,
    Unknown,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Question => "question",
            Self::Command => "command",
            Self::Information => "information",
            Self::Task => "task",
            Self::Weather => "weather",
            Self::Time => "time",
            Self::Reminder => "reminder",
            Self::Calculation => "calculation",
            Self::Translation => "translation",
            Self::General => "general",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a model-produced label. Unknown labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "greeting" => Some(Self::Greeting),
            "question" => Some(Self::Question),
            "command" => Some(Self::Command),
            "information" => Some(Self::Information),
            "task" => Some(Self::Task),
            "weather" => Some(Self::Weather),
            "time" => Some(Self::Time),
            "reminder" => Some(Self::Reminder),
            "calculation" => Some(Self::Calculation),
            "translation" => Some(Self::Translation),
            "general" => Some(Self::General),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detected intent with metadata. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub confidence: f32,
    pub entities: HashMap<String, String>,
    pub original_text: String,
    pub english_text: String,
    pub description: String,
}

/// Keyword triggers checked in declaration order; ties go to the earlier
/// entry.
const INTENT_TRIGGERS: &[(IntentKind, &[&str])] = &[
    (
        IntentKind::Greeting,
        &[
            "hello",
            "hi",
            "hey",
            "good morning",
            "good evening",
            "namaste",
            "how are you",
            "what's up",
        ],
    ),
    (
        IntentKind::Weather,
        &[
            "weather", "temperature", "rain", "sunny", "cloudy", "forecast", "climate", "hot",
            "cold",
        ],
    ),
    (
        IntentKind::Time,
        &[
            "time",
            "what time",
            "clock",
            "hour",
            "date",
            "today",
            "day",
            "month",
            "year",
        ],
    ),
    (
        IntentKind::Reminder,
        &[
            "remind",
            "reminder",
            "alarm",
            "schedule",
            "appointment",
            "notify",
            "alert",
            "set reminder",
        ],
    ),
    (
        IntentKind::Calculation,
        &[
            "calculate",
            "math",
            "plus",
            "minus",
            "multiply",
            "divide",
            "sum",
            "total",
            "percentage",
            "how much is",
        ],
    ),
    (
        IntentKind::Question,
        &[
            "what", "who", "where", "when", "why", "how", "which", "is it", "are you", "can you",
            "could you", "tell me",
        ],
    ),
    (
        IntentKind::Command,
        &[
            "turn on", "turn off", "switch", "open", "close", "start", "stop", "play", "pause",
            "set",
        ],
    ),
];

const INTENT_SYSTEM_PROMPT: &str = "You are an intent classifier. Given a user message, identify:
1. The primary intent (greeting, question, command, weather, time, reminder, calculation, information, task, general)
2. Key entities mentioned (names, numbers, locations, times)
3. A brief description of what the user wants

Respond in this exact format:
INTENT: <intent_type>
ENTITIES: <key: value pairs or \"none\">
DESCRIPTION: <brief description>";

/// Classifies one utterance. `detect` never fails; every internal error
/// downgrades to the `general` default.
pub struct IntentDetector {
    fallback: Option<Arc<dyn ChatEngine>>,
}

impl IntentDetector {
    /// Keyword-only detector.
    pub fn new() -> Self {
        Self { fallback: None }
    }

    /// Detector that consults the chat model when no keyword trigger
    /// matches.
    pub fn with_model_fallback(engine: Arc<dyn ChatEngine>) -> Self {
        Self {
            fallback: Some(engine),
        }
    }

    /// Detect intent from text, preferring the English translation for
    /// analysis when available.
    pub async fn detect(&self, text: &str, english_text: Option<&str>) -> Intent {
        let analysis = english_text.unwrap_or(text).to_lowercase();
        debug!("Detecting intent for: '{}'", truncate(&analysis, 50));

        if let Some(kind) = keyword_detect(&analysis) {
            return Intent {
                kind,
                confidence: 0.8,
                entities: HashMap::new(),
                original_text: text.to_string(),
                english_text: english_text.unwrap_or(text).to_string(),
                description: keyword_description(kind).to_string(),
            };
        }

        if let Some(engine) = &self.fallback {
            return self
                .model_detect(engine.as_ref(), text, english_text.unwrap_or(text))
                .await;
        }

        Intent {
            kind: IntentKind::General,
            confidence: 0.5,
            entities: HashMap::new(),
            original_text: text.to_string(),
            english_text: english_text.unwrap_or(text).to_string(),
            description: "General conversation or query".to_string(),
        }
    }

    async fn model_detect(&self, engine: &dyn ChatEngine, original: &str, english: &str) -> Intent {
        let messages = [
            ChatMessage::system(INTENT_SYSTEM_PROMPT),
            ChatMessage::user(format!("Classify this user message: \"{english}\"")),
        ];

        match engine.chat(&messages, 100).await {
            Ok(reply) => parse_model_reply(&reply.content, original, english),
            Err(err) => {
                warn!("Model intent detection failed: {err}");
                Intent {
                    kind: IntentKind::General,
                    confidence: 0.5,
                    entities: HashMap::new(),
                    original_text: original.to_string(),
                    english_text: english.to_string(),
                    description: "General query".to_string(),
                }
            }
        }
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn keyword_detect(text: &str) -> Option<IntentKind> {
    let mut best: Option<(IntentKind, usize)> = None;
    for (kind, triggers) in INTENT_TRIGGERS {
        let score = triggers.iter().filter(|kw| text.contains(*kw)).count();
        if score == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((*kind, score)),
        }
    }
    best.map(|(kind, _)| kind)
}

fn keyword_description(kind: IntentKind) -> &'static str {
    match kind {
        IntentKind::Greeting => "User is greeting or starting a conversation",
        IntentKind::Weather => "User is asking about weather or climate",
        IntentKind::Time => "User is asking about time or date",
        IntentKind::Reminder => "User wants to set a reminder or alarm",
        IntentKind::Calculation => "User wants to perform a calculation",
        IntentKind::Question => "User is asking a question",
        IntentKind::Command => "User is giving a command or instruction",
        IntentKind::General => "General conversation or query",
        _ => "General query",
    }
}

/// Parse the model's three labeled output lines. Anything malformed
/// degrades to the `general` defaults; there is no retry.
fn parse_model_reply(response: &str, original: &str, english: &str) -> Intent {
    let mut kind = IntentKind::General;
    let mut entities = HashMap::new();
    let mut description = "General query".to_string();

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("INTENT:") {
            kind = IntentKind::from_label(rest).unwrap_or(IntentKind::General);
        } else if let Some(rest) = line.strip_prefix("ENTITIES:") {
            let rest = rest.trim();
            if !rest.eq_ignore_ascii_case("none") {
                for pair in rest.split(',') {
                    if let Some((key, value)) = pair.split_once(':') {
                        entities.insert(key.trim().to_string(), value.trim().to_string());
                    }
                }
            }
        } else if let Some(rest) = line.strip_prefix("DESCRIPTION:") {
            description = rest.trim().to_string();
        }
    }

    Intent {
        kind,
        confidence: 0.85,
        entities,
        original_text: original.to_string(),
        english_text: english.to_string(),
        description,
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::ChatReply;
    use crate::error::{Error, Result};
    use async_trait::async_trait;

    struct ScriptedEngine {
        reply: Result<&'static str>,
    }

    #[async_trait]
    impl ChatEngine for ScriptedEngine {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _max_new_tokens: usize,
        ) -> Result<ChatReply> {
            match &self.reply {
                Ok(text) => Ok(ChatReply {
                    content: text.to_string(),
                    tokens_used: 10,
                    generation_time_ms: 1.0,
                }),
                Err(_) => Err(Error::InferenceError("model offline".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn greeting_keyword_path() {
        let detector = IntentDetector::new();
        let intent = detector.detect("hello how are you", None).await;
        assert_eq!(intent.kind, IntentKind::Greeting);
        assert_eq!(intent.confidence, 0.8);
        assert_eq!(
            intent.description,
            "User is greeting or starting a conversation"
        );
    }

    #[tokio::test]
    async fn reminder_keyword_path() {
        let detector = IntentDetector::new();
        let intent = detector.detect("remind me to call mom at 5pm", None).await;
        assert_eq!(intent.kind, IntentKind::Reminder);
        assert_eq!(intent.confidence, 0.8);
    }

    #[tokio::test]
    async fn keyword_detection_is_deterministic() {
        let detector = IntentDetector::new();
        let first = detector.detect("what is the weather today", None).await;
        for _ in 0..5 {
            let again = detector.detect("what is the weather today", None).await;
            assert_eq!(again.kind, first.kind);
            assert_eq!(again.confidence, 0.8);
        }
    }

    #[test]
    fn ties_resolve_to_first_declared_category() {
        // "hello" (greeting) and "weather" (weather) both score one; the
        // greeting entry is declared first.
        assert_eq!(
            keyword_detect("hello weather"),
            Some(IntentKind::Greeting)
        );
    }

    #[test]
    fn strictly_highest_score_wins() {
        // Two weather triggers beat one greeting trigger.
        assert_eq!(
            keyword_detect("hello, will it rain or stay sunny"),
            Some(IntentKind::Weather)
        );
    }

    #[tokio::test]
    async fn english_text_preferred_for_analysis() {
        let detector = IntentDetector::new();
        let intent = detector
            .detect("നമസ്കാരം", Some("hello how are you"))
            .await;
        assert_eq!(intent.kind, IntentKind::Greeting);
        assert_eq!(intent.original_text, "നമസ്കാരം");
        assert_eq!(intent.english_text, "hello how are you");
    }

    #[tokio::test]
    async fn no_match_without_fallback_returns_general() {
        let detector = IntentDetector::new();
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.description, "General conversation or query");
    }

    #[tokio::test]
    async fn model_fallback_parses_labeled_lines() {
        let detector = IntentDetector::with_model_fallback(Arc::new(ScriptedEngine {
            reply: Ok("INTENT: information\nENTITIES: topic: rust, year: 2015\nDESCRIPTION: Wants facts about Rust"),
        }));
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::Information);
        assert_eq!(intent.confidence, 0.85);
        assert_eq!(intent.entities.get("topic").map(String::as_str), Some("rust"));
        assert_eq!(intent.entities.get("year").map(String::as_str), Some("2015"));
        assert_eq!(intent.description, "Wants facts about Rust");
    }

    #[tokio::test]
    async fn model_fallback_ignores_entities_none() {
        let detector = IntentDetector::with_model_fallback(Arc::new(ScriptedEngine {
            reply: Ok("INTENT: task\nENTITIES: none\nDESCRIPTION: A task"),
        }));
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::Task);
        assert!(intent.entities.is_empty());
    }

    #[tokio::test]
    async fn malformed_model_output_degrades_to_general() {
        let detector = IntentDetector::with_model_fallback(Arc::new(ScriptedEngine {
            reply: Ok("I think the user wants something, maybe?"),
        }));
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.85);
        assert_eq!(intent.description, "General query");
    }

    #[tokio::test]
    async fn unrecognized_model_label_degrades_to_general() {
        let detector = IntentDetector::with_model_fallback(Arc::new(ScriptedEngine {
            reply: Ok("INTENT: existential_dread\nENTITIES: none\nDESCRIPTION: Unclear"),
        }));
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.85);
    }

    #[tokio::test]
    async fn model_error_downgrades_confidence() {
        let detector = IntentDetector::with_model_fallback(Arc::new(ScriptedEngine {
            reply: Err(Error::InferenceError("model offline".to_string())),
        }));
        let intent = detector.detect("blorp fizzle", None).await;
        assert_eq!(intent.kind, IntentKind::General);
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.description, "General query");
    }
}
