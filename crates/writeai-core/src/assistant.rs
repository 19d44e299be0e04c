//! Writing assistant conversation
//!
//! Replies come from a [`ResponseProvider`]. The bundled provider hands out
//! canned writing tips; the conversation itself does not care where replies
//! come from.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::config::DEFAULT_ASSISTANT_DELAY_MS;

/// First message of every conversation
pub const GREETING: &str = "Hi! I'm your AI writing assistant. I can help you improve your \
writing, brainstorm ideas, or overcome writer's block. What would you like to work on?";

/// Suggested one-click prompts
pub const QUICK_ACTIONS: [&str; 4] = [
    "Improve this paragraph",
    "Make it more engaging",
    "Add dialogue",
    "Continue the story",
];

const WRITING_TIPS: [&str; 5] = [
    "Here's a suggestion to improve your writing: Try adding more sensory details to help \
     readers immerse themselves in the scene. Consider what characters can see, hear, smell, \
     taste, or feel.",
    "I notice your dialogue could be more natural. Try reading it aloud - does it sound like \
     something people would actually say? Add contractions and interruptions to make it feel \
     more realistic.",
    "To make this more engaging, consider starting in the middle of action rather than with \
     backstory. You can weave the background information in naturally as the story \
     progresses.",
    "Your character development is strong, but you might want to give them a specific quirk \
     or habit that makes them more memorable. Small details can make characters feel more \
     real.",
    "The pacing here feels a bit slow. Try cutting unnecessary words and combining shorter \
     sentences for better flow. Every word should serve a purpose.",
];

/// Source of assistant replies
pub trait ResponseProvider: Send + Sync {
    /// Reply to `message`, with the current draft as context
    fn respond(&self, message: &str, draft: &str) -> String;
}

/// Picks one of a fixed set of writing tips at random
pub struct CannedResponses {
    rng: Mutex<StdRng>,
}

impl CannedResponses {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic replies for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn tips() -> &'static [&'static str] {
        &WRITING_TIPS
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseProvider for CannedResponses {
    fn respond(&self, _message: &str, _draft: &str) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        WRITING_TIPS
            .choose(&mut *rng)
            .copied()
            .unwrap_or(WRITING_TIPS[0])
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// A conversation with the assistant
pub struct Assistant<P: ResponseProvider = CannedResponses> {
    provider: P,
    delay: Duration,
    messages: Vec<Message>,
}

impl Assistant<CannedResponses> {
    /// Canned replies with the default thinking delay
    pub fn new() -> Self {
        Self::with_provider(
            CannedResponses::new(),
            Duration::from_millis(DEFAULT_ASSISTANT_DELAY_MS),
        )
    }
}

impl Default for Assistant<CannedResponses> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ResponseProvider> Assistant<P> {
    pub fn with_provider(provider: P, delay: Duration) -> Self {
        Self {
            provider,
            delay,
            messages: vec![Message {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    /// The conversation so far, greeting first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn quick_actions(&self) -> &'static [&'static str] {
        &QUICK_ACTIONS
    }

    /// Send a message and wait for the reply
    ///
    /// Blank messages are ignored and return `None`.
    pub async fn send(&mut self, message: &str, draft: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        self.messages.push(Message {
            role: Role::User,
            content: message.to_string(),
        });

        tokio::time::sleep(self.delay).await;

        let reply = self.provider.respond(message, draft);
        debug!(chars = reply.len(), "assistant replied");
        self.messages.push(Message {
            role: Role::Assistant,
            content: reply.clone(),
        });
        Some(reply)
    }
}
