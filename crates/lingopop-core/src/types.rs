use lingopop_types::{ChatMessage, Intent, Language, LookupData, MediaRef, RequestFailure, StoryResult};

use crate::session::Session;

/// Events flowing between the UI loop and the event loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User intent from the view layer
    Intent(Intent),
    /// Completed gateway request
    Outcome(Outcome),
    ConfigUpdate { field: String, value: String },
    /// Fresh state for the renderers
    Render(Box<Session>),
    /// One-line status message
    Notice(String),
    Quit,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Lookup(LookupRequest),
    Story(StoryRequest),
    Chat(ChatRequest),
    Audio { text: String },
    /// Drop cached audio of the previous entry
    ReleaseAudio,
    /// Flush the notebook to storage
    Persist,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub epoch: u64,
    pub term: String,
    pub source_lang: Language,
    pub target_lang: Language,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryRequest {
    pub ticket: u64,
    pub words: Vec<String>,
    pub source_name: String,
    pub target_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub epoch: u64,
    /// Transcript before the new message
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub context_term: String,
}

/// Result of a dispatched request, tagged with what it was issued under
#[derive(Debug, Clone)]
pub enum Outcome {
    Lookup {
        epoch: u64,
        term: String,
        result: Result<(LookupData, Option<MediaRef>), RequestFailure>,
        completed_at_ms: u64,
    },
    Story {
        ticket: u64,
        result: Result<StoryResult, RequestFailure>,
    },
    Chat {
        epoch: u64,
        reply: String,
    },
}
