use std::fmt;

/// Navigable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Setup,
    Home,
    Result,
    Notebook,
    Flashcards,
    Story,
}

impl View {
    /// Views that show the search bar
    pub fn has_search_bar(self) -> bool {
        matches!(self, View::Home | View::Result | View::Notebook)
    }

    /// Views that show the bottom navigation
    pub fn has_bottom_nav(self) -> bool {
        self != View::Setup
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Setup => "SETUP",
            View::Home => "HOME",
            View::Result => "RESULT",
            View::Notebook => "NOTEBOOK",
            View::Flashcards => "FLASHCARDS",
            View::Story => "STORY",
        };
        f.write_str(name)
    }
}

/// User intent emitted by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectSource(String),
    SelectTarget(String),
    ConfirmSetup,
    OpenSetup,
    GoHome,
    Search(String),
    SaveCurrent,
    OpenNotebook,
    OpenEntry(String),
    OpenFlashcards,
    FlipCard,
    NextCard,
    PrevCard,
    GenerateStory,
    SendChat(String),
    PlayAudio(String),
    DismissAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Missing or rejected credential
    Configuration,
    /// Network, parse or backend failure
    RequestFailed,
    /// Input rejected before any request
    Validation,
}

/// User-facing message raised by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Configuration,
            message: message.into(),
        }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::RequestFailed,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Validation,
            message: message.into(),
        }
    }
}

/// Classified gateway failure as seen by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    Configuration(String),
    Transient(String),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Configuration(msg) => write!(f, "configuration: {msg}"),
            RequestFailure::Transient(msg) => write!(f, "request failed: {msg}"),
        }
    }
}
