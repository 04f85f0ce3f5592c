use lingopop_config::ui::UiConfig;
use lingopop_types::{
    Alert, ChatMessage, Delivery, DictionaryEntry, Intent, Language, RequestFailure, StoryResult,
    View,
};

use crate::language::{self, find_language, language_or};
use crate::notebook::Notebook;
use crate::preprocess::{DefaultPreprocessor, Preprocessor};
use crate::types::{ChatRequest, Effect, LookupRequest, Outcome, StoryRequest};

pub const LOOKUP_FAILED: &str = "Oops! Couldn't find that word. Try again.";
pub const STORY_FAILED: &str = "Couldn't write a story this time. Try again!";

/// A story is never generated from fewer saved words than this
pub const STORY_WORD_FLOOR: usize = 3;

/// Flashcard review position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashcardCursor {
    pub index: usize,
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StoryLimits {
    min_words: usize,
    max_words: usize,
}

/// Application state machine.
///
/// Transitions are pure: [`Session::apply`] and [`Session::resolve`] only
/// mutate the session and return the effects the caller must dispatch.
#[derive(Debug, Clone)]
pub struct Session {
    pub view: View,
    pub source_lang: Language,
    pub target_lang: Language,
    pub search_term: String,
    pub is_searching: bool,
    pub current_entry: Option<DictionaryEntry>,
    pub notebook: Notebook,
    pub chat: Vec<ChatMessage>,
    pub story: Option<StoryResult>,
    pub is_generating_story: bool,
    pub flashcards: FlashcardCursor,
    pub alert: Option<Alert>,
    /// Tags lookup and chat requests for the current entry context
    epoch: u64,
    /// Tags story requests
    story_ticket: u64,
    limits: StoryLimits,
}

impl Session {
    pub fn new(ui: &UiConfig, notebook: Notebook) -> Self {
        Self {
            view: View::Setup,
            source_lang: language_or(&ui.default_source_lang, 0),
            target_lang: language_or(&ui.default_target_lang, 1),
            search_term: String::new(),
            is_searching: false,
            current_entry: None,
            notebook,
            chat: Vec::new(),
            story: None,
            is_generating_story: false,
            flashcards: FlashcardCursor::default(),
            alert: None,
            epoch: 0,
            story_ticket: 0,
            limits: StoryLimits {
                min_words: ui.story_min_words.max(STORY_WORD_FLOOR),
                max_words: ui.story_max_words.max(ui.story_min_words.max(STORY_WORD_FLOOR)),
            },
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn story_ticket(&self) -> u64 {
        self.story_ticket
    }

    pub fn story_min_words(&self) -> usize {
        self.limits.min_words
    }

    /// A user turn is waiting for its reply
    pub fn is_chatting(&self) -> bool {
        self.chat.iter().any(ChatMessage::is_pending)
    }

    pub fn is_current_saved(&self) -> bool {
        self.current_entry
            .as_ref()
            .is_some_and(|e| self.notebook.contains_term(&e.term))
    }

    /// Card under the flashcard cursor
    pub fn current_card(&self) -> Option<&DictionaryEntry> {
        self.notebook.get(self.flashcards.index)
    }

    /// Apply a user intent
    pub fn apply(&mut self, intent: Intent) -> Vec<Effect> {
        self.alert = None;

        match intent {
            Intent::SelectSource(code) => self.select_language(&code, true),
            Intent::SelectTarget(code) => self.select_language(&code, false),
            Intent::ConfirmSetup => {
                if self.view != View::Setup {
                    return self.unavailable();
                }
                tracing::info!(
                    "Language pair: {} -> {}",
                    self.source_lang.code,
                    self.target_lang.code
                );
                self.view = View::Home;
                vec![]
            }
            Intent::OpenSetup => {
                self.leave_view();
                self.view = View::Setup;
                vec![]
            }
            Intent::GoHome => self.navigate(View::Home),
            Intent::OpenNotebook => self.navigate(View::Notebook),
            Intent::Search(term) => self.search(&term),
            Intent::SaveCurrent => self.save_current(),
            Intent::OpenEntry(id) => self.open_entry(&id),
            Intent::OpenFlashcards => self.open_flashcards(),
            Intent::FlipCard => {
                if self.view != View::Flashcards {
                    return self.unavailable();
                }
                self.flashcards.flipped = !self.flashcards.flipped;
                vec![]
            }
            Intent::NextCard => self.move_card(1),
            Intent::PrevCard => self.move_card(-1),
            Intent::GenerateStory => self.generate_story(),
            Intent::SendChat(text) => self.send_chat(&text),
            Intent::PlayAudio(text) => {
                let text = text.trim();
                if self.view == View::Setup || text.is_empty() {
                    return self.unavailable();
                }
                vec![Effect::Audio {
                    text: text.to_string(),
                }]
            }
            Intent::DismissAlert => vec![],
        }
    }

    /// Merge a completed request. Outcomes issued under a stale epoch or
    /// ticket are dropped.
    pub fn resolve(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Lookup {
                epoch,
                term,
                result,
                completed_at_ms,
            } => {
                if epoch != self.epoch || !self.is_searching {
                    tracing::debug!("Dropping stale lookup for '{}' (epoch {})", term, epoch);
                    return vec![];
                }
                self.is_searching = false;

                match result {
                    Ok((data, image)) => {
                        let entry = DictionaryEntry::from_lookup(
                            term,
                            data,
                            image.as_ref(),
                            self.source_lang.clone(),
                            self.target_lang.clone(),
                            completed_at_ms,
                        );
                        tracing::info!(
                            "Lookup finished: '{}' ({} examples, image: {})",
                            entry.term,
                            entry.examples.len(),
                            entry.image_url.is_some()
                        );
                        self.current_entry = Some(entry);
                    }
                    Err(failure) => {
                        tracing::warn!("Lookup for '{}' failed: {}", term, failure);
                        self.alert = Some(failure_alert(failure, LOOKUP_FAILED));
                        self.current_entry = None;
                        self.view = View::Home;
                    }
                }
                vec![]
            }
            Outcome::Story { ticket, result } => {
                if ticket != self.story_ticket || !self.is_generating_story {
                    tracing::debug!("Dropping stale story (ticket {})", ticket);
                    return vec![];
                }
                self.is_generating_story = false;

                match result {
                    Ok(story) => self.story = Some(story),
                    Err(failure) => {
                        tracing::warn!("Story generation failed: {}", failure);
                        if let RequestFailure::Configuration(msg) = failure {
                            self.alert = Some(Alert::configuration(msg));
                        }
                        self.story = None;
                    }
                }
                vec![]
            }
            Outcome::Chat { epoch, reply } => {
                if epoch != self.epoch {
                    tracing::debug!("Dropping stale chat reply (epoch {})", epoch);
                    return vec![];
                }
                let Some(pos) = self.chat.iter().position(ChatMessage::is_pending) else {
                    return vec![];
                };

                if reply.trim().is_empty() {
                    self.chat[pos].delivery = Delivery::Unanswered;
                } else {
                    self.chat[pos].delivery = Delivery::Answered;
                    self.chat.insert(pos + 1, ChatMessage::model(reply));
                }
                vec![]
            }
        }
    }

    fn unavailable(&mut self) -> Vec<Effect> {
        self.alert = Some(Alert::validation(format!(
            "That action isn't available on the {} screen.",
            self.view
        )));
        vec![]
    }

    /// Abandon in-flight work owned by the current view
    fn leave_view(&mut self) {
        if self.is_searching {
            self.is_searching = false;
            self.epoch += 1;
        }
        if self.is_generating_story {
            self.is_generating_story = false;
            self.story_ticket += 1;
        }
    }

    fn navigate(&mut self, view: View) -> Vec<Effect> {
        if !self.view.has_bottom_nav() {
            return self.unavailable();
        }
        self.leave_view();
        self.view = view;
        vec![]
    }

    fn select_language(&mut self, code: &str, source: bool) -> Vec<Effect> {
        if self.view != View::Setup {
            return self.unavailable();
        }
        let Some(lang) = find_language(code) else {
            self.alert = Some(Alert::validation(format!(
                "Unknown language '{}'. Pick one of: {}",
                code.trim(),
                language::supported_codes().join(", ")
            )));
            return vec![];
        };

        if source {
            self.source_lang = lang;
        } else {
            self.target_lang = lang;
        }
        vec![]
    }

    fn search(&mut self, raw: &str) -> Vec<Effect> {
        if !self.view.has_search_bar() {
            return self.unavailable();
        }

        let term = DefaultPreprocessor.process(raw);
        if term.is_empty() {
            self.alert = Some(Alert::validation("Type a word or phrase to look up."));
            return vec![];
        }

        self.epoch += 1;
        self.search_term = term.clone();
        self.chat.clear();
        self.current_entry = None;
        self.is_searching = true;
        self.view = View::Result;

        tracing::info!("Looking up '{}' (epoch {})", term, self.epoch);

        vec![
            Effect::ReleaseAudio,
            Effect::Lookup(LookupRequest {
                epoch: self.epoch,
                term,
                source_lang: self.source_lang.clone(),
                target_lang: self.target_lang.clone(),
            }),
        ]
    }

    fn save_current(&mut self) -> Vec<Effect> {
        if self.view != View::Result || self.is_searching {
            return self.unavailable();
        }
        let Some(entry) = self.current_entry.clone() else {
            return self.unavailable();
        };

        if self.notebook.insert(entry) {
            tracing::info!("Saved to notebook ({} entries)", self.notebook.len());
            vec![Effect::Persist]
        } else {
            tracing::debug!("Entry already saved, nothing to do");
            vec![]
        }
    }

    fn open_entry(&mut self, id: &str) -> Vec<Effect> {
        if self.view != View::Notebook {
            return self.unavailable();
        }
        let Some(entry) = self.notebook.find_by_id(id.trim()).cloned() else {
            self.alert = Some(Alert::validation(format!("No saved entry with id '{}'.", id.trim())));
            return vec![];
        };

        let mut effects = vec![];
        let same_term = self
            .current_entry
            .as_ref()
            .is_some_and(|current| current.term == entry.term);
        if !same_term {
            self.epoch += 1;
            self.chat.clear();
            effects.push(Effect::ReleaseAudio);
        }

        self.current_entry = Some(entry);
        self.view = View::Result;
        effects
    }

    fn open_flashcards(&mut self) -> Vec<Effect> {
        if self.view != View::Notebook {
            return self.unavailable();
        }
        if self.notebook.is_empty() {
            self.alert = Some(Alert::validation("Save some words before reviewing flashcards!"));
            return vec![];
        }
        self.flashcards = FlashcardCursor::default();
        self.view = View::Flashcards;
        vec![]
    }

    fn move_card(&mut self, delta: isize) -> Vec<Effect> {
        if self.view != View::Flashcards {
            return self.unavailable();
        }
        let last = self.notebook.len().saturating_sub(1);
        let next = self.flashcards.index.saturating_add_signed(delta).min(last);
        if next != self.flashcards.index {
            self.flashcards = FlashcardCursor {
                index: next,
                flipped: false,
            };
        }
        vec![]
    }

    fn generate_story(&mut self) -> Vec<Effect> {
        if self.view != View::Notebook {
            return self.unavailable();
        }
        if self.notebook.len() < self.limits.min_words {
            self.alert = Some(Alert::validation(format!(
                "Save at least {} words to generate a story!",
                self.limits.min_words
            )));
            return vec![];
        }

        self.story_ticket += 1;
        self.story = None;
        self.is_generating_story = true;
        self.view = View::Story;

        let words = self.notebook.recent_terms(self.limits.max_words);
        tracing::info!("Generating story from {} words", words.len());

        vec![Effect::Story(StoryRequest {
            ticket: self.story_ticket,
            words,
            source_name: self.source_lang.name.clone(),
            target_name: self.target_lang.name.clone(),
        })]
    }

    fn send_chat(&mut self, text: &str) -> Vec<Effect> {
        if self.view != View::Result || self.is_searching {
            return self.unavailable();
        }
        let Some(entry) = &self.current_entry else {
            return self.unavailable();
        };
        let text = text.trim();
        if text.is_empty() {
            self.alert = Some(Alert::validation("Type a question first."));
            return vec![];
        }

        let request = ChatRequest {
            epoch: self.epoch,
            history: self.chat.clone(),
            message: text.to_string(),
            context_term: entry.term.clone(),
        };
        self.chat.push(ChatMessage::user(text));

        vec![Effect::Chat(request)]
    }
}

fn failure_alert(failure: RequestFailure, generic: &str) -> Alert {
    match failure {
        RequestFailure::Configuration(msg) => Alert::configuration(msg),
        RequestFailure::Transient(_) => Alert::request_failed(generic),
    }
}

