mod terminal_tests;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use lingopop_config::Config;
use lingopop_config::gateway::GatewayConfig;
use lingopop_core::notebook::NotebookStore;
use lingopop_core::session::Session;
use lingopop_core::storage::FileStore;
use lingopop_core::types::AppEvent;
use lingopop_gateway::{Gateway, GatewayError, ProviderMetadata};
use lingopop_types::{
    ChatMessage, Example, Intent, Language, LookupData, MediaRef, StoryResult, View,
};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::audio::AudioSink;
use crate::controller::ChannelSet;
use crate::events::chat::chat_worker;
use crate::events::event_loop;
use crate::state::AppState;

/// Scripted gateway. Terms decide the behaviour: `fail` is a transient error,
/// `nokey` a missing credential, `slow*` answers after a delay.
#[derive(Default)]
pub struct FakeGateway {
    pub lookups: Mutex<Vec<String>>,
    pub stories: Mutex<Vec<Vec<String>>>,
    pub chats: Mutex<Vec<(usize, String)>>,
    pub audio_calls: AtomicUsize,
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn lookup_term(
        &self,
        term: &str,
        _source: &Language,
        _target: &Language,
    ) -> Result<LookupData, GatewayError> {
        self.lookups.lock().unwrap().push(term.to_string());

        if term.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        match term {
            "fail" => Err(GatewayError::EmptyResponse),
            "nokey" => Err(GatewayError::MissingCredential),
            _ => Ok(LookupData {
                definition: Some(format!("meaning of {term}")),
                examples: vec![Example {
                    original: format!("Digo {term}."),
                    translation: format!("I say {term}."),
                }],
                explanation: Some("Casual.".into()),
            }),
        }
    }

    async fn generate_visualization(&self, _term: &str, _target: &str) -> Option<MediaRef> {
        Some(MediaRef::new("image/png", vec![0x89, b'P', b'N', b'G']))
    }

    async fn generate_audio(&self, text: &str) -> Option<MediaRef> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        (text != "mute").then(|| MediaRef::new("audio/wav", text.as_bytes().to_vec()))
    }

    async fn generate_story(
        &self,
        words: &[String],
        _source: &str,
        _target: &str,
    ) -> Result<StoryResult, GatewayError> {
        self.stories.lock().unwrap().push(words.to_vec());
        Ok(StoryResult {
            story: words.join(" "),
            translation: "A story.".into(),
        })
    }

    async fn chat_turn(&self, history: &[ChatMessage], message: &str, _term: &str) -> String {
        self.chats
            .lock()
            .unwrap()
            .push((history.len(), message.to_string()));
        // Earlier turns take longer, so ordering comes from the worker alone
        let delay = 60u64.saturating_sub(10 * self.chats.lock().unwrap().len() as u64);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        if message == "silence" {
            String::new()
        } else {
            format!("re: {message}")
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Fake".into(),
            requires_api_key: false,
            has_credential: true,
        }
    }
}

/// Records clips instead of playing them
#[derive(Default)]
pub struct RecordingSink {
    pub played: Mutex<Vec<MediaRef>>,
}

impl AudioSink for RecordingSink {
    fn play(&self, clip: &MediaRef) -> anyhow::Result<String> {
        self.played.lock().unwrap().push(clip.clone());
        Ok(format!("played {} bytes", clip.data.len()))
    }
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub fake: Arc<FakeGateway>,
    pub sink: Arc<RecordingSink>,
    pub builds: Arc<AtomicUsize>,
    tx: AsyncSender<AppEvent>,
    rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
    _tasks: JoinSet<anyhow::Result<()>>,
}

pub fn notebook_store(dir: &Path) -> NotebookStore {
    NotebookStore::new(
        Box::new(FileStore::new(dir).unwrap()),
        Config::default().storage.notebook_key,
    )
}

/// App state over a notebook in `dir` whose gateway is always `fake`
pub fn fake_state(
    dir: &Path,
    fake: Arc<FakeGateway>,
    sink: Arc<RecordingSink>,
    builds: Arc<AtomicUsize>,
) -> Arc<AppState> {
    let factory = Box::new(move |_: &GatewayConfig| {
        builds.fetch_add(1, Ordering::SeqCst);
        Ok::<_, GatewayError>(fake.clone() as Arc<dyn Gateway>)
    });
    Arc::new(AppState::new(Config::default(), notebook_store(dir), sink, factory).unwrap())
}

impl Harness {
    /// Event loop and chat worker over a notebook in `dir`
    pub async fn start(dir: &Path) -> Self {
        let fake = Arc::new(FakeGateway::default());
        let sink = Arc::new(RecordingSink::default());
        let builds = Arc::new(AtomicUsize::new(0));
        let state = fake_state(dir, fake.clone(), sink.clone(), builds.clone());

        let channels = ChannelSet::new();
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();
        tasks.spawn(event_loop(
            state.clone(),
            channels.ui_to_app.1.clone(),
            channels.ui_to_app.0.clone(),
            channels.app_to_ui.0.clone(),
            channels.chat.0.clone(),
            cancel.child_token(),
        ));
        tasks.spawn(chat_worker(
            state.clone(),
            channels.chat.1.clone(),
            channels.ui_to_app.0.clone(),
            cancel.child_token(),
        ));

        Self {
            state,
            fake,
            sink,
            builds,
            tx: channels.ui_to_app.0.clone(),
            rx: channels.app_to_ui.1.clone(),
            cancel,
            _tasks: tasks,
        }
    }

    pub async fn send(&self, intent: Intent) {
        self.tx.send(AppEvent::Intent(intent)).await.unwrap();
    }

    pub async fn send_event(&self, event: AppEvent) {
        self.tx.send(event).await.unwrap();
    }

    async fn next_event(&self) -> AppEvent {
        timeout(Duration::from_secs(2), self.rx.recv())
            .await
            .expect("no event from the app")
            .unwrap()
    }

    /// First snapshot matching `done`
    pub async fn render_until(&self, done: impl Fn(&Session) -> bool) -> Session {
        loop {
            if let AppEvent::Render(session) = self.next_event().await
                && done(&session)
            {
                return *session;
            }
        }
    }

    pub async fn next_notice(&self) -> String {
        loop {
            if let AppEvent::Notice(message) = self.next_event().await {
                return message;
            }
        }
    }

    /// Confirm the default language pair and land on home
    pub async fn at_home(&self) -> Session {
        self.send(Intent::ConfirmSetup).await;
        self.render_until(|s| s.view == View::Home).await
    }

    /// Search and wait for the result
    pub async fn look_up(&self, term: &str) -> Session {
        self.send(Intent::Search(term.to_string())).await;
        self.render_until(|s| !s.is_searching).await
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
