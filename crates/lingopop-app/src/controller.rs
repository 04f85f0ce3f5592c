use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingopop_core::types::{AppEvent, ChatRequest};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::chat::chat_worker;
use crate::events::event_loop;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// User input and request outcomes, both consumed by the event loop
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// Chat turns, answered one at a time in send order
    pub chat: (AsyncSender<ChatRequest>, AsyncReceiver<ChatRequest>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(256),
            chat: kanal::bounded_async(32),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
            self.channels.chat.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Chat worker
        tasks.spawn(chat_worker(
            self.state.clone(),
            self.channels.chat.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.state.config.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
