use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use kanal::{AsyncReceiver, AsyncSender};
use lingopop_core::session::Session;
use lingopop_core::types::{AppEvent, ChatRequest, Effect};
use lingopop_gateway::GatewayError;
use lingopop_types::RequestFailure;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod audio;
pub mod chat;
pub mod config_update;
pub mod lookup;
pub mod story;

use audio::handle_play_audio;
use config_update::handle_config_update;
use lookup::handle_lookup;
use story::handle_story;

/// Channels handlers report through
struct Outlets<'a> {
    /// Back into this loop
    loopback: &'a AsyncSender<AppEvent>,
    app_to_ui_tx: &'a AsyncSender<AppEvent>,
    chat_tx: &'a AsyncSender<ChatRequest>,
}

enum Flow {
    Continue,
    Quit,
}

/// App's main loop. Owns the session; request tasks report back through
/// `loopback`.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    loopback: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    chat_tx: AsyncSender<ChatRequest>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut session = {
        let ui = state.config.read().await.ui.clone();
        Session::new(&ui, state.load_notebook().await)
    };
    render(&app_to_ui_tx, &session).await?;

    let outlets = Outlets {
        loopback: &loopback,
        app_to_ui_tx: &app_to_ui_tx,
        chat_tx: &chat_tx,
    };

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                return Ok(());
            }
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );
        match handle_events(&state, &mut session, &outlets, event).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                tracing::info!("[EVENT_LOOP] Quit requested");
                return Ok(());
            }
            Err(e) => tracing::error!("[EVENT_LOOP] handler failed: {e:#}"),
        }
    }
}

async fn handle_events(
    state: &Arc<AppState>,
    session: &mut Session,
    outlets: &Outlets<'_>,
    event: AppEvent,
) -> anyhow::Result<Flow> {
    match event {
        AppEvent::Intent(intent) => {
            let effects = session.apply(intent);
            dispatch(state, session, outlets, effects).await?;
            render(outlets.app_to_ui_tx, session).await?;
        }
        AppEvent::Outcome(outcome) => {
            let effects = session.resolve(outcome);
            dispatch(state, session, outlets, effects).await?;
            render(outlets.app_to_ui_tx, session).await?;
        }
        AppEvent::ConfigUpdate { field, value } => {
            let notice = handle_config_update(state, &field, &value).await;
            outlets.app_to_ui_tx.send(AppEvent::Notice(notice)).await?;
        }
        AppEvent::Notice(message) => {
            outlets.app_to_ui_tx.send(AppEvent::Notice(message)).await?;
        }
        AppEvent::Render(_) => {
            // UI-only event
        }
        AppEvent::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Run the side effects of one transition
async fn dispatch(
    state: &Arc<AppState>,
    session: &Session,
    outlets: &Outlets<'_>,
    effects: Vec<Effect>,
) -> anyhow::Result<()> {
    for effect in effects {
        match effect {
            Effect::Lookup(request) => {
                let gateway = state.gateway().await;
                spawn_request(
                    "lookup",
                    handle_lookup(gateway, request, outlets.loopback.clone()),
                );
            }
            Effect::Story(request) => {
                let gateway = state.gateway().await;
                spawn_request(
                    "story",
                    handle_story(gateway, request, outlets.loopback.clone()),
                );
            }
            Effect::Chat(request) => {
                outlets.chat_tx.send(request).await?;
            }
            Effect::Audio { text } => {
                spawn_request(
                    "audio",
                    handle_play_audio(state.clone(), text, outlets.loopback.clone()),
                );
            }
            Effect::ReleaseAudio => {
                state.audio_cache().clear();
            }
            Effect::Persist => {
                if let Err(e) = state.notebook.save(&session.notebook) {
                    tracing::error!("Failed to save notebook: {}", e);
                    outlets
                        .app_to_ui_tx
                        .send(AppEvent::Notice(format!(
                            "Couldn't save your notebook: {e}"
                        )))
                        .await?;
                }
            }
        }
    }

    Ok(())
}

async fn render(app_to_ui_tx: &AsyncSender<AppEvent>, session: &Session) -> anyhow::Result<()> {
    app_to_ui_tx
        .send(AppEvent::Render(Box::new(session.clone())))
        .await?;
    Ok(())
}

fn spawn_request<F>(name: &'static str, task: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::error!("{} task failed: {e:#}", name);
        }
    });
}

/// Classify a gateway error for the session
pub(crate) fn request_failure(error: &GatewayError) -> RequestFailure {
    if error.is_configuration() {
        RequestFailure::Configuration(error.to_string())
    } else {
        RequestFailure::Transient(error.to_string())
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
