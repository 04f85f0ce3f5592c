use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lingopop_core::types::{AppEvent, ChatRequest, Outcome};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Answers chat turns one at a time so replies come back in send order
pub async fn chat_worker(
    state: Arc<AppState>,
    chat_rx: AsyncReceiver<ChatRequest>,
    loopback: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let request = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            request = chat_rx.recv() => request?,
        };

        let gateway = state.gateway().await;
        let reply = gateway
            .chat_turn(&request.history, &request.message, &request.context_term)
            .await;
        tracing::debug!("Chat reply for '{}': {} chars", request.context_term, reply.len());

        loopback
            .send(AppEvent::Outcome(Outcome::Chat {
                epoch: request.epoch,
                reply,
            }))
            .await?;
    }
}
