use std::sync::Arc;

use kanal::AsyncSender;
use lingopop_core::types::AppEvent;
use lingopop_types::MediaRef;

use crate::audio::PlayPlan;
use crate::state::AppState;

pub async fn handle_play_audio(
    state: Arc<AppState>,
    text: String,
    loopback: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let plan = state.audio_cache().plan(&text);

    match plan {
        PlayPlan::Skip => {
            tracing::debug!("Audio for '{}' already loading", text);
        }
        PlayPlan::Replay(clip) => play(&state, &clip, &loopback).await?,
        PlayPlan::Fetch(generation) => {
            let gateway = state.gateway().await;
            let clip = gateway.generate_audio(&text).await;
            let current = state
                .audio_cache()
                .finish(generation, &text, clip.as_ref());

            match clip {
                Some(clip) if current => play(&state, &clip, &loopback).await?,
                Some(_) => tracing::debug!("Dropping audio for a previous entry"),
                None => tracing::debug!("No audio for '{}'", text),
            }
        }
    }

    Ok(())
}

async fn play(
    state: &AppState,
    clip: &MediaRef,
    loopback: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match state.audio_sink.play(clip) {
        Ok(notice) => loopback.send(AppEvent::Notice(notice)).await?,
        Err(e) => tracing::warn!("Audio playback failed: {e:#}"),
    }
    Ok(())
}
