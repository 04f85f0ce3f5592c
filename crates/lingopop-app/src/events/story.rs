use std::sync::Arc;

use kanal::AsyncSender;
use lingopop_core::types::{AppEvent, Outcome, StoryRequest};
use lingopop_gateway::Gateway;

use super::request_failure;

pub async fn handle_story(
    gateway: Arc<dyn Gateway>,
    request: StoryRequest,
    loopback: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let result = gateway
        .generate_story(&request.words, &request.source_name, &request.target_name)
        .await
        .map_err(|e| request_failure(&e));

    loopback
        .send(AppEvent::Outcome(Outcome::Story {
            ticket: request.ticket,
            result,
        }))
        .await?;

    Ok(())
}
