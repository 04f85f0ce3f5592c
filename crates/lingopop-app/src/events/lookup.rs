use std::sync::Arc;

use kanal::AsyncSender;
use lingopop_core::types::{AppEvent, LookupRequest, Outcome};
use lingopop_gateway::Gateway;

use super::{now_ms, request_failure};

/// Lookup and illustration run together; the illustration never fails the lookup
pub async fn handle_lookup(
    gateway: Arc<dyn Gateway>,
    request: LookupRequest,
    loopback: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let LookupRequest {
        epoch,
        term,
        source_lang,
        target_lang,
    } = request;

    let (lookup, image) = tokio::join!(
        gateway.lookup_term(&term, &source_lang, &target_lang),
        gateway.generate_visualization(&term, &target_lang.name),
    );
    tracing::debug!(
        "Lookup '{}' done (ok: {}, image: {})",
        term,
        lookup.is_ok(),
        image.is_some()
    );

    let result = lookup
        .map(|data| (data, image))
        .map_err(|e| request_failure(&e));

    loopback
        .send(AppEvent::Outcome(Outcome::Lookup {
            epoch,
            term,
            result,
            completed_at_ms: now_ms(),
        }))
        .await?;

    Ok(())
}
