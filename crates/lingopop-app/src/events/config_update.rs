use crate::state::AppState;

/// Apply a config change, rebuild the gateway and save the profile.
/// Returns the notice for the user.
pub async fn handle_config_update(state: &AppState, field: &str, value: &str) -> String {
    let updated = {
        let mut config = state.config.write().await;
        config.update_field(field, value).map(|_| config.clone())
    };

    let config = match updated {
        Ok(config) => config,
        Err(msg) => {
            tracing::warn!("Config update rejected: {}", msg);
            return format!("Couldn't update {field}: {msg}");
        }
    };

    if let Err(e) = state.rebuild_gateway().await {
        tracing::error!("Failed to rebuild gateway: {}", e);
        return format!("Settings changed but the AI service is unavailable: {e}");
    }

    if let Some((store, name)) = &state.profile
        && let Err(e) = store.save(name, &config)
    {
        tracing::error!("Failed to save profile {name}: {e:#}");
    }

    match field {
        "api_key" if config.gateway.has_credential() => "API key saved.".to_string(),
        "api_key" => "API key cleared.".to_string(),
        other => format!("{other} updated."),
    }
}
