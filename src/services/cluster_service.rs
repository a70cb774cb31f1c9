use serde_json::Value;

use crate::models::{AppState, ClusterDraft};

/// Sends the finished draft to the provisioning service.
///
/// The draft's lifecycle ends here: on success the created cluster is tracked
/// server-side and the local draft file should be discarded.
pub async fn submit_draft(state: &AppState, draft: &ClusterDraft) -> Value {
    tracing::info!(cluster = %draft.cluster_name, nodes = draft.nodes.len(), "submitting draft");
    crate::api::create_cluster(&state.client, &state.api_base_url, &state.api_token, draft).await
}

/// True if the API envelope reports success.
pub fn response_ok(payload: &Value) -> bool {
    payload.get("code").and_then(|c| c.as_str()) == Some("OKAY")
}
