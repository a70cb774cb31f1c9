use serde_json::Value;

use crate::models::{ClusterDraft, ClusterView};

use super::client::api_call;

/// Load the provisioned clusters visible to the configured token.
pub async fn load_clusters(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Vec<ClusterView> {
    let payload = api_call(client, api_base_url, api_token, "GET", "/v1/clusters", None, None).await;
    let mut out = vec![];
    if payload.get("code").and_then(|c| c.as_str()) == Some("OKAY") {
        if let Some(arr) = payload.get("data").and_then(|d| d.as_array()) {
            for item in arr {
                if let Some(obj) = item.as_object() {
                    out.push(ClusterView {
                        id: obj.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        name: obj.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        status: obj
                            .get("status")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                        node_count: obj.get("nodeCount").and_then(|v| v.as_i64()).unwrap_or(0),
                    });
                }
            }
        }
    }
    out
}

/// Show the raw payload for one cluster.
pub async fn get_cluster(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    cluster_id: &str,
) -> Value {
    let endpoint = format!("/v1/clusters/{}", cluster_id);
    api_call(client, api_base_url, api_token, "GET", &endpoint, None, None).await
}

/// Tear down a provisioned cluster.
pub async fn delete_cluster(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    cluster_id: &str,
) -> Value {
    let endpoint = format!("/v1/clusters/{}", cluster_id);
    api_call(client, api_base_url, api_token, "DELETE", &endpoint, None, None).await
}

/// Submit a finished draft as a single creation request. The body is the
/// draft serialized field for field; the response envelope is the only thing
/// the caller learns about the provisioning side.
pub async fn create_cluster(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    draft: &ClusterDraft,
) -> Value {
    let body = serde_json::to_value(draft).unwrap_or(Value::Null);
    api_call(
        client,
        api_base_url,
        api_token,
        "POST",
        "/v1/clusters",
        Some(body),
        None,
    )
    .await
}
