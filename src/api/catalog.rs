use serde_json::Value;

use crate::models::{AddonInfo, HelmChartInfo};

use super::client::api_call;

fn catalog_entries(payload: &Value, key: &str) -> Vec<Value> {
    if payload.get("code").and_then(|c| c.as_str()) != Some("OKAY") {
        return vec![];
    }
    if let Some(arr) = payload.get("data").and_then(|d| d.as_array()) {
        arr.clone()
    } else if let Some(arr) = payload
        .get("data")
        .and_then(|d| d.get(key))
        .and_then(|a| a.as_array())
    {
        arr.clone()
    } else {
        vec![]
    }
}

/// Load the add-on catalog from the API.
/// Returns the list of platform features a cluster can enable.
pub async fn load_addon_catalog(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Vec<AddonInfo> {
    let payload = api_call(
        client,
        api_base_url,
        api_token,
        "GET",
        "/v1/catalog/addons",
        None,
        None,
    )
    .await;
    let mut out = vec![];
    for item in catalog_entries(&payload, "addons") {
        if let Some(obj) = item.as_object() {
            out.push(AddonInfo {
                name: obj.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                title: obj.get("title").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                panel_name: obj
                    .get("panelName")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }
    }
    out
}

/// Load the Helm chart catalog from the API.
pub async fn load_helm_catalog(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Vec<HelmChartInfo> {
    let payload = api_call(
        client,
        api_base_url,
        api_token,
        "GET",
        "/v1/catalog/charts",
        None,
        None,
    )
    .await;
    let mut out = vec![];
    for item in catalog_entries(&payload, "charts") {
        if let Some(obj) = item.as_object() {
            out.push(HelmChartInfo {
                name: obj.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                title: obj.get("title").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                panel_name: obj
                    .get("panelName")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }
    }
    out
}
