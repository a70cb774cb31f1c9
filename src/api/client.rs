use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use yansi::Paint;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Renders the request as a copy-pastable curl command line.
fn curl_line(api_token: &str, method: &str, url: &str, body: Option<&Value>) -> String {
    let mut parts = vec![
        Paint::new("curl").fg(yansi::Color::Green).bold().to_string(),
        format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()),
        format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)),
    ];
    if !api_token.is_empty() {
        parts.push(
            Paint::new(format!("-H 'API-Token: {}'", api_token))
                .fg(yansi::Color::Magenta)
                .to_string(),
        );
    }
    if let Some(b) = body {
        let json_str = serde_json::to_string_pretty(b).unwrap_or_default();
        parts.push(
            Paint::new("-H 'Content-Type: application/json'")
                .fg(yansi::Color::Magenta)
                .to_string(),
        );
        parts.push(format!(
            "{} '{}'",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(json_str.replace('\'', "'\\''")).fg(yansi::Color::White)
        ));
    }
    parts.join(" ")
}

/// Core HTTP client function for talking to the platform API.
/// Handles authentication, request building, and error envelopes.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Value {
    let url = format!("{}{}", api_base_url, endpoint);

    let mut url_for_log = url.clone();
    if let Some(ref p) = params {
        if !p.is_empty() {
            let query_string = p
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<String>>()
                .join("&");
            url_for_log = format!("{}?{}", url_for_log, query_string);
        }
    }
    log_output(format!(
        "Request:\n{}",
        curl_line(api_token, method, &url_for_log, body.as_ref())
    ));

    let mut req = match method {
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };
    if !api_token.is_empty() {
        req = req.header("API-Token", api_token);
    }
    if let Some(ref p) = params {
        req = req.query(p);
    }
    if let Some(ref b) = body {
        req = req.json(b);
    }

    let result = match req.send().await {
        Ok(resp) => resp
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({"error": "Failed to parse response"})),
        Err(e) => serde_json::json!({"error": format!("Request failed: {}", e)}),
    };

    let json_str = serde_json::to_string(&result).unwrap_or_else(|_| format!("{:?}", result));
    log_output(format!(
        "Response:\n{}",
        Paint::new(json_str).rgb(100, 100, 100)
    ));

    result
}
