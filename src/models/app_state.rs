use std::path::PathBuf;

/// Shared application context handed to every command handler.
#[derive(Clone)]
pub struct AppState {
    pub api_base_url: String,
    pub api_token: String,
    /// Where the in-progress draft is persisted between invocations.
    pub draft_file: PathBuf,
    pub client: reqwest::Client,
}
