use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_API_TOKEN: &str = "";
pub const DEFAULT_DRAFT_FILE: &str = "cluster-draft.json";

// Template for the first node added to an empty draft
pub const DEFAULT_MASTER_VM_ID: i64 = 100;
pub const DEFAULT_MASTER_NAME: &str = "master-1";
pub const DEFAULT_MASTER_IP: &str = "10.0.0.100";
pub const DEFAULT_NODE_CORES: i64 = 2;
pub const DEFAULT_NODE_MEMORY_MIB: i64 = 4096;
pub const DEFAULT_STORAGE_POOL: &str = "local-lvm";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_api_token() -> String {
    env::var("API_TOKEN").unwrap_or_else(|_| DEFAULT_API_TOKEN.to_string())
}

pub fn get_draft_file_path() -> PathBuf {
    env::var("PMK_DRAFT_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DRAFT_FILE))
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:8006".to_string()
    } else {
        trimmed.to_string()
    }
}
