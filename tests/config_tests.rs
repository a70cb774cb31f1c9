use pmk::config;
use std::env;

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://pve.example.com/api/"),
        "https://pve.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_no_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://pve.example.com/api"),
        "https://pve.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("https://pve.example.com/api///"),
        "https://pve.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  https://pve.example.com/api/  "),
        "https://pve.example.com/api"
    );
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), "http://localhost:8006");
}

#[test]
fn test_sanitize_base_url_whitespace_only() {
    assert_eq!(config::sanitize_base_url("   "), "http://localhost:8006");
}

#[test]
fn test_get_api_base_url_env_behaviour() {
    env::set_var("API_BASE_URL", "https://pve.example.com/api/");
    assert_eq!(config::get_api_base_url(), "https://pve.example.com/api");

    env::set_var("API_BASE_URL", "https://pve.example.com/api");
    assert_eq!(config::get_api_base_url(), "https://pve.example.com/api");

    // DEFAULT_API_BASE_URL is empty, so sanitize_base_url returns the
    // localhost fallback
    env::remove_var("API_BASE_URL");
    assert_eq!(config::get_api_base_url(), "http://localhost:8006");
}

#[test]
fn test_get_draft_file_path_default_and_override() {
    env::remove_var("PMK_DRAFT_FILE");
    assert_eq!(
        config::get_draft_file_path(),
        std::path::PathBuf::from(config::DEFAULT_DRAFT_FILE)
    );

    env::set_var("PMK_DRAFT_FILE", "/tmp/other-draft.json");
    assert_eq!(
        config::get_draft_file_path(),
        std::path::PathBuf::from("/tmp/other-draft.json")
    );
    env::remove_var("PMK_DRAFT_FILE");
}
