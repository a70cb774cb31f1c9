pub mod cluster_service;
pub mod draft_file;

// Re-export commonly used functions
pub use cluster_service::{response_ok, submit_draft};
pub use draft_file::{discard_draft_file, load_draft_file, persist_draft_file, DraftFileError};
