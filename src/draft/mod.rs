pub mod allocator;
pub mod selection;
pub mod steps;
pub mod store;

// Re-export commonly used items
pub use allocator::{allocate_node, FIRST_MASTER_OFFSET, FIRST_WORKER_MIN_OFFSET};
pub use selection::SelectionState;
pub use steps::{first_invalid_step, is_step_valid, WizardStep};
pub use store::{default_master_template, DraftStore};
