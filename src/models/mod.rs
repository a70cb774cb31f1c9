pub mod app_state;
pub mod catalog;
pub mod cluster_view;
pub mod draft;
pub mod node;

// Re-export commonly used types
pub use app_state::AppState;
pub use catalog::{AddonInfo, HelmChartInfo};
pub use cluster_view::ClusterView;
pub use draft::{AddonSelection, ClusterDraft, ClusterResource, HelmApp};
pub use node::{ClusterNode, NodePatch, NodeType};
