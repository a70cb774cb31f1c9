use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::{ClusterNode, NodeType};

/// An enabled platform add-on, with its optional argument string.
///
/// Arguments are free-form and add-on specific; the load balancer for example
/// takes an IP range encoded as `<prefix>-<start>`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddonSelection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// A Helm release to install into the cluster after provisioning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmApp {
    pub release_name: String,
    pub chart_name: String,
    pub chart_version: String,
    pub namespace: String,
    /// Raw values.yaml content passed to the chart.
    #[serde(default)]
    pub values: String,
}

/// A custom Kubernetes manifest applied to the cluster after provisioning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResource {
    pub name: String,
    pub manifest: String,
}

/// The in-memory, not-yet-submitted cluster definition being edited.
///
/// This is also the exact wire shape sent to the provisioning service on
/// submission, field for field with camelCase keys.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDraft {
    pub cluster_name: String,
    #[serde(default)]
    pub nodes: Vec<ClusterNode>,
    /// Enabled add-ons; set semantics keyed by `name`.
    #[serde(default)]
    pub addons: Vec<AddonSelection>,
    /// Helm releases keyed by release name.
    #[serde(default)]
    pub helm_apps: BTreeMap<String, HelmApp>,
    /// Custom manifests keyed by resource name.
    #[serde(default)]
    pub k8s_resources: BTreeMap<String, ClusterResource>,
    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

impl ClusterDraft {
    /// An empty draft for a freshly opened wizard.
    pub fn new(cluster_name: &str) -> ClusterDraft {
        ClusterDraft {
            cluster_name: cluster_name.to_string(),
            nodes: Vec::new(),
            addons: Vec::new(),
            helm_apps: BTreeMap::new(),
            k8s_resources: BTreeMap::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Control-plane nodes, computed on read so the view can never go stale.
    pub fn master_nodes(&self) -> Vec<&ClusterNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Master)
            .collect()
    }

    /// Workload nodes, computed on read.
    pub fn worker_nodes(&self) -> Vec<&ClusterNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Worker)
            .collect()
    }

    /// Looks up a node by VM id.
    pub fn node(&self, vm_id: i64) -> Option<&ClusterNode> {
        self.nodes.iter().find(|n| n.vm_id == vm_id)
    }

    /// Returns true if the named add-on is enabled.
    pub fn has_addon(&self, name: &str) -> bool {
        self.addons.iter().any(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_is_empty() {
        let draft = ClusterDraft::new("demo");
        assert_eq!(draft.cluster_name, "demo");
        assert!(draft.nodes.is_empty());
        assert!(draft.addons.is_empty());
        assert!(draft.helm_apps.is_empty());
        assert!(draft.k8s_resources.is_empty());
        assert!(!draft.created_at.is_empty());
    }

    #[test]
    fn role_views_partition_nodes() {
        let mut draft = ClusterDraft::new("demo");
        draft.nodes.push(ClusterNode {
            vm_id: 100,
            name: "master-1".into(),
            node_type: NodeType::Master,
            ip_address: "10.0.0.100".into(),
            cores: 2,
            memory: 4096,
            storage_pool: "local-lvm".into(),
        });
        draft.nodes.push(ClusterNode {
            vm_id: 105,
            name: "worker-1".into(),
            node_type: NodeType::Worker,
            ip_address: "10.0.0.105".into(),
            cores: 2,
            memory: 4096,
            storage_pool: "local-lvm".into(),
        });
        assert_eq!(draft.master_nodes().len(), 1);
        assert_eq!(draft.worker_nodes().len(), 1);
        assert_eq!(draft.master_nodes()[0].vm_id, 100);
    }

    #[test]
    fn draft_serialises_with_camel_case_keys() {
        let draft = ClusterDraft::new("demo");
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("clusterName").is_some());
        assert!(json.get("helmApps").is_some());
        assert!(json.get("k8sResources").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
