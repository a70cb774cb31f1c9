use serde::{Deserialize, Serialize};

/// Role a virtual machine plays inside the Kubernetes cluster.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Control-plane node.
    Master,
    /// Workload node.
    Worker,
}

impl NodeType {
    /// Human-readable label shown in tables.
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Master => "Master",
            NodeType::Worker => "Worker",
        }
    }

    /// Parse from the string value stored in JSON and accepted on the CLI.
    pub fn from_str(s: &str) -> Option<NodeType> {
        match s {
            "master" => Some(NodeType::Master),
            "worker" => Some(NodeType::Worker),
            _ => None,
        }
    }

    /// Serialise to the string value stored in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Master => "master",
            NodeType::Worker => "worker",
        }
    }
}

/// One virtual machine slated to become a Kubernetes node.
///
/// A node's role is fixed once created; changing it means deleting the node
/// and adding a new one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    /// Proxmox VM identifier, unique within one draft.
    pub vm_id: i64,
    /// Short node name, conventionally `<role>-<index>`; the cluster name is
    /// prepended for display only, never stored here.
    pub name: String,
    pub node_type: NodeType,
    /// Dotted-quad IPv4 address.
    pub ip_address: String,
    pub cores: i64,
    /// Memory in MiB.
    pub memory: i64,
    pub storage_pool: String,
}

/// Editable node fields merged into an existing node by the draft store.
/// Identity fields (`vm_id`, `name`, `node_type`) are not patchable.
#[derive(Clone, Debug, Default)]
pub struct NodePatch {
    pub cores: Option<i64>,
    pub memory: Option<i64>,
    pub ip_address: Option<String>,
    pub storage_pool: Option<String>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        self.cores.is_none()
            && self.memory.is_none()
            && self.ip_address.is_none()
            && self.storage_pool.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_roundtrip() {
        for role in [NodeType::Master, NodeType::Worker] {
            let parsed = NodeType::from_str(role.as_str()).expect("should parse back");
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn node_type_invalid_returns_none() {
        assert!(NodeType::from_str("etcd").is_none());
        assert!(NodeType::from_str("Master").is_none());
    }

    #[test]
    fn node_serialises_with_camel_case_keys() {
        let node = ClusterNode {
            vm_id: 100,
            name: "master-1".into(),
            node_type: NodeType::Master,
            ip_address: "10.0.0.100".into(),
            cores: 2,
            memory: 4096,
            storage_pool: "local-lvm".into(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["vmId"], 100);
        assert_eq!(json["nodeType"], "master");
        assert_eq!(json["ipAddress"], "10.0.0.100");
        assert_eq!(json["storagePool"], "local-lvm");
    }
}
