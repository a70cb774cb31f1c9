use crate::config;
use crate::models::{
    AddonInfo, AddonSelection, ClusterDraft, ClusterNode, ClusterResource, HelmApp, NodePatch,
    NodeType,
};

use super::allocator::allocate_node;

/// The template used when the very first node is added to an empty draft.
pub fn default_master_template() -> ClusterNode {
    ClusterNode {
        vm_id: config::DEFAULT_MASTER_VM_ID,
        name: config::DEFAULT_MASTER_NAME.to_string(),
        node_type: NodeType::Master,
        ip_address: config::DEFAULT_MASTER_IP.to_string(),
        cores: config::DEFAULT_NODE_CORES,
        memory: config::DEFAULT_NODE_MEMORY_MIB,
        storage_pool: config::DEFAULT_STORAGE_POOL.to_string(),
    }
}

/// Single source of truth for the cluster being edited in the wizard.
///
/// All mutations are synchronous and total; consistency checks live in the
/// step validator, not here. Operations addressed at a VM id that is no
/// longer present do nothing and report the miss through their return value,
/// so callers holding stale ids stay harmless.
pub struct DraftStore {
    draft: ClusterDraft,
}

impl DraftStore {
    /// Opens the wizard on an empty draft.
    pub fn new(cluster_name: &str) -> DraftStore {
        DraftStore {
            draft: ClusterDraft::new(cluster_name),
        }
    }

    /// Resumes editing a previously persisted draft.
    pub fn from_draft(draft: ClusterDraft) -> DraftStore {
        DraftStore { draft }
    }

    pub fn draft(&self) -> &ClusterDraft {
        &self.draft
    }

    pub fn into_draft(self) -> ClusterDraft {
        self.draft
    }

    /// Allocates a new node of the given role and appends it to the draft.
    /// The new node is always the last element of `nodes`.
    pub fn add_node(&mut self, role: NodeType) {
        let node = allocate_node(&self.draft.nodes, role, &default_master_template());
        tracing::debug!(vm_id = node.vm_id, name = %node.name, "node added to draft");
        self.draft.nodes.push(node);
    }

    /// Removes the node with the given VM id. Returns false if no such node
    /// existed.
    pub fn remove_node(&mut self, vm_id: i64) -> bool {
        let before = self.draft.nodes.len();
        self.draft.nodes.retain(|n| n.vm_id != vm_id);
        self.draft.nodes.len() != before
    }

    /// Merges the patch into the node with the given VM id. Identity fields
    /// are untouched. Returns false if no such node existed.
    pub fn update_node(&mut self, vm_id: i64, patch: &NodePatch) -> bool {
        let Some(node) = self.draft.nodes.iter_mut().find(|n| n.vm_id == vm_id) else {
            return false;
        };
        if let Some(cores) = patch.cores {
            node.cores = cores;
        }
        if let Some(memory) = patch.memory {
            node.memory = memory;
        }
        if let Some(ref ip) = patch.ip_address {
            node.ip_address = ip.clone();
        }
        if let Some(ref pool) = patch.storage_pool {
            node.storage_pool = pool.clone();
        }
        true
    }

    /// Enables an add-on, replacing the argument string if it was already
    /// enabled.
    pub fn enable_addon(&mut self, name: &str, args: Option<String>) {
        if let Some(existing) = self.draft.addons.iter_mut().find(|a| a.name == name) {
            existing.args = args;
        } else {
            self.draft.addons.push(AddonSelection {
                name: name.to_string(),
                args,
            });
        }
    }

    /// Disables an add-on. Returns false if it was not enabled.
    pub fn disable_addon(&mut self, name: &str) -> bool {
        let before = self.draft.addons.len();
        self.draft.addons.retain(|a| a.name != name);
        self.draft.addons.len() != before
    }

    /// Adds or replaces a Helm release, keyed by its release name.
    pub fn upsert_helm_app(&mut self, app: HelmApp) {
        self.draft.helm_apps.insert(app.release_name.clone(), app);
    }

    /// Removes a Helm release. Returns false if no such release existed.
    pub fn remove_helm_app(&mut self, release_name: &str) -> bool {
        self.draft.helm_apps.remove(release_name).is_some()
    }

    /// Adds or replaces a custom manifest, keyed by its name.
    pub fn upsert_k8s_resource(&mut self, resource: ClusterResource) {
        self.draft
            .k8s_resources
            .insert(resource.name.clone(), resource);
    }

    /// Removes a custom manifest. Returns false if no such resource existed.
    pub fn remove_k8s_resource(&mut self, name: &str) -> bool {
        self.draft.k8s_resources.remove(name).is_some()
    }

    pub fn master_nodes(&self) -> Vec<&ClusterNode> {
        self.draft.master_nodes()
    }

    pub fn worker_nodes(&self) -> Vec<&ClusterNode> {
        self.draft.worker_nodes()
    }

    /// Splits the catalog into the entries this draft has enabled and the
    /// rest, preserving catalog order.
    pub fn partition_addons<'a>(
        &self,
        catalog: &'a [AddonInfo],
    ) -> (Vec<&'a AddonInfo>, Vec<&'a AddonInfo>) {
        catalog.iter().partition(|a| self.draft.has_addon(&a.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_node_is_the_default_master() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        assert_eq!(store.draft().nodes.len(), 1);
        assert_eq!(store.draft().nodes[0], default_master_template());
    }

    #[test]
    fn second_master_is_stepped_by_one() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        store.add_node(NodeType::Master);
        let added = store.draft().nodes.last().unwrap();
        assert_eq!(added.vm_id, 101);
        assert_eq!(added.name, "master-2");
        assert_eq!(added.ip_address, "10.0.0.101");
    }

    #[test]
    fn first_worker_lands_five_ids_above_the_master() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        store.add_node(NodeType::Worker);
        let added = store.draft().nodes.last().unwrap();
        assert_eq!(added.vm_id, 105);
        assert_eq!(added.name, "worker-1");
        assert_eq!(added.ip_address, "10.0.0.105");
        assert_eq!(added.node_type, NodeType::Worker);
    }

    #[test]
    fn rapid_additions_allocate_strictly_increasing_ids() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        for _ in 0..4 {
            store.add_node(NodeType::Worker);
        }
        let ids: Vec<i64> = store.worker_nodes().iter().map(|n| n.vm_id).collect();
        assert_eq!(ids, vec![105, 106, 107, 108]);
    }

    #[test]
    fn remove_node_is_a_noop_on_unknown_id() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        assert!(!store.remove_node(999));
        assert_eq!(store.draft().nodes.len(), 1);
        assert!(store.remove_node(100));
        assert!(store.draft().nodes.is_empty());
    }

    #[test]
    fn update_node_merges_editable_fields_only() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        let patch = NodePatch {
            cores: Some(4),
            storage_pool: Some("ceph-pool".into()),
            ..Default::default()
        };
        assert!(store.update_node(100, &patch));
        let node = store.draft().node(100).unwrap();
        assert_eq!(node.cores, 4);
        assert_eq!(node.storage_pool, "ceph-pool");
        // untouched fields keep their values
        assert_eq!(node.memory, config::DEFAULT_NODE_MEMORY_MIB);
        assert_eq!(node.name, "master-1");
    }

    #[test]
    fn update_node_with_stale_id_reports_the_miss() {
        let mut store = DraftStore::new("demo");
        store.add_node(NodeType::Master);
        store.remove_node(100);
        let patch = NodePatch {
            cores: Some(8),
            ..Default::default()
        };
        assert!(!store.update_node(100, &patch));
    }

    #[test]
    fn enable_addon_twice_replaces_the_args() {
        let mut store = DraftStore::new("demo");
        store.enable_addon("load-balancer", Some("10.0.0-200".into()));
        store.enable_addon("load-balancer", Some("10.0.0-220".into()));
        assert_eq!(store.draft().addons.len(), 1);
        assert_eq!(
            store.draft().addons[0].args.as_deref(),
            Some("10.0.0-220")
        );
        assert!(store.disable_addon("load-balancer"));
        assert!(!store.disable_addon("load-balancer"));
    }

    #[test]
    fn helm_upsert_is_last_write_wins() {
        let mut store = DraftStore::new("demo");
        let app = |version: &str| HelmApp {
            release_name: "ingress".into(),
            chart_name: "ingress-nginx".into(),
            chart_version: version.into(),
            namespace: "ingress".into(),
            values: String::new(),
        };
        store.upsert_helm_app(app("4.9.0"));
        store.upsert_helm_app(app("4.10.1"));
        assert_eq!(store.draft().helm_apps.len(), 1);
        assert_eq!(store.draft().helm_apps["ingress"].chart_version, "4.10.1");
        assert!(store.remove_helm_app("ingress"));
        assert!(!store.remove_helm_app("ingress"));
    }

    #[test]
    fn resource_upsert_and_remove() {
        let mut store = DraftStore::new("demo");
        store.upsert_k8s_resource(ClusterResource {
            name: "quota".into(),
            manifest: "apiVersion: v1\nkind: ResourceQuota".into(),
        });
        assert!(store.remove_k8s_resource("quota"));
        assert!(!store.remove_k8s_resource("quota"));
    }

    #[test]
    fn partition_addons_splits_catalog_by_membership() {
        let catalog = vec![
            AddonInfo {
                name: "load-balancer".into(),
                title: "Load Balancer".into(),
                panel_name: "loadBalancerPanel".into(),
            },
            AddonInfo {
                name: "ingress".into(),
                title: "Ingress Controller".into(),
                panel_name: "ingressPanel".into(),
            },
        ];
        let mut store = DraftStore::new("demo");
        store.enable_addon("ingress", None);
        let (enabled, available) = store.partition_addons(&catalog);
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "ingress");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "load-balancer");
    }
}
