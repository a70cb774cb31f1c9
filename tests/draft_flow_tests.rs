/// End-to-end exercises of the draft store, the step gates and the draft
/// file, the way a full wizard session drives them.
use once_cell::sync::Lazy;

use pmk::draft::{first_invalid_step, is_step_valid, DraftStore, SelectionState, WizardStep};
use pmk::models::{AddonInfo, ClusterResource, HelmApp, NodePatch, NodeType};
use pmk::services::{load_draft_file, persist_draft_file};

static ADDON_CATALOG: Lazy<Vec<AddonInfo>> = Lazy::new(|| {
    vec![
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
        AddonInfo {
            name: "cert-manager".into(),
            title: "Certificate Manager".into(),
            panel_name: "certManagerPanel".into(),
        },
    ]
});

fn build_session_draft() -> DraftStore {
    let mut store = DraftStore::new("demo");
    store.add_node(NodeType::Master);
    store.add_node(NodeType::Worker);
    store.add_node(NodeType::Worker);
    store.enable_addon("load-balancer", Some("10.0.0-200".into()));
    store.upsert_helm_app(HelmApp {
        release_name: "monitoring".into(),
        chart_name: "kube-prometheus-stack".into(),
        chart_version: "58.1.0".into(),
        namespace: "monitoring".into(),
        values: String::new(),
    });
    store.upsert_k8s_resource(ClusterResource {
        name: "team-quota".into(),
        manifest: "apiVersion: v1\nkind: ResourceQuota\nmetadata:\n  name: team-quota".into(),
    });
    store
}

#[test]
fn full_wizard_session_produces_a_submittable_draft() {
    let store = build_session_draft();
    let draft = store.draft();

    assert_eq!(draft.master_nodes().len(), 1);
    assert_eq!(draft.worker_nodes().len(), 2);
    // first worker placed 5 ids above the master, second stepped by one
    let worker_ids: Vec<i64> = draft.worker_nodes().iter().map(|n| n.vm_id).collect();
    assert_eq!(worker_ids, vec![105, 106]);

    for step in WizardStep::all() {
        assert!(is_step_valid(*step, draft), "step {:?} should pass", step);
    }
    assert_eq!(first_invalid_step(draft), None);

    let (enabled, available) = store.partition_addons(&ADDON_CATALOG);
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].name, "load-balancer");
    assert_eq!(available.len(), 2);
}

#[test]
fn submission_payload_uses_camel_case_wire_keys() {
    let store = build_session_draft();
    let json = serde_json::to_value(store.draft()).unwrap();

    assert_eq!(json["clusterName"], "demo");
    assert_eq!(json["nodes"][0]["vmId"], 100);
    assert_eq!(json["nodes"][0]["nodeType"], "master");
    assert_eq!(json["nodes"][0]["ipAddress"], "10.0.0.100");
    assert_eq!(json["nodes"][0]["storagePool"], "local-lvm");
    assert_eq!(json["addons"][0]["name"], "load-balancer");
    assert_eq!(json["addons"][0]["args"], "10.0.0-200");
    assert_eq!(
        json["helmApps"]["monitoring"]["chartName"],
        "kube-prometheus-stack"
    );
    assert_eq!(
        json["k8sResources"]["team-quota"]["name"],
        "team-quota"
    );
}

#[test]
fn properties_panel_survives_a_stale_selection() {
    let mut store = build_session_draft();
    let mut panel = SelectionState::new();

    // user opens the properties panel on the second worker, then deletes it
    // from the table underneath the panel
    panel.select("nodePanel", "106");
    store.remove_node(106);

    // the panel still holds the stale id; applying an edit through it must
    // do nothing rather than corrupt the draft
    let patched = store.update_node(106, &NodePatch {
        cores: Some(16),
        ..Default::default()
    });
    assert!(!patched);
    assert_eq!(store.draft().nodes.len(), 2);

    panel.hide();
    assert!(!panel.is_open());
}

#[test]
fn panel_stays_open_while_an_operation_is_in_flight() {
    let mut panel = SelectionState::new();
    panel.select("helmPanel", "monitoring");
    panel.block();
    panel.hide();
    assert!(panel.is_open());
    assert_eq!(panel.panel_key(), Some("helmPanel"));
    panel.unblock();
    panel.hide();
    assert!(!panel.is_open());
}

#[tokio::test]
async fn draft_file_round_trip_preserves_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster-draft.json");

    let store = build_session_draft();
    persist_draft_file(&path, store.draft()).await.unwrap();

    let reloaded = load_draft_file(&path).await.unwrap();
    assert_eq!(&reloaded, store.draft());

    // resuming the session continues allocating from the persisted nodes
    let mut resumed = DraftStore::from_draft(reloaded);
    resumed.add_node(NodeType::Worker);
    assert_eq!(resumed.draft().nodes.last().unwrap().vm_id, 107);
    assert_eq!(resumed.draft().nodes.last().unwrap().name, "worker-3");
}

#[tokio::test]
async fn loading_a_missing_draft_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");
    assert!(load_draft_file(&path).await.is_err());
}
