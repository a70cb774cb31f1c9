use crate::models::ClusterDraft;

/// One page of the cluster creation wizard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    /// Master/worker node layout.
    Nodes,
    /// Platform add-ons.
    Addons,
    /// Helm applications.
    HelmApps,
    /// Custom Kubernetes manifests.
    Resources,
}

impl WizardStep {
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Nodes => "Nodes",
            WizardStep::Addons => "Add-ons",
            WizardStep::HelmApps => "Helm apps",
            WizardStep::Resources => "Resources",
        }
    }

    /// All wizard steps, in navigation order.
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Nodes,
            WizardStep::Addons,
            WizardStep::HelmApps,
            WizardStep::Resources,
        ]
    }
}

/// Gate for the wizard's "Next" control. Pure over the draft value and
/// recomputed on every read, so it can never report stale state.
///
/// The nodes step requires at least one master and a storage pool and IP
/// address on every node. The remaining steps carry no structural
/// constraints; key collisions are already resolved by the store's
/// last-write-wins upsert semantics.
pub fn is_step_valid(step: WizardStep, draft: &ClusterDraft) -> bool {
    match step {
        WizardStep::Nodes => {
            !draft.master_nodes().is_empty()
                && draft
                    .nodes
                    .iter()
                    .all(|n| !n.storage_pool.is_empty() && !n.ip_address.is_empty())
        }
        WizardStep::Addons | WizardStep::HelmApps | WizardStep::Resources => true,
    }
}

/// The first step that blocks submission, if any.
pub fn first_invalid_step(draft: &ClusterDraft) -> Option<WizardStep> {
    WizardStep::all()
        .iter()
        .copied()
        .find(|step| !is_step_valid(*step, draft))
}
