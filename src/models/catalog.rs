use serde::{Deserialize, Serialize};

/// One entry of the add-on catalog served by the platform API.
///
/// The catalog is read-only reference data; the draft only records which
/// entries the user enabled.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonInfo {
    pub name: String,
    pub title: String,
    /// Identifier of the property-editor panel shown when the entry is
    /// selected in the wizard.
    pub panel_name: String,
}

/// One entry of the Helm chart catalog served by the platform API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartInfo {
    pub name: String,
    pub title: String,
    pub panel_name: String,
}
