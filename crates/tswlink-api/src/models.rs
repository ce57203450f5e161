// Wire models for the panel's partial-update responses.
//
// A POST to any `/Device` sub-resource answers with a batch of actions, each
// carrying per-property results. Unrelated properties are often echoed in
// the same batch, so nothing here decides success; see `tswlink-core`.

use serde::{Deserialize, Serialize};

/// Body of a partial-update response:
/// `{"Actions":[{"Results":[{ "Path", "Property", "StatusId", "StatusInfo" }]}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateResponse {
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl UpdateResponse {
    /// Every result of every action, in response order.
    pub fn results(&self) -> impl Iterator<Item = &ActionResult> {
        self.actions.iter().flat_map(|action| action.results.iter())
    }
}

/// One action of an update batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    #[serde(default)]
    pub results: Vec<ActionResult>,
}

/// Per-property status echoed by the panel.
///
/// `path` is the panel's own dotted path for the changed object and does not
/// always include the property name; `status_id` is absent on some firmware
/// error paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionResult {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub status_info: Option<String>,
}
