/// Tracks which entity is open in the properties side panel.
///
/// Two states: closed (no entity) and open (`panel_key` names the editor
/// component, `entity_id` the entity it edits). Selecting while open simply
/// replaces the selection; panels do not stack. While `blocked`, `hide` is a
/// no-op so the panel cannot be closed under an in-flight operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    panel_key: Option<String>,
    entity_id: Option<String>,
    blocked: bool,
}

impl SelectionState {
    /// Fresh state: closed, unblocked.
    pub fn new() -> SelectionState {
        SelectionState::default()
    }

    /// Opens the panel on the given entity. Last write wins.
    pub fn select(&mut self, panel_key: &str, entity_id: &str) {
        self.panel_key = Some(panel_key.to_string());
        self.entity_id = Some(entity_id.to_string());
    }

    /// Closes the panel unless an operation is in flight.
    pub fn hide(&mut self) {
        if self.blocked {
            return;
        }
        self.panel_key = None;
        self.entity_id = None;
    }

    /// Prevents `hide` from closing the panel until `unblock` is called.
    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    pub fn is_open(&self) -> bool {
        self.entity_id.is_some()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn panel_key(&self) -> Option<&str> {
        self.panel_key.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }
}
