use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    target: NodeId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Keeps the clicked link from navigating.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Delegated click listener: matches targets carrying `target_class` that sit
/// inside an element with `within_class`, itself inside `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delegation {
    scope: NodeId,
    within_class: &'static str,
    target_class: &'static str,
}

impl Delegation {
    pub fn new(scope: NodeId, within_class: &'static str, target_class: &'static str) -> Self {
        Self {
            scope,
            within_class,
            target_class,
        }
    }

    /// `.card .btn` under `scope`.
    pub fn card_buttons(scope: NodeId) -> Self {
        Self::new(scope, "card", "btn")
    }

    pub fn scope(&self) -> NodeId {
        self.scope
    }

    pub fn matches(&self, doc: &Document, target: NodeId) -> bool {
        if !doc.has_class(target, self.target_class) || doc.is_hidden(target) {
            return false;
        }
        match doc.closest_with_class(target, self.within_class) {
            Some(within) => within == self.scope || doc.is_descendant_of(within, self.scope),
            None => false,
        }
    }
}
