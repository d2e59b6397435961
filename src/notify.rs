//! Dismissible banners in `#message-container`.
//!
//! The container holds at most one banner: every `show_*` call empties it
//! before appending, so repeated calls replace rather than stack.

use crate::dom::{Document, MessageContainer, NodeId};
use crate::errors::UiError;
use crate::state::Page;
use crate::ui::{Tone, build_banner};
use tracing::{error, warn};

pub const WARNING_TEXT: &str = "Oops! You'll catch 'em next time!";
pub const FAILURE_TEXT: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy)]
pub struct NotificationBanner {
    container: MessageContainer,
}

impl NotificationBanner {
    pub fn resolve(doc: &Document) -> Result<Self, UiError> {
        Ok(Self {
            container: MessageContainer::resolve(doc)?,
        })
    }

    pub fn show_success(&self, doc: &mut Document, catchphrase: &str) -> NodeId {
        self.replace(doc, Tone::Success, catchphrase)
    }

    pub fn show_warning(&self, doc: &mut Document) -> NodeId {
        self.replace(doc, Tone::Warning, WARNING_TEXT)
    }

    pub fn show_failure(&self, doc: &mut Document, message: &str) -> NodeId {
        self.replace(doc, Tone::Danger, message)
    }

    pub fn current(&self, doc: &Document) -> Option<NodeId> {
        doc.children(self.container.node()).first().copied()
    }

    pub fn dismiss(&self, doc: &mut Document) {
        doc.clear_children(self.container.node());
    }

    fn replace(&self, doc: &mut Document, tone: Tone, body: &str) -> NodeId {
        let container = self.container.node();
        doc.clear_children(container);
        let banner = build_banner(doc, tone, body);
        doc.append_child(container, banner);
        banner
    }
}

/// Close-button wiring: removes the alert enclosing `target` if `target`
/// sits inside a `data-dismiss="alert"` control.
pub fn dismiss_on_click(doc: &mut Document, target: NodeId) -> bool {
    let mut current = Some(target);
    while let Some(candidate) = current {
        if doc.attr(candidate, "data-dismiss") == Some("alert") {
            if let Some(alert) = doc.closest_with_class(candidate, "alert") {
                doc.remove(alert);
                return true;
            }
            return false;
        }
        current = doc.parent(candidate);
    }
    false
}

/// Surfaces a failed operation to the user through the failure banner.
pub async fn report_failure(page: &Page, err: &UiError) {
    warn!(error = %err, network = err.is_network(), "operation failed");
    let mut doc = page.document.lock().await;
    match NotificationBanner::resolve(&doc) {
        Ok(banner) => {
            banner.show_failure(&mut doc, FAILURE_TEXT);
        }
        Err(missing) => error!(error = %missing, "cannot show failure banner"),
    }
}
