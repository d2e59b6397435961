use crate::dom::{Document, NodeId};
use crate::errors::UiError;
use crate::events::{ClickEvent, Delegation};
use crate::models::{FISH_ID_ATTR, FishId, USER_ID_ATTR, UserId};
use crate::notify::{NotificationBanner, dismiss_on_click, report_failure};
use crate::state::Page;
use crate::ui::{ToggleControlKind, build_toggle_control};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Caught { catchphrase: String },
    Uncaught,
}

/// A clicked toggle control resolved against its card context.
#[derive(Debug, Clone)]
pub struct ToggleTarget {
    pub control: NodeId,
    pub parent: NodeId,
    pub user_id: UserId,
    pub fish_id: FishId,
}

impl ToggleTarget {
    /// The control's parent must carry `data-user-id` and `data-fish-id="fish-<id>"`.
    pub fn resolve(doc: &Document, control: NodeId) -> Result<Self, UiError> {
        let parent = doc
            .parent(control)
            .ok_or(UiError::MissingAttribute { attr: USER_ID_ATTR })?;
        let user_attr = doc
            .attr(parent, USER_ID_ATTR)
            .ok_or(UiError::MissingAttribute { attr: USER_ID_ATTR })?;
        let fish_attr = doc
            .attr(parent, FISH_ID_ATTR)
            .ok_or(UiError::MissingAttribute { attr: FISH_ID_ATTR })?;

        Ok(Self {
            control,
            parent,
            user_id: UserId::parse_attr(user_attr)?,
            fish_id: FishId::parse_attr(fish_attr)?,
        })
    }
}

/// What a click on the page turned into. Each variant carries the click event
/// as it stood when dispatch returned.
#[derive(Debug)]
pub enum Dispatch {
    Ignored(ClickEvent),
    Dismissed(ClickEvent),
    Toggling {
        event: ClickEvent,
        task: JoinHandle<Result<ToggleOutcome, UiError>>,
    },
}

impl Dispatch {
    pub fn event(&self) -> &ClickEvent {
        match self {
            Dispatch::Ignored(event) | Dispatch::Dismissed(event) => event,
            Dispatch::Toggling { event, .. } => event,
        }
    }
}

/// Click handler for the caught/uncaught controls on collection cards.
#[derive(Clone)]
pub struct ToggleCaughtHandler {
    page: Page,
    delegation: Delegation,
}

impl ToggleCaughtHandler {
    /// Listens for `.card .btn` clicks below `scope`.
    pub fn register(page: Page, scope: NodeId) -> Self {
        Self {
            page,
            delegation: Delegation::card_buttons(scope),
        }
    }

    pub fn delegation(&self) -> Delegation {
        self.delegation
    }

    /// Handles one click end to end. Errors are returned untouched; the
    /// clicked control stays visible when the toggle request itself fails.
    pub async fn handle(&self, event: &mut ClickEvent) -> Result<ToggleOutcome, UiError> {
        event.prevent_default();

        let target = {
            let doc = self.page.document.lock().await;
            ToggleTarget::resolve(&doc, event.target())?
        };

        let result = self
            .page
            .api
            .toggle_caught(&target.user_id, &target.fish_id)
            .await?;
        info!(
            user_id = %target.user_id,
            fish_id = %target.fish_id,
            is_caught = result.is_caught,
            "toggled fish"
        );

        let next = if result.is_caught {
            ToggleControlKind::MarkUncaught
        } else {
            ToggleControlKind::MarkCaught
        };
        {
            let mut doc = self.page.document.lock().await;
            doc.hide(target.control);
            let control = build_toggle_control(&mut doc, &target.fish_id, next);
            doc.append_child(target.parent, control);

            if !result.is_caught {
                NotificationBanner::resolve(&doc)?.show_warning(&mut doc);
                return Ok(ToggleOutcome::Uncaught);
            }
        }

        let detail = self.page.api.fish_detail(&target.fish_id).await?;
        let mut doc = self.page.document.lock().await;
        NotificationBanner::resolve(&doc)?.show_success(&mut doc, &detail.catchphrase);
        Ok(ToggleOutcome::Caught {
            catchphrase: detail.catchphrase,
        })
    }

    /// Runs [`handle`](Self::handle) on its own task and reports any failure
    /// through the failure banner. The caller's event is default-prevented
    /// before this returns.
    pub fn spawn(&self, event: &mut ClickEvent) -> JoinHandle<Result<ToggleOutcome, UiError>> {
        event.prevent_default();
        let mut event = *event;
        let handler = self.clone();
        tokio::spawn(async move {
            let outcome = handler.handle(&mut event).await;
            if let Err(err) = &outcome {
                report_failure(&handler.page, err).await;
            }
            outcome
        })
    }
}

/// Routes a click on `target` to the banner close wiring or the toggle handler.
pub async fn dispatch_click(toggles: &ToggleCaughtHandler, target: NodeId) -> Dispatch {
    let mut event = ClickEvent::new(target);
    let matched = {
        let mut doc = toggles.page.document.lock().await;
        if dismiss_on_click(&mut doc, target) {
            return Dispatch::Dismissed(event);
        }
        toggles.delegation.matches(&doc, target)
    };

    if !matched {
        debug!(?target, "click outside any listener");
        return Dispatch::Ignored(event);
    }
    let task = toggles.spawn(&mut event);
    Dispatch::Toggling { event, task }
}
