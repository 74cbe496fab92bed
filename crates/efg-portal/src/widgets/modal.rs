use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use super::call_verification::FailureNotification;
use crate::portal::view::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Backdrop,
    Dialog,
}

/// Element appended to the document body while a modal is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub id: u64,
    pub kind: OverlayKind,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissTrigger {
    HeaderClose,
    FooterClose,
    Backdrop,
}

/// Document body that modals attach their overlays to.
#[derive(Debug, Clone, Default)]
pub struct ModalHost {
    overlays: Arc<Mutex<Vec<Overlay>>>,
    next_id: Arc<AtomicU64>,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Overlay>> {
        self.overlays.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends a backdrop and a dialog. Both leave the body when the returned
    /// `Modal` is dismissed or dropped.
    pub fn open(&self, notification: &FailureNotification) -> Modal {
        let backdrop_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let dialog_id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut overlays = self.lock();
        overlays.push(Overlay {
            id: backdrop_id,
            kind: OverlayKind::Backdrop,
            html: "<div class=\"modal-backdrop\"></div>".to_string(),
        });
        overlays.push(Overlay {
            id: dialog_id,
            kind: OverlayKind::Dialog,
            html: render_dialog(notification),
        });
        debug!(backdrop_id, dialog_id, "notification modal opened");

        Modal {
            host: self.clone(),
            backdrop_id,
            dialog_id,
        }
    }

    fn remove(&self, ids: [u64; 2]) {
        self.lock().retain(|overlay| !ids.contains(&overlay.id));
    }
}

/// Open notification modal.
#[derive(Debug)]
pub struct Modal {
    host: ModalHost,
    backdrop_id: u64,
    dialog_id: u64,
}

impl Modal {
    /// Every trigger closes the modal; the trigger is returned for logging.
    pub fn dismiss(self, trigger: DismissTrigger) -> DismissTrigger {
        debug!(?trigger, dialog_id = self.dialog_id, "notification modal dismissed");
        trigger
    }
}

impl Drop for Modal {
    fn drop(&mut self) {
        self.host.remove([self.backdrop_id, self.dialog_id]);
    }
}

/// Dialog markup with a header close button and a footer close button.
pub fn render_dialog(notification: &FailureNotification) -> String {
    let mut html = String::from("<div class=\"modal-dialog\" role=\"dialog\">");
    write!(
        html,
        "<div class=\"modal-header\"><button type=\"button\" class=\"close-modal\">&times;</button><h3>{}</h3></div>",
        escape_html(&notification.title)
    )
    .expect("modal header");
    write!(
        html,
        "<div class=\"modal-body\"><p>{}</p>",
        escape_html(&notification.message)
    )
    .expect("modal message");
    if let Some(suggestion) = &notification.retry_suggestion {
        write!(html, "<p>{}</p>", escape_html(suggestion)).expect("retry suggestion");
    }
    html.push_str("</div><div class=\"modal-footer\"><button type=\"button\" class=\"btn-record close-modal\">Close</button></div></div>");
    html
}
