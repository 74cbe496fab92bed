//! Adapters for the vendor identity widgets embedded next to the portal
//! pages: the name-pronunciation recorder and the call-verification widget.
//! The vendor bundles are opaque; these types own the configuration handed to
//! them and the handling of their completion callbacks.

pub mod call_verification;
pub mod modal;
pub mod name_recorder;

use serde::{Deserialize, Serialize};

pub use call_verification::{
    completion_channel, CallDialog, CallVerificationForm, FailureNotification, WidgetCallback,
    WidgetCompletion, WidgetError, WidgetFailure, WidgetOutcome, WidgetRow,
};
pub use modal::{DismissTrigger, Modal, ModalHost, Overlay, OverlayKind};
pub use name_recorder::{NameRecorderConfig, RecorderTrigger};

/// Deployment-specific values passed to the vendor bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    pub recorder_event_code: String,
    pub recorder_access_token: String,
    pub brand_color: String,
    pub call_access_code: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            recorder_event_code: String::new(),
            recorder_access_token: String::new(),
            brand_color: "#0d4268".to_string(),
            call_access_code: "EXPERIENCE".to_string(),
        }
    }
}
