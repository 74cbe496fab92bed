use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::modal::{Modal, ModalHost};
use super::WidgetSettings;

/// Element the vendor widget opens its call form from.
pub const TRIGGER_SELECTOR: &str = "#initiate-call";

/// Status the vendor returns when the account already has a recording.
pub const DUPLICATE_SUBMISSION_CODE: u16 = 405;
/// Message body the vendor returns for the same condition.
pub const DUPLICATE_SUBMISSION_MESSAGE: &str = "The email already used";

const DUPLICATE_NOTICE: &str = "Voice recording already saved for this account. Thank you!";
const GENERIC_NOTICE: &str = "We could not start the verification call.";
const RETRY_SUGGESTION: &str = "Please try again later or contact support for assistance.";

/// Form data passed to the widget's `initModalForm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallVerificationForm {
    pub access_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl CallVerificationForm {
    pub fn new(
        settings: &WidgetSettings,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
    ) -> Self {
        Self {
            access_code: settings.call_access_code.clone(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: phone_number.to_string(),
        }
    }
}

/// Final result reported by the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetOutcome {
    Success { payload: Value },
    Failure(WidgetFailure),
}

/// Failure callback arguments: the response body and an optional status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetFailure {
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub code: Option<u16>,
}

impl WidgetFailure {
    pub fn message(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|payload| payload.get("message"))
            .and_then(Value::as_str)
    }

    pub fn is_duplicate_submission(&self) -> bool {
        self.code == Some(DUPLICATE_SUBMISSION_CODE)
            || self.message() == Some(DUPLICATE_SUBMISSION_MESSAGE)
    }

    pub fn notification(&self) -> FailureNotification {
        if self.is_duplicate_submission() {
            return FailureNotification {
                title: "Notification".to_string(),
                message: DUPLICATE_NOTICE.to_string(),
                retry_suggestion: None,
            };
        }

        let message = match self.code {
            Some(code) => format!("{GENERIC_NOTICE} (Error code: {code})"),
            None => GENERIC_NOTICE.to_string(),
        };
        FailureNotification {
            title: "Notification".to_string(),
            message,
            retry_suggestion: Some(RETRY_SUGGESTION.to_string()),
        }
    }
}

/// Text shown in the failure modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotification {
    pub title: String,
    pub message: String,
    pub retry_suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("widget closed without reporting a result")]
    Abandoned,
}

/// Handed to the widget; consuming either method reports the single result.
#[derive(Debug)]
pub struct WidgetCallback {
    sender: oneshot::Sender<WidgetOutcome>,
}

impl WidgetCallback {
    pub fn succeed(self, payload: Value) {
        self.report(WidgetOutcome::Success { payload });
    }

    pub fn fail(self, payload: Option<Value>, code: Option<u16>) {
        self.report(WidgetOutcome::Failure(WidgetFailure { payload, code }));
    }

    fn report(self, outcome: WidgetOutcome) {
        if self.sender.send(outcome).is_err() {
            warn!("widget result arrived after the page stopped waiting");
        }
    }
}

/// Awaitable side of a widget run.
#[derive(Debug)]
pub struct WidgetCompletion {
    receiver: oneshot::Receiver<WidgetOutcome>,
}

impl WidgetCompletion {
    pub async fn wait(self) -> Result<WidgetOutcome, WidgetError> {
        self.receiver.await.map_err(|_| WidgetError::Abandoned)
    }

    /// Waits for the widget and opens the failure modal when it fails.
    pub async fn resolve(self, host: &ModalHost) -> Result<Option<Modal>, WidgetError> {
        match self.wait().await? {
            WidgetOutcome::Success { .. } => {
                info!("verification call placed");
                Ok(None)
            }
            WidgetOutcome::Failure(failure) => {
                warn!(
                    code = ?failure.code,
                    duplicate = failure.is_duplicate_submission(),
                    "verification call failed"
                );
                Ok(Some(host.open(&failure.notification())))
            }
        }
    }
}

pub fn completion_channel() -> (WidgetCallback, WidgetCompletion) {
    let (sender, receiver) = oneshot::channel();
    (WidgetCallback { sender }, WidgetCompletion { receiver })
}

/// One row of the rendered call dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRow {
    pub text: String,
    pub hidden: bool,
}

/// Rendered call dialog as the page sees it after the widget opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDialog {
    pub primary_enabled: bool,
    pub rows: Vec<WidgetRow>,
}

impl CallDialog {
    /// Re-enables the call button and hides the pronoun rows.
    pub fn apply_portal_fixups(&mut self) {
        self.primary_enabled = true;
        for row in &mut self.rows {
            if row.text.to_lowercase().contains("pronoun") {
                row.hidden = true;
            }
        }
    }
}
