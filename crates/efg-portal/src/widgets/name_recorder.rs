use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::WidgetSettings;
use crate::portal::view::escape_html;

/// Vendor bundle loaded by the recorder page.
pub const BUNDLE_URL: &str = "https://nc-widget-v3.s3.us-east-2.amazonaws.com/bundle.js";

/// Object handed to the recorder bundle's `configure` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecorderConfig {
    pub event_code: String,
    pub access_token: String,
    pub brand_color: String,
    pub embedded: bool,
    pub dictionary: RecorderDictionary,
    pub custom_styles: RecorderStyles,
    pub kiosk_options: KioskOptions,
}

/// Labels and submission flags. The vendor expects snake_case keys here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderDictionary {
    pub web_recorder_button_label: String,
    pub pitch_max_value_label: String,
    pub pitch_min_value_label: String,
    pub pitch_set_default_link_label: String,
    pub pitch_slider_label: String,
    pub only_web_recorder: bool,
    pub web_recorder_auto_submit: bool,
    pub call_session_auto_submit: bool,
}

impl Default for RecorderDictionary {
    fn default() -> Self {
        Self {
            web_recorder_button_label: "Record My Name".to_string(),
            pitch_max_value_label: "High".to_string(),
            pitch_min_value_label: "Low".to_string(),
            pitch_set_default_link_label: "Default".to_string(),
            pitch_slider_label: "Adjust recording audio pitch".to_string(),
            only_web_recorder: false,
            web_recorder_auto_submit: true,
            call_session_auto_submit: true,
        }
    }
}

/// Colors are passed through as the vendor documents them, `showBox` included
/// as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderStyles {
    pub play_back_btn_color: String,
    pub record_btn_color: String,
    pub show_box: String,
    pub pitch_track_color: String,
    pub pitch_thumb_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskOptions {
    pub pitch_enabled: bool,
    pub web_recorder_only: bool,
    pub enable_auto_submit: bool,
}

impl NameRecorderConfig {
    pub fn from_settings(settings: &WidgetSettings) -> Self {
        Self {
            event_code: settings.recorder_event_code.clone(),
            access_token: settings.recorder_access_token.clone(),
            brand_color: settings.brand_color.clone(),
            embedded: false,
            dictionary: RecorderDictionary::default(),
            custom_styles: RecorderStyles {
                play_back_btn_color: "000000".to_string(),
                record_btn_color: settings.brand_color.clone(),
                show_box: "false".to_string(),
                pitch_track_color: settings.brand_color.clone(),
                pitch_thumb_color: "00000".to_string(),
            },
            kiosk_options: KioskOptions {
                pitch_enabled: true,
                web_recorder_only: true,
                enable_auto_submit: true,
            },
        }
    }

    /// Missing credentials leave the bundle unable to save recordings.
    pub fn is_complete(&self) -> bool {
        !self.event_code.is_empty() && !self.access_token.is_empty()
    }
}

/// "Record My Name" button the bundle binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderTrigger {
    pub label: String,
    pub middle_name: String,
}

impl Default for RecorderTrigger {
    fn default() -> Self {
        Self {
            label: "Record My Name".to_string(),
            middle_name: String::new(),
        }
    }
}

impl RecorderTrigger {
    /// Email and names are shown read-only; notes are hidden.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data-toggle", "nc-widget".to_string()),
            ("data-attributes-email-presentation", "readonly".to_string()),
            ("data-attributes-first-name-presentation", "readonly".to_string()),
            ("data-attributes-middle-name-value", self.middle_name.clone()),
            ("data-attributes-last-name-presentation", "readonly".to_string()),
            ("data-attributes-notes-presentation", "hidden".to_string()),
        ]
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from("<button class=\"btn-record\"");
        for (name, value) in self.attributes() {
            write!(html, " {}=\"{}\"", name, escape_html(&value)).expect("trigger attribute");
        }
        write!(html, ">{}</button>", escape_html(&self.label)).expect("trigger label");
        html
    }
}
