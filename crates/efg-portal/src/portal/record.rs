use serde::{Deserialize, Serialize};

/// Banner `Y`/`N` flag. Anything other than an exact `"Y"` reads as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Indicator {
    #[serde(rename = "Y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

impl Indicator {
    pub fn is_set(self) -> bool {
        self == Self::Yes
    }
}

impl From<Option<String>> for Indicator {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("Y") => Self::Yes,
            _ => Self::No,
        }
    }
}

impl From<bool> for Indicator {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// One row of the `free_tuition_single` / `free_tuition_gid` virtual domains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct EligibilityRecord {
    pub stu_name: Option<String>,
    pub address_type: Option<String>,
    pub street1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub employee_ind: Indicator,
    pub fafsa_ind: Indicator,
    pub level_code: Option<String>,
    pub decode_resd_code: Indicator,
    pub service_zip_ind: Indicator,
    pub exempt_lvl: Option<String>,
}

impl EligibilityRecord {
    pub fn current_address(&self) -> CurrentAddress {
        CurrentAddress {
            address_type: self.address_type.clone().unwrap_or_default(),
            street: self.street1.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            zip: self.zip.clone().unwrap_or_default(),
        }
    }
}

/// Address block shown on the staff review page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAddress {
    pub address_type: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl CurrentAddress {
    /// Lines in display order: type, street, `city, state zip`.
    pub fn lines(&self) -> [String; 3] {
        [
            self.address_type.clone(),
            self.street.clone(),
            format!("{}, {} {}", self.city, self.state, self.zip),
        ]
    }
}
