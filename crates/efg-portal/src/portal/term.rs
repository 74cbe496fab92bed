use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Term shown when the page is opened without a `term` query parameter.
pub const DEFAULT_TERM: &str = "202450";

/// Sub-period codes at or below this value belong to the previous aid year.
const AID_YEAR_BOUNDARY: &str = "50";

/// Six digit academic term code (`YYYYSS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermCodeError {
    #[error("term code must be 6 characters, found {0}")]
    Length(usize),
    #[error("term code must contain only digits: {0:?}")]
    NonNumeric(String),
}

impl TermCode {
    pub const LENGTH: usize = 6;

    pub fn parse(raw: &str) -> Result<Self, TermCodeError> {
        let length = raw.chars().count();
        if length != Self::LENGTH {
            return Err(TermCodeError::Length(length));
        }
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(TermCodeError::NonNumeric(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn default_term() -> Self {
        Self(DEFAULT_TERM.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar year encoded in the first four digits.
    pub fn year(&self) -> i32 {
        digits_value(&self.0[0..4])
    }

    /// Two digit sub-period suffix (`10`, `30`, `50`, `70`, ...).
    pub fn sub_period(&self) -> &str {
        &self.0[4..6]
    }

    /// Academic-year label displayed next to the eligibility heading.
    ///
    /// The sub-period is compared as a string against `"50"`, matching how the
    /// portal has always derived the label. Codes at or below the boundary
    /// belong to the aid year that started the previous calendar year.
    pub fn academic_year_label(&self) -> String {
        let year = self.year();
        let short_year = &self.0[2..4];

        if self.sub_period() <= AID_YEAR_BOUNDARY {
            format!("{}-{}", year - 1, short_year)
        } else {
            let next = (digits_value(short_year) + 1) % 100;
            format!("{year}-{next:02}")
        }
    }
}

impl Default for TermCode {
    fn default() -> Self {
        Self::default_term()
    }
}

impl FromStr for TermCode {
    type Err = TermCodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for TermCode {
    type Error = TermCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TermCode> for String {
    fn from(value: TermCode) -> Self {
        value.0
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-function form used by the CLI and the label endpoint.
pub fn academic_year_label(term: &TermCode) -> String {
    term.academic_year_label()
}

fn digits_value(digits: &str) -> i32 {
    digits
        .bytes()
        .fold(0, |acc, byte| acc * 10 + i32::from(byte - b'0'))
}

/// Term listed by the `efg_terms` virtual domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(rename = "EFG_TERM")]
    pub code: String,
    #[serde(rename = "STVTERM_DESC", default)]
    pub description: String,
}

/// Nine character institutional student identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentGid(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GidError {
    #[error("student id is missing")]
    Missing,
    #[error("student id must be {expected} characters, found {found}")]
    Length { expected: usize, found: usize },
}

impl StudentGid {
    pub const LENGTH: usize = 9;

    pub fn parse(raw: &str) -> Result<Self, GidError> {
        if raw.is_empty() {
            return Err(GidError::Missing);
        }
        let found = raw.chars().count();
        if found != Self::LENGTH {
            return Err(GidError::Length {
                expected: Self::LENGTH,
                found,
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StudentGid> for String {
    fn from(value: StudentGid) -> Self {
        value.0
    }
}

impl fmt::Display for StudentGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(raw: &str) -> String {
        TermCode::parse(raw).expect("valid term").academic_year_label()
    }

    #[test]
    fn boundary_sub_period_belongs_to_previous_aid_year() {
        assert_eq!(label("202450"), "2023-24");
        assert_eq!(label("202510"), "2024-25");
        assert_eq!(label("202409"), "2023-24");
    }

    #[test]
    fn later_sub_periods_start_the_next_aid_year() {
        assert_eq!(label("202460"), "2024-25");
        assert_eq!(label("202490"), "2024-25");
        assert_eq!(label("202451"), "2024-25");
    }

    #[test]
    fn century_rollover_wraps_short_year() {
        assert_eq!(label("209970"), "2099-00");
        assert_eq!(label("200870"), "2008-09");
    }

    #[test]
    fn rejects_malformed_term_codes() {
        assert_eq!(TermCode::parse("20245"), Err(TermCodeError::Length(5)));
        assert_eq!(
            TermCode::parse("2024FA"),
            Err(TermCodeError::NonNumeric("2024FA".to_string()))
        );
        assert!("202470".parse::<TermCode>().is_ok());
    }

    #[test]
    fn default_term_matches_portal_default() {
        assert_eq!(TermCode::default().as_str(), DEFAULT_TERM);
        assert_eq!(TermCode::default().academic_year_label(), "2023-24");
    }

    #[test]
    fn gid_requires_exactly_nine_characters() {
        assert!(StudentGid::parse("G00123456").is_ok());
        assert_eq!(StudentGid::parse(""), Err(GidError::Missing));
        assert_eq!(
            StudentGid::parse("G0012345"),
            Err(GidError::Length {
                expected: 9,
                found: 8
            })
        );
        assert!(StudentGid::parse("G001234567").is_err());
    }

    #[test]
    fn term_deserializes_banner_field_names() {
        let term: Term = serde_json::from_str(
            r#"{"EFG_TERM":"202450","STVTERM_DESC":"Fall 2024"}"#,
        )
        .expect("term parses");
        assert_eq!(term.code, "202450");
        assert_eq!(term.description, "Fall 2024");
    }
}
