use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::gateway::{BannerGateway, TERM_LIST_LIMIT};
use super::term::{Term, TermCode};

const NAVIGATION_BASE: &str = "http://portal.invalid/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Dropdown region (`#term-dropdown`). Absent until the term list loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSelectorView {
    pub label: String,
    pub options: Vec<TermOption>,
    /// Carried as a hidden field so a term change keeps the student in view.
    pub gid: Option<String>,
}

impl TermSelectorView {
    pub fn selected(&self) -> Option<&TermOption> {
        self.options.iter().find(|option| option.selected)
    }
}

/// URL-encoded `?k=v&...` link back to the current page.
pub(crate) fn relative_href(pairs: &[(&str, &str)]) -> String {
    let url =
        Url::parse_with_params(NAVIGATION_BASE, pairs).expect("static navigation base parses");
    format!("?{}", url.query().unwrap_or_default())
}

/// Term dropdown for one page load.
#[derive(Debug, Clone)]
pub struct TermSelector {
    current: TermCode,
    gid: Option<String>,
}

impl TermSelector {
    pub fn new(current: TermCode, gid: Option<String>) -> Self {
        Self { current, gid }
    }

    pub fn current(&self) -> &TermCode {
        &self.current
    }

    pub fn options(&self, terms: &[Term]) -> Vec<TermOption> {
        terms
            .iter()
            .map(|term| TermOption {
                value: term.code.clone(),
                label: term.description.clone(),
                selected: term.code == self.current.as_str(),
            })
            .collect()
    }

    pub fn view(&self, terms: &[Term]) -> TermSelectorView {
        TermSelectorView {
            label: "Select or change term".to_string(),
            options: self.options(terms),
            gid: self.gid.clone(),
        }
    }

    /// Relative target the page navigates to when another term is picked.
    pub fn navigation_href(&self, new_term: &str) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(gid) = self.gid.as_deref() {
            pairs.push(("gid", gid));
        }
        pairs.push(("term", new_term));
        relative_href(&pairs)
    }

    /// Fetches the term list. Failures are logged and leave the selector absent.
    pub async fn load<G: BannerGateway>(&self, gateway: &G) -> Option<TermSelectorView> {
        match gateway.list_terms(TERM_LIST_LIMIT).await {
            Ok(terms) => Some(self.view(&terms)),
            Err(err) => {
                warn!(error = %err, term = %self.current, "term list request failed");
                None
            }
        }
    }
}
