use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::evaluation::{Criterion, EligibilityEvaluator, EligibilityOutcome};
use super::gateway::{BannerGateway, EligibilityQuery, GatewayError};
use super::record::EligibilityRecord;
use super::selector::TermSelector;
use super::term::{StudentGid, TermCode, TermCodeError};
use super::view::{
    validate_heading_level, EligibilityPageView, EligibilityPanelView, HeadingLevelError,
    InfoNotice, PortalMode,
};

/// Query string accepted by both portal pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Heading size picked with the heading buttons (1..=6).
    #[serde(default)]
    pub heading: Option<u8>,
    /// Requirement number whose badge was clicked.
    #[serde(default)]
    pub toggle: Option<u8>,
    /// Set by the `#emp-deets` link.
    #[serde(default)]
    pub details: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageQueryError {
    #[error(transparent)]
    Term(#[from] TermCodeError),
    #[error(transparent)]
    Heading(#[from] HeadingLevelError),
}

impl PageQuery {
    /// Empty or missing `term` falls back to the configured default.
    pub fn term_code(&self, default: &TermCode) -> Result<TermCode, TermCodeError> {
        match self.term.as_deref() {
            None | Some("") => Ok(default.clone()),
            Some(raw) => TermCode::parse(raw),
        }
    }
}

/// One page load for either mini-app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub mode: PortalMode,
    pub term: TermCode,
    pub gid: Option<String>,
    pub username: Option<String>,
    pub heading_level: Option<u8>,
    pub toggled_requirement: Option<Criterion>,
    pub employee_details: bool,
}

impl PageRequest {
    pub fn self_service(term: TermCode) -> Self {
        Self {
            mode: PortalMode::SelfService,
            term,
            gid: None,
            username: None,
            heading_level: None,
            toggled_requirement: None,
            employee_details: false,
        }
    }

    pub fn staff(term: TermCode, gid: Option<String>) -> Self {
        Self {
            mode: PortalMode::Staff,
            term,
            gid,
            username: None,
            heading_level: None,
            toggled_requirement: None,
            employee_details: false,
        }
    }

    pub fn from_query(
        mode: PortalMode,
        query: PageQuery,
        default_term: &TermCode,
    ) -> Result<Self, PageQueryError> {
        let term = query.term_code(default_term)?;
        let heading_level = query.heading.map(validate_heading_level).transpose()?;
        let gid = match mode {
            PortalMode::Staff => query.gid,
            PortalMode::SelfService => None,
        };
        Ok(Self {
            mode,
            term,
            gid,
            username: query.username.filter(|name| !name.is_empty()),
            heading_level,
            // Unknown requirement numbers are ignored like a click on nothing.
            toggled_requirement: query.toggle.and_then(Criterion::from_number),
            employee_details: query.details.unwrap_or(false),
        })
    }
}

/// Loads term and eligibility data and binds them into page view state.
pub struct EligibilityPortal<G> {
    gateway: Arc<G>,
    evaluator: EligibilityEvaluator,
    notice: InfoNotice,
    default_term: TermCode,
}

impl<G: BannerGateway> EligibilityPortal<G> {
    pub fn new(gateway: Arc<G>, evaluator: EligibilityEvaluator) -> Self {
        Self {
            gateway,
            evaluator,
            notice: InfoNotice::current(),
            default_term: TermCode::default_term(),
        }
    }

    pub fn with_notice(mut self, notice: InfoNotice) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_default_term(mut self, term: TermCode) -> Self {
        self.default_term = term;
        self
    }

    pub fn default_term(&self) -> &TermCode {
        &self.default_term
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetches and evaluates one record.
    pub async fn evaluate(
        &self,
        query: &EligibilityQuery,
    ) -> Result<(EligibilityRecord, EligibilityOutcome), GatewayError> {
        let record = self.gateway.fetch_eligibility(query).await?;
        let outcome = self.evaluator.evaluate(&record);
        info!(
            term = %query.term(),
            score = outcome.score,
            qualifies = outcome.qualifies,
            employee_ineligible = outcome.employee_ineligible,
            "eligibility evaluated"
        );
        Ok((record, outcome))
    }

    /// Builds the full page. The term list and the eligibility record are
    /// requested concurrently and each writes only its own region.
    pub async fn load_page(&self, request: &PageRequest) -> EligibilityPageView {
        let mut view = EligibilityPageView::placeholder(
            request.mode,
            request.term.clone(),
            self.notice.clone(),
        );
        if let Some(username) = request.username.as_deref() {
            view.set_username(username);
        }
        if request.mode == PortalMode::Staff {
            view.gid = request.gid.clone();
        }
        view.badge_heading_level = request.heading_level;

        let selector = TermSelector::new(request.term.clone(), request.gid.clone());
        let (term_selector, panel) = tokio::join!(
            selector.load(self.gateway.as_ref()),
            self.load_panel(request, view.panel.clone())
        );

        view.term_selector = term_selector;
        view.panel = panel;
        view.apply_toggles(request.toggled_requirement, request.employee_details);
        view
    }

    async fn load_panel(
        &self,
        request: &PageRequest,
        mut panel: EligibilityPanelView,
    ) -> EligibilityPanelView {
        let query = match request.mode {
            PortalMode::SelfService => EligibilityQuery::SelfService {
                term: request.term.clone(),
            },
            PortalMode::Staff => {
                match StudentGid::parse(request.gid.as_deref().unwrap_or_default()) {
                    Ok(gid) => {
                        panel.prefill_gid(gid.as_str());
                        EligibilityQuery::ByGid {
                            term: request.term.clone(),
                            gid,
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "no usable student id, showing id entry");
                        panel.request_gid();
                        return panel;
                    }
                }
            }
        };

        match self.evaluate(&query).await {
            Ok((record, outcome)) => panel.bind(request.mode, &record, outcome),
            Err(err) => warn!(error = %err, term = %request.term, "eligibility request failed"),
        }
        panel
    }
}
