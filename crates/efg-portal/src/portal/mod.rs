//! Eligibility evaluation, term handling, and page view state for the
//! self-service and staff review pages.

pub mod evaluation;
pub mod gateway;
pub mod page;
pub mod record;
pub mod router;
pub mod selector;
pub mod term;
pub mod view;

#[cfg(test)]
mod tests;

pub use evaluation::{
    Criterion, CriterionResult, EligibilityEvaluator, EligibilityOutcome, EligibilityRules,
    ScoreComponent, ScoreFactor,
};
pub use gateway::{
    BannerGateway, BannerHttpClient, EligibilityQuery, GatewayError, TERM_LIST_LIMIT,
};
pub use page::{EligibilityPortal, PageQuery, PageQueryError, PageRequest};
pub use record::{CurrentAddress, EligibilityRecord, Indicator};
pub use router::portal_router;
pub use selector::{TermOption, TermSelector, TermSelectorView};
pub use term::{
    academic_year_label, GidError, StudentGid, Term, TermCode, TermCodeError, DEFAULT_TERM,
};
pub use view::{
    validate_heading_level, CriterionBadge, EligibilityPageView, EligibilityPanelView, GidEntry,
    HeadingLevelError, InfoNotice, PortalMode,
};
