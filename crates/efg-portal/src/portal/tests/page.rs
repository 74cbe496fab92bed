use super::common::*;
use crate::portal::gateway::EligibilityQuery;
use crate::portal::evaluation::Criterion;
use crate::portal::page::{PageQuery, PageQueryError, PageRequest};
use crate::portal::term::{TermCode, TermCodeError};
use crate::portal::view::{HeadingLevelError, PortalMode};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn staff_page_with_short_gid_never_requests_eligibility() {
    let (portal, gateway) = portal(MemoryGateway::serving(qualifying_record()));

    let request = PageRequest::staff(TermCode::default_term(), Some("G0012".to_string()));
    let view = portal.load_page(&request).await;

    assert!(gateway.eligibility_requests().is_empty());
    assert!(view.panel.gid_entry.as_ref().is_some_and(|entry| entry.visible));
    assert!(!view.panel.loading_indicator);
    assert!(view.term_selector.is_some());
}

#[tokio::test]
async fn staff_page_without_gid_never_requests_eligibility() {
    let (portal, gateway) = portal(MemoryGateway::serving(qualifying_record()));

    let view = portal
        .load_page(&PageRequest::staff(TermCode::default_term(), None))
        .await;

    assert!(gateway.eligibility_requests().is_empty());
    assert!(view.panel.outcome.is_none());
}

#[tokio::test]
async fn staff_page_queries_by_gid_and_prefills_entry() {
    let (portal, gateway) = portal(MemoryGateway::serving(qualifying_record()));

    let request = PageRequest::staff(TermCode::default_term(), Some("G00123456".to_string()));
    let view = portal.load_page(&request).await;

    let queries = gateway.eligibility_requests();
    assert_eq!(queries.len(), 1);
    assert!(matches!(
        &queries[0],
        EligibilityQuery::ByGid { gid, .. } if gid.as_str() == "G00123456"
    ));
    let entry = view.panel.gid_entry.expect("staff entry");
    assert!(!entry.visible);
    assert_eq!(entry.value, "G00123456");
    assert!(view.panel.success_banner);
    assert_eq!(gateway.term_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn self_service_page_preselects_active_term() {
    let (portal, _) = portal(MemoryGateway::serving(qualifying_record()));

    let request = PageRequest::self_service(TermCode::parse("202510").expect("valid"));
    let view = portal.load_page(&request).await;

    let selector = view.term_selector.expect("selector loaded");
    assert_eq!(selector.selected().map(|option| option.value.as_str()), Some("202510"));
    assert!(selector.gid.is_none());
}

#[tokio::test]
async fn failed_term_fetch_leaves_selector_absent_but_binds_eligibility() {
    let gateway = MemoryGateway {
        terms: None,
        record: Some(qualifying_record()),
        ..MemoryGateway::default()
    };
    let (portal, _) = portal(gateway);

    let view = portal
        .load_page(&PageRequest::self_service(TermCode::default_term()))
        .await;

    assert!(view.term_selector.is_none());
    assert!(view.panel.success_banner);
}

#[tokio::test]
async fn failed_eligibility_fetch_stays_loading() {
    let gateway = MemoryGateway {
        terms: Some(terms()),
        record: None,
        ..MemoryGateway::default()
    };
    let (portal, _) = portal(gateway);

    let view = portal
        .load_page(&PageRequest::self_service(TermCode::default_term()))
        .await;

    assert!(view.panel.loading_indicator);
    assert!(!view.panel.results_panel);
    assert!(view.term_selector.is_some());
}

#[test]
fn query_defaults_empty_term_and_drops_gid_for_self_service() {
    let default = TermCode::default_term();
    let query = PageQuery {
        term: Some(String::new()),
        gid: Some("G00123456".to_string()),
        username: Some("arivera".to_string()),
        ..PageQuery::default()
    };

    let request = PageRequest::from_query(PortalMode::SelfService, query, &default)
        .expect("request builds");
    assert_eq!(request.term, default);
    assert!(request.gid.is_none());
    assert_eq!(request.username.as_deref(), Some("arivera"));
}

#[test]
fn query_rejects_malformed_term() {
    let query = PageQuery {
        term: Some("fall".to_string()),
        ..PageQuery::default()
    };
    let error = PageRequest::from_query(PortalMode::Staff, query, &TermCode::default_term())
        .expect_err("bad term rejected");
    assert_eq!(error, PageQueryError::Term(TermCodeError::Length(4)));
}

#[test]
fn query_carries_heading_and_toggles() {
    let query = PageQuery {
        heading: Some(2),
        toggle: Some(3),
        details: Some(true),
        ..PageQuery::default()
    };
    let request = PageRequest::from_query(PortalMode::Staff, query, &TermCode::default_term())
        .expect("request builds");

    assert_eq!(request.heading_level, Some(2));
    assert_eq!(request.toggled_requirement, Some(Criterion::ResidencyDecoded));
    assert!(request.employee_details);

    let unknown = PageQuery {
        toggle: Some(9),
        ..PageQuery::default()
    };
    let request = PageRequest::from_query(PortalMode::Staff, unknown, &TermCode::default_term())
        .expect("request builds");
    assert!(request.toggled_requirement.is_none());
}

#[test]
fn query_rejects_heading_outside_html_levels() {
    let query = PageQuery {
        heading: Some(7),
        ..PageQuery::default()
    };
    let error = PageRequest::from_query(PortalMode::SelfService, query, &TermCode::default_term())
        .expect_err("bad heading rejected");
    assert_eq!(error, PageQueryError::Heading(HeadingLevelError(7)));
}

#[tokio::test]
async fn employee_details_link_reopens_results() {
    let (portal, _) = portal(MemoryGateway::serving(record_with(
        true, true, true, true, true, false,
    )));

    let mut request =
        PageRequest::staff(TermCode::default_term(), Some("G00123456".to_string()));
    let closed = portal.load_page(&request).await;
    assert!(!closed.panel.results_panel);
    assert!(!closed.employee_details_open);

    request.employee_details = true;
    request.heading_level = Some(4);
    let open = portal.load_page(&request).await;
    assert!(open.panel.results_panel);
    assert!(open.employee_details_open);
    assert!(!open.panel.success_banner);

    let html = open.render_html();
    assert!(html.contains("<h4>Met</h4>"));
    assert!(html.contains(
        "<a id=\"emp-deets\" href=\"?gid=G00123456&amp;term=202450&amp;heading=4\">"
    ));
}

#[tokio::test]
async fn badge_toggle_shows_met_requirement_text() {
    let (portal, _) = portal(MemoryGateway::serving(qualifying_record()));

    let mut request = PageRequest::self_service(TermCode::default_term());
    request.toggled_requirement = Some(Criterion::CreditLevel);
    let view = portal.load_page(&request).await;

    let credit = view.panel.badges[1];
    assert!(credit.met);
    assert!(credit.requirement_visible);
    assert!(!view.panel.badges[0].requirement_visible);
    assert_eq!(view.toggled_requirement, Some(Criterion::CreditLevel));
}

