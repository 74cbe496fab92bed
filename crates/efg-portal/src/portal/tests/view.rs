use super::common::*;
use crate::portal::evaluation::{Criterion, EligibilityEvaluator, EligibilityRules};
use crate::portal::term::TermCode;
use crate::portal::view::{EligibilityPageView, EligibilityPanelView, InfoNotice, PortalMode};

fn bound_panel(
    mode: PortalMode,
    record: &crate::portal::EligibilityRecord,
) -> EligibilityPanelView {
    let outcome = EligibilityEvaluator::default().evaluate(record);
    let mut panel = EligibilityPanelView::loading(mode);
    panel.bind(mode, record, outcome);
    panel
}

#[test]
fn qualifying_student_sees_success_banner() {
    let panel = bound_panel(PortalMode::SelfService, &qualifying_record());

    assert!(!panel.loading_indicator);
    assert!(panel.results_panel);
    assert!(panel.success_banner);
    assert!(!panel.not_met_banner);
    assert!(!panel.employee_ineligible_notice);
    assert!(panel.badges.iter().all(|badge| badge.met && !badge.requirement_visible));
    assert!(panel.address.is_none());
}

#[test]
fn unmet_requirement_keeps_its_requirement_text() {
    let record = record_with(false, false, true, true, true, false);
    let panel = bound_panel(PortalMode::SelfService, &record);

    assert!(panel.not_met_banner);
    assert!(!panel.success_banner);
    let fafsa = panel
        .badges
        .iter()
        .find(|badge| badge.criterion == Criterion::FafsaFiled)
        .expect("fafsa badge");
    assert!(!fafsa.met);
    assert!(fafsa.requirement_visible);
}

#[test]
fn employee_hides_results_and_not_met_banner() {
    let record = record_with(true, true, true, true, true, true);
    let panel = bound_panel(PortalMode::Staff, &record);

    assert!(panel.employee_ineligible_notice);
    assert!(!panel.results_panel);
    assert!(!panel.not_met_banner);
    assert!(!panel.success_banner);
    assert!(!panel.loading_indicator);
}

#[test]
fn employee_binding_never_shows_success_banner() {
    let record = record_with(true, true, true, true, true, false);
    let mut outcome = EligibilityEvaluator::new(EligibilityRules {
        qualifying_score: 3,
        ..EligibilityRules::default()
    })
    .evaluate(&record);
    // An outcome built elsewhere may still claim to qualify.
    outcome.qualifies = true;

    let mut panel = EligibilityPanelView::loading(PortalMode::Staff);
    panel.bind(PortalMode::Staff, &record, outcome);

    assert!(panel.employee_ineligible_notice);
    assert!(!panel.success_banner);
    assert!(!panel.not_met_banner);
    assert!(!panel.results_panel);
}

#[test]
fn staff_binding_fills_name_and_address() {
    let panel = bound_panel(PortalMode::Staff, &qualifying_record());

    assert_eq!(panel.student_name.as_deref(), Some("Rivera, Ana."));
    let address = panel.address.expect("address bound");
    assert_eq!(address.city, "Saratoga");
}

#[test]
fn badge_click_toggles_requirement_text() {
    let mut panel = EligibilityPanelView::loading(PortalMode::SelfService);
    panel.toggle_requirement(Criterion::ResidencyDecoded);
    panel.toggle_results_panel();

    let residency = panel.badges[2];
    assert_eq!(residency.criterion, Criterion::ResidencyDecoded);
    assert!(!residency.requirement_visible);
    assert!(panel.results_panel);
}

#[test]
fn missing_gid_shows_entry_form_and_hides_loading() {
    let mut panel = EligibilityPanelView::loading(PortalMode::Staff);
    panel.request_gid();

    assert!(!panel.loading_indicator);
    assert!(panel.gid_entry.as_ref().is_some_and(|entry| entry.visible));
}

#[test]
fn heading_level_is_limited_to_html_headings() {
    let mut view = EligibilityPageView::placeholder(
        PortalMode::SelfService,
        TermCode::default_term(),
        InfoNotice::current(),
    );

    assert!(view.set_badge_heading_level(0).is_err());
    assert!(view.set_badge_heading_level(7).is_err());
    view.set_badge_heading_level(3).expect("h3 accepted");
    assert!(view.render_html().contains("<h3>Not met</h3>"));
}

#[test]
fn render_escapes_record_data_and_marks_hidden_regions() {
    let mut record = qualifying_record();
    record.stu_name = Some("<script>alert(1)</script>".to_string());
    let mut view = EligibilityPageView::placeholder(
        PortalMode::Staff,
        TermCode::default_term(),
        InfoNotice::current(),
    );
    view.panel = bound_panel(PortalMode::Staff, &record);

    let html = view.render_html();
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;."));
    assert!(!html.contains("<script>"));
    assert!(html.contains("<div id=\"wvm-loading-gif\" hidden>"));
    assert!(html.contains("<div id=\"wvm-success\">"));
    assert!(html.contains("<span class=\"fa-year\">2023-24</span>"));
    assert!(html.contains("(11/2024): AB 3158"));
}

#[test]
fn placeholder_shows_loading_until_bound() {
    let view = EligibilityPageView::placeholder(
        PortalMode::SelfService,
        TermCode::parse("202510").expect("valid"),
        InfoNotice::current(),
    );

    assert!(view.panel.loading_indicator);
    assert!(view.term_selector.is_none());
    assert_eq!(view.year_label, "2024-25");
    assert!(view.render_html().contains("<div id=\"term-dropdown\"></div>"));
}
