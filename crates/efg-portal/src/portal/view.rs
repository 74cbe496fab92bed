use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::evaluation::{Criterion, EligibilityOutcome};
use super::record::{CurrentAddress, EligibilityRecord};
use super::selector::{relative_href, TermSelectorView};
use super::term::TermCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalMode {
    SelfService,
    Staff,
}

/// Dated notice shown in the blue box above the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoNotice {
    pub posted_on: NaiveDate,
    pub headline: String,
    pub body: String,
}

impl InfoNotice {
    pub fn current() -> Self {
        Self {
            posted_on: NaiveDate::from_ymd_opt(2024, 11, 1).expect("valid notice date"),
            headline: "AB 3158 | Winter / Spring 2025 Information".to_string(),
            body: "The free tuition waiver will not appear on your financial aid award letter until you enroll in course(s).".to_string(),
        }
    }

    pub fn title(&self) -> String {
        format!("({}): {}", self.posted_on.format("%m/%Y"), self.headline)
    }
}

/// Badge pair and requirement text for one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionBadge {
    pub criterion: Criterion,
    pub met: bool,
    pub requirement_visible: bool,
}

impl CriterionBadge {
    fn pending(criterion: Criterion) -> Self {
        Self {
            criterion,
            met: false,
            requirement_visible: true,
        }
    }
}

/// Staff-only gid entry form (`#enter-gid` / `#gid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GidEntry {
    pub visible: bool,
    pub value: String,
}

/// Region written by the eligibility fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPanelView {
    pub loading_indicator: bool,
    pub student_name: Option<String>,
    pub address: Option<CurrentAddress>,
    pub badges: Vec<CriterionBadge>,
    pub success_banner: bool,
    pub not_met_banner: bool,
    pub employee_ineligible_notice: bool,
    pub results_panel: bool,
    pub gid_entry: Option<GidEntry>,
    pub outcome: Option<EligibilityOutcome>,
}

impl EligibilityPanelView {
    pub fn loading(mode: PortalMode) -> Self {
        Self {
            loading_indicator: true,
            student_name: None,
            address: None,
            badges: Criterion::ordered()
                .into_iter()
                .map(CriterionBadge::pending)
                .collect(),
            success_banner: false,
            not_met_banner: false,
            employee_ineligible_notice: false,
            results_panel: false,
            gid_entry: match mode {
                PortalMode::Staff => Some(GidEntry {
                    visible: false,
                    value: String::new(),
                }),
                PortalMode::SelfService => None,
            },
            outcome: None,
        }
    }

    /// Staff view without a usable gid: no fetch, ask for an id instead.
    pub fn request_gid(&mut self) {
        self.loading_indicator = false;
        if let Some(entry) = self.gid_entry.as_mut() {
            entry.visible = true;
        }
    }

    pub fn prefill_gid(&mut self, gid: &str) {
        if let Some(entry) = self.gid_entry.as_mut() {
            entry.value = gid.to_string();
        }
    }

    /// Reflects a fetched record and its outcome onto the region.
    pub fn bind(
        &mut self,
        mode: PortalMode,
        record: &EligibilityRecord,
        outcome: EligibilityOutcome,
    ) {
        if mode == PortalMode::Staff {
            self.student_name = Some(format!(
                "{}.",
                record.stu_name.as_deref().unwrap_or_default()
            ));
            self.address = Some(record.current_address());
        }

        if outcome.employee_ineligible {
            self.employee_ineligible_notice = true;
        }

        for badge in &mut self.badges {
            if outcome.criterion_met(badge.criterion) {
                badge.met = true;
                badge.requirement_visible = false;
            }
        }

        if outcome.qualifies {
            self.success_banner = true;
            self.not_met_banner = false;
        } else {
            self.not_met_banner = true;
        }
        self.loading_indicator = false;
        self.results_panel = true;

        if !outcome.panel_shown {
            self.employee_ineligible_notice = true;
            self.results_panel = false;
            self.success_banner = false;
            self.not_met_banner = false;
        }

        self.outcome = Some(outcome);
    }

    pub fn toggle_results_panel(&mut self) {
        self.results_panel = !self.results_panel;
    }

    pub fn toggle_requirement(&mut self, criterion: Criterion) {
        if let Some(badge) = self
            .badges
            .iter_mut()
            .find(|badge| badge.criterion == criterion)
        {
            badge.requirement_visible = !badge.requirement_visible;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("heading level must be between 1 and 6, found {0}")]
pub struct HeadingLevelError(pub u8);

/// Accepts the heading sizes offered by the heading buttons.
pub fn validate_heading_level(level: u8) -> Result<u8, HeadingLevelError> {
    if (1..=6).contains(&level) {
        Ok(level)
    } else {
        Err(HeadingLevelError(level))
    }
}

/// Whole page: header fields plus the two independently loaded regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPageView {
    pub mode: PortalMode,
    pub term: TermCode,
    pub year_label: String,
    pub info_notice: InfoNotice,
    pub list_title: Option<String>,
    /// Staff lookup id, carried in every link back to the page.
    pub gid: Option<String>,
    pub badge_heading_level: Option<u8>,
    pub toggled_requirement: Option<Criterion>,
    pub employee_details_open: bool,
    pub panel: EligibilityPanelView,
    pub term_selector: Option<TermSelectorView>,
}

impl EligibilityPageView {
    pub fn placeholder(mode: PortalMode, term: TermCode, info_notice: InfoNotice) -> Self {
        Self {
            mode,
            year_label: term.academic_year_label(),
            term,
            info_notice,
            list_title: None,
            gid: None,
            badge_heading_level: None,
            toggled_requirement: None,
            employee_details_open: false,
            panel: EligibilityPanelView::loading(mode),
            term_selector: None,
        }
    }

    /// Self-service pages greet the signed-in user by portal username.
    pub fn set_username(&mut self, username: &str) {
        self.list_title = Some(username.to_string());
        if self.mode == PortalMode::SelfService {
            self.panel.student_name = Some(username.to_string());
        }
    }

    pub fn set_badge_heading_level(&mut self, level: u8) -> Result<(), HeadingLevelError> {
        self.badge_heading_level = Some(validate_heading_level(level)?);
        Ok(())
    }

    /// Replays the badge and `#emp-deets` clicks carried in the page link.
    /// The details toggle only applies once a record is bound.
    pub fn apply_toggles(&mut self, requirement: Option<Criterion>, employee_details: bool) {
        if let Some(criterion) = requirement {
            self.panel.toggle_requirement(criterion);
            self.toggled_requirement = Some(criterion);
        }
        if employee_details && self.panel.outcome.is_some() {
            self.panel.toggle_results_panel();
            self.employee_details_open = true;
        }
    }

    /// Link to this page with the given interactive state.
    pub fn page_href(
        &self,
        heading: Option<u8>,
        requirement: Option<Criterion>,
        employee_details: bool,
    ) -> String {
        let heading = heading.map(|level| level.to_string());
        let requirement = requirement.map(|criterion| criterion.number().to_string());

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(6);
        if let Some(gid) = self.gid.as_deref() {
            pairs.push(("gid", gid));
        }
        pairs.push(("term", self.term.as_str()));
        if let Some(username) = self.list_title.as_deref() {
            pairs.push(("username", username));
        }
        if let Some(level) = heading.as_deref() {
            pairs.push(("heading", level));
        }
        if let Some(number) = requirement.as_deref() {
            pairs.push(("toggle", number));
        }
        if employee_details {
            pairs.push(("details", "true"));
        }
        relative_href(&pairs)
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();

        writeln!(
            html,
            "<div id=\"blue-info-box\"><strong>{}</strong><br />{}</div>",
            escape_html(&self.info_notice.title()),
            escape_html(&self.info_notice.body)
        )
        .expect("info box");
        if let Some(title) = &self.list_title {
            writeln!(html, "<h2 class=\"list-title\">{}</h2>", escape_html(title))
                .expect("list title");
        }
        writeln!(
            html,
            "<p>Aid year <span class=\"fa-year\">{}</span></p>",
            escape_html(&self.year_label)
        )
        .expect("year label");

        self.render_heading_buttons(&mut html);
        self.render_term_selector(&mut html);
        self.render_panel(&mut html);

        html
    }

    fn render_heading_buttons(&self, html: &mut String) {
        html.push_str("<div class=\"heading-size\">");
        for level in 1..=6u8 {
            let current = if self.badge_heading_level == Some(level) {
                " aria-current=\"true\""
            } else {
                ""
            };
            let href =
                self.page_href(Some(level), self.toggled_requirement, self.employee_details_open);
            write!(
                html,
                "<a class=\"btn-heading\" href=\"{}\"{current}>H{level}</a>",
                escape_html(&href)
            )
            .expect("heading button");
        }
        html.push_str("</div>\n");
    }

    fn render_term_selector(&self, html: &mut String) {
        html.push_str("<div id=\"term-dropdown\">");
        if let Some(selector) = &self.term_selector {
            html.push_str("<form method=\"get\">");
            if let Some(gid) = &selector.gid {
                writeln!(
                    html,
                    "<input type=\"hidden\" name=\"gid\" value=\"{}\" />",
                    escape_html(gid)
                )
                .expect("gid field");
            }
            writeln!(
                html,
                "<label for='term'>{}</label><select id='term' name='term' class='form-select' onchange='this.form.submit()'>",
                escape_html(&selector.label)
            )
            .expect("select open");
            for option in &selector.options {
                let selected = if option.selected { " selected" } else { "" };
                writeln!(
                    html,
                    "<option value=\"{}\"{}>{}</option>",
                    escape_html(&option.value),
                    selected,
                    escape_html(&option.label)
                )
                .expect("term option");
            }
            html.push_str("</select></form>");
        }
        html.push_str("</div>\n");
    }

    fn render_panel(&self, html: &mut String) {
        let panel = &self.panel;

        writeln!(
            html,
            "<div id=\"wvm-loading-gif\"{}>Loading...</div>",
            hidden_attr(panel.loading_indicator)
        )
        .expect("loading indicator");

        if let Some(entry) = &panel.gid_entry {
            writeln!(
                html,
                "<form id=\"enter-gid\" method=\"get\"{}><label for=\"gid\">Student ID</label><input id=\"gid\" name=\"gid\" maxlength=\"9\" value=\"{}\" /><input type=\"hidden\" name=\"term\" value=\"{}\" /><button type=\"submit\">Look up</button></form>",
                hidden_attr(entry.visible),
                escape_html(&entry.value),
                escape_html(self.term.as_str())
            )
            .expect("gid entry");
        }

        if let Some(name) = &panel.student_name {
            writeln!(html, "<p>Hello <span id=\"wvm-stu-name\">{}</span></p>", escape_html(name))
                .expect("student name");
        }

        if let Some(address) = &panel.address {
            html.push_str("<div id=\"efg-addy-details\"><b>Current Active Address:</b><br />");
            for line in address.lines() {
                writeln!(html, "{}<br />", escape_html(&line)).expect("address line");
            }
            html.push_str("</div>\n");
        }

        let details_href = self.page_href(
            self.badge_heading_level,
            self.toggled_requirement,
            !self.employee_details_open,
        );
        writeln!(
            html,
            "<div id=\"emp-inelg\"{}>District employees are not eligible for the waiver. <a id=\"emp-deets\" href=\"{}\">Details</a></div>",
            hidden_attr(panel.employee_ineligible_notice),
            escape_html(&details_href)
        )
        .expect("employee notice");

        writeln!(html, "<div id=\"ft-results\"{}>", hidden_attr(panel.results_panel))
            .expect("results open");
        for badge in &panel.badges {
            self.render_badge(html, badge);
        }
        writeln!(
            html,
            "<div id=\"wvm-success\"{}>You meet all requirements for the free tuition waiver.</div>",
            hidden_attr(panel.success_banner)
        )
        .expect("success banner");
        writeln!(
            html,
            "<div id=\"wvm-no\"{}>You have not met all requirements yet.</div>",
            hidden_attr(panel.not_met_banner)
        )
        .expect("not met banner");
        html.push_str("</div>\n");
    }

    fn render_badge(&self, html: &mut String, badge: &CriterionBadge) {
        let number = badge.criterion.number();
        let label = escape_html(badge.criterion.label());
        let (yes, no) = match self.badge_heading_level {
            Some(level) => (
                format!("<h{level}>Met</h{level}>"),
                format!("<h{level}>Not met</h{level}>"),
            ),
            None => ("Met".to_string(), "Not met".to_string()),
        };
        // A second click on the same badge clears the toggle.
        let next = if self.toggled_requirement == Some(badge.criterion) {
            None
        } else {
            Some(badge.criterion)
        };
        let href = escape_html(&self.page_href(
            self.badge_heading_level,
            next,
            self.employee_details_open,
        ));

        writeln!(
            html,
            "<div class=\"requirement\"><span>{label}</span> <a class=\"badge-toggle\" href=\"{href}\"><span class=\"badge\" id=\"yes-{number}\"{}>{yes}</span><span class=\"badge\" id=\"no-{number}\"{}>{no}</span></a><div id=\"req-{number}\"{}>Requirement {number}: {label}</div></div>",
            hidden_attr(badge.met),
            hidden_attr(!badge.met),
            hidden_attr(badge.requirement_visible),
        )
        .expect("criterion badge");
    }
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
