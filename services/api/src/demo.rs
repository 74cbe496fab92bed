use crate::infra::{banner_portal, parse_gid, parse_term, SampleGateway};
use clap::Args;
use efg_portal::config::AppConfig;
use efg_portal::error::AppError;
use efg_portal::portal::{
    academic_year_label, BannerGateway, BannerHttpClient, EligibilityEvaluator,
    EligibilityOutcome, EligibilityPageView, EligibilityPortal, EligibilityQuery, PageRequest,
    StudentGid, TermCode, TERM_LIST_LIMIT,
};
use efg_portal::widgets::{completion_channel, DismissTrigger, ModalHost};
use serde_json::json;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Term to render (defaults to the portal default term).
    #[arg(long, value_parser = parse_term)]
    pub(crate) term: Option<TermCode>,
    /// Student id for the staff review view. Defaults to the non-credit sample.
    #[arg(long)]
    pub(crate) gid: Option<String>,
    /// Print the rendered page markup for both views.
    #[arg(long)]
    pub(crate) html: bool,
    /// Print the staff view state as JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Term code (YYYYSS). Defaults to the configured default term.
    #[arg(long, value_parser = parse_term)]
    pub(crate) term: Option<TermCode>,
    /// Student id to look up. Without it the self-service domain is queried.
    #[arg(long, value_parser = parse_gid)]
    pub(crate) gid: Option<StudentGid>,
}

#[derive(Args, Debug)]
pub(crate) struct YearLabelArgs {
    /// Term code (YYYYSS)
    #[arg(value_parser = parse_term)]
    pub(crate) term: TermCode,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let portal = banner_portal(&config)?;

    let term = args
        .term
        .unwrap_or_else(|| portal.default_term().clone());
    let query = match args.gid {
        Some(gid) => EligibilityQuery::ByGid { term, gid },
        None => EligibilityQuery::SelfService { term },
    };

    let (record, outcome) = portal.evaluate(&query).await?;
    println!(
        "Eligibility for {} ({})",
        record.stu_name.as_deref().unwrap_or("unknown student"),
        academic_year_label(query.term())
    );
    render_outcome(&outcome);
    Ok(())
}

pub(crate) async fn run_terms() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let client = BannerHttpClient::new(config.banner.base_url.clone())?;

    let terms = client.list_terms(TERM_LIST_LIMIT).await?;
    if terms.is_empty() {
        println!("No terms returned by {}", config.banner.base_url);
        return Ok(());
    }
    for term in terms {
        let marker = if term.code == config.portal.default_term.as_str() {
            "*"
        } else {
            " "
        };
        println!("{marker} {} {}", term.code, term.description);
    }
    Ok(())
}

pub(crate) fn run_year_label(args: YearLabelArgs) -> Result<(), AppError> {
    println!("{}", args.term.academic_year_label());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        term,
        gid,
        html,
        json,
    } = args;

    let gateway = Arc::new(SampleGateway::default());
    let gid = gid.unwrap_or_else(|| "G00000003".to_string());
    let portal = EligibilityPortal::new(gateway.clone(), EligibilityEvaluator::default());
    let term = term.unwrap_or_else(|| portal.default_term().clone());

    let mut own = PageRequest::self_service(term.clone());
    own.username = Some("arivera".to_string());
    let own_page = portal.load_page(&own).await;
    let staff_page = portal
        .load_page(&PageRequest::staff(term, Some(gid.clone())))
        .await;

    if json {
        match serde_json::to_string_pretty(&staff_page) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Staff view unavailable: {err}"),
        }
        return Ok(());
    }

    println!("EFG portal demo (sample Banner data)");
    println!(
        "Sample student ids: {}",
        gateway.sample_gids().collect::<Vec<_>>().join(", ")
    );

    println!("\nSelf-service view");
    render_page(&own_page, html);

    println!("\nStaff review view for {gid}");
    render_page(&staff_page, html);

    println!("\nCall verification widget");
    let host = ModalHost::new();
    let (callback, completion) = completion_channel();
    callback.fail(
        Some(json!({ "message": "The email already used" })),
        Some(405),
    );
    match completion.resolve(&host).await {
        Ok(Some(modal)) => {
            for overlay in host.overlays() {
                println!("  - {:?} overlay #{}", overlay.kind, overlay.id);
            }
            modal.dismiss(DismissTrigger::FooterClose);
            println!("  Dismissed; overlays remaining: {}", host.overlays().len());
        }
        Ok(None) => println!("  Call placed"),
        Err(err) => println!("  Widget unavailable: {err}"),
    }

    Ok(())
}

fn render_page(page: &EligibilityPageView, html: bool) {
    println!("{}", page.info_notice.title());
    println!("Academic year: {}", page.year_label);
    if let Some(selector) = &page.term_selector {
        let selected = selector
            .selected()
            .map(|option| option.label.as_str())
            .unwrap_or("none");
        println!(
            "{} {} options, selected {}",
            selector.label,
            selector.options.len(),
            selected
        );
    }
    if let Some(name) = &page.panel.student_name {
        println!("Student: {name}");
    }
    if let Some(address) = &page.panel.address {
        for line in address.lines() {
            println!("  {line}");
        }
    }
    match &page.panel.outcome {
        Some(outcome) => render_outcome(outcome),
        None if page.panel.gid_entry.as_ref().is_some_and(|entry| entry.visible) => {
            println!("No usable student id; showing id entry")
        }
        None => println!("Eligibility still loading"),
    }
    if html {
        println!("{}", page.render_html());
    }
}

fn render_outcome(outcome: &EligibilityOutcome) {
    println!("{}", outcome.summary());
    for result in &outcome.criteria {
        let mark = if result.met { "met" } else { "not met" };
        println!(
            "  {}. {} ({mark})",
            result.criterion.number(),
            result.criterion.label()
        );
    }
    println!("Score components:");
    for component in &outcome.components {
        println!(
            "  - {:?}: {:+} ({})",
            component.factor, component.score, component.notes
        );
    }
}
