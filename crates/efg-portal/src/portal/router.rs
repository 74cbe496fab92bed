use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::gateway::{BannerGateway, TERM_LIST_LIMIT};
use super::page::{EligibilityPortal, PageQuery, PageRequest};
use super::term::{Term, TermCode};
use super::view::{EligibilityPageView, PortalMode};
use crate::error::AppError;

/// Router exposing both portal pages and their JSON counterparts.
pub fn portal_router<G: BannerGateway>(portal: Arc<EligibilityPortal<G>>) -> Router {
    Router::new()
        .route("/efg", get(self_service_page::<G>))
        .route("/efg/review", get(staff_page::<G>))
        .route("/api/v1/efg/terms", get(terms_handler::<G>))
        .route("/api/v1/efg/eligibility", get(staff_view_handler::<G>))
        .route("/api/v1/efg/eligibility/self", get(self_service_view_handler::<G>))
        .route("/api/v1/efg/year-label/:term", get(year_label_handler))
        .with_state(portal)
}

#[derive(Debug, Serialize)]
pub struct YearLabelResponse {
    pub term: TermCode,
    pub label: String,
}

async fn build_view<G: BannerGateway>(
    portal: &EligibilityPortal<G>,
    mode: PortalMode,
    query: PageQuery,
) -> Result<EligibilityPageView, AppError> {
    let request = PageRequest::from_query(mode, query, portal.default_term())?;
    Ok(portal.load_page(&request).await)
}

pub(crate) async fn self_service_page<G: BannerGateway>(
    State(portal): State<Arc<EligibilityPortal<G>>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let view = build_view(&portal, PortalMode::SelfService, query).await?;
    Ok(Html(view.render_html()))
}

pub(crate) async fn staff_page<G: BannerGateway>(
    State(portal): State<Arc<EligibilityPortal<G>>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let view = build_view(&portal, PortalMode::Staff, query).await?;
    Ok(Html(view.render_html()))
}

pub(crate) async fn self_service_view_handler<G: BannerGateway>(
    State(portal): State<Arc<EligibilityPortal<G>>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EligibilityPageView>, AppError> {
    build_view(&portal, PortalMode::SelfService, query)
        .await
        .map(Json)
}

pub(crate) async fn staff_view_handler<G: BannerGateway>(
    State(portal): State<Arc<EligibilityPortal<G>>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EligibilityPageView>, AppError> {
    build_view(&portal, PortalMode::Staff, query).await.map(Json)
}

pub(crate) async fn terms_handler<G: BannerGateway>(
    State(portal): State<Arc<EligibilityPortal<G>>>,
) -> Result<Json<Vec<Term>>, AppError> {
    let terms = portal.gateway().list_terms(TERM_LIST_LIMIT).await?;
    Ok(Json(terms))
}

pub(crate) async fn year_label_handler(
    Path(term): Path<String>,
) -> Result<Json<YearLabelResponse>, AppError> {
    let term = TermCode::parse(&term)?;
    let label = term.academic_year_label();
    Ok(Json(YearLabelResponse { term, label }))
}
