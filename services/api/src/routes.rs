use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use efg_portal::portal::{portal_router, BannerGateway, EligibilityPortal};
use efg_portal::widgets::call_verification::TRIGGER_SELECTOR;
use efg_portal::widgets::modal::render_dialog;
use efg_portal::widgets::name_recorder::BUNDLE_URL;
use efg_portal::widgets::{
    FailureNotification, NameRecorderConfig, RecorderTrigger, WidgetFailure, WidgetSettings,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Serialize)]
pub(crate) struct NameRecorderResponse {
    pub(crate) bundle_url: &'static str,
    pub(crate) config: NameRecorderConfig,
    pub(crate) trigger_html: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CallFailureResponse {
    pub(crate) trigger: &'static str,
    pub(crate) duplicate_submission: bool,
    pub(crate) notification: FailureNotification,
    pub(crate) dialog_html: String,
}

pub(crate) fn with_service_routes<G: BannerGateway>(
    portal: Arc<EligibilityPortal<G>>,
    widgets: Arc<WidgetSettings>,
) -> axum::Router {
    portal_router(portal)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/widgets/name-recorder",
            axum::routing::get(name_recorder_endpoint),
        )
        .route(
            "/api/v1/widgets/call-verification/failure",
            axum::routing::post(call_failure_endpoint),
        )
        .layer(Extension(widgets))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn name_recorder_endpoint(
    Extension(settings): Extension<Arc<WidgetSettings>>,
) -> Json<NameRecorderResponse> {
    Json(NameRecorderResponse {
        bundle_url: BUNDLE_URL,
        config: NameRecorderConfig::from_settings(&settings),
        trigger_html: RecorderTrigger::default().render_html(),
    })
}

pub(crate) async fn call_failure_endpoint(
    Json(failure): Json<WidgetFailure>,
) -> Json<CallFailureResponse> {
    let duplicate_submission = failure.is_duplicate_submission();
    if !duplicate_submission {
        warn!(code = ?failure.code, "call verification widget reported a failure");
    }
    let notification = failure.notification();
    let dialog_html = render_dialog(&notification);

    Json(CallFailureResponse {
        trigger: TRIGGER_SELECTOR,
        duplicate_submission,
        notification,
        dialog_html,
    })
}
