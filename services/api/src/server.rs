use crate::cli::ServeArgs;
use crate::infra::{banner_portal, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use efg_portal::config::AppConfig;
use efg_portal::error::AppError;
use efg_portal::telemetry;
use efg_portal::widgets::NameRecorderConfig;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if !NameRecorderConfig::from_settings(&config.widgets).is_complete() {
        warn!("name recorder event code or access token missing; recordings will not save");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portal = Arc::new(banner_portal(&config)?);
    let app = with_service_routes(portal, Arc::new(config.widgets.clone()))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        banner = %config.banner.base_url,
        default_term = %config.portal.default_term,
        "efg portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
