use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDonationRepository};
use crate::routes::with_donation_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use food_share::config::AppConfig;
use food_share::error::AppError;
use food_share::telemetry;
use food_share::workflows::donations::DonationService;
use food_share::workflows::quality::ConfiguredClassifier;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let classifier = ConfiguredClassifier::from_config(&config.classifier)?;
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        classifier: Arc::new(classifier),
    };

    let repository = Arc::new(InMemoryDonationRepository::default());
    let donation_service = Arc::new(DonationService::new(repository));

    let app = with_donation_routes(donation_service)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        classifier = ?config.classifier.mode,
        "food share service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
