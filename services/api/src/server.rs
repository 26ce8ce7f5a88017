use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, load_rules, seed_demo_subjects, AppState, InMemoryCheckinSource,
    InMemoryWellbeingStore,
};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use qvt_ai::config::AppConfig;
use qvt_ai::error::AppError;
use qvt_ai::telemetry;
use qvt_ai::workflows::routing::{
    EmbeddingProvider, HttpEmbeddingClient, ProfileRouter, QueryRouter,
};
use qvt_ai::workflows::wellbeing::WellbeingService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let checkin_source = Arc::new(InMemoryCheckinSource::default());
    if args.seed_demo {
        let subjects = seed_demo_subjects(&checkin_source);
        info!(count = subjects.len(), "seeded demo subjects");
    }
    let store = Arc::new(InMemoryWellbeingStore::default());
    let wellbeing_service = Arc::new(WellbeingService::new(checkin_source.clone(), store));

    let catalog = load_catalog(&config.routing)?;
    let rules = load_rules(&config.routing)?;
    for finding in rules.lint(&catalog) {
        warn!(%finding, "routing configuration inconsistency");
    }
    let engine = ProfileRouter::new(catalog, rules)?;
    let providers: Vec<Arc<dyn EmbeddingProvider>> = vec![
        Arc::new(HttpEmbeddingClient::openai()),
        Arc::new(HttpEmbeddingClient::mistral()),
    ];
    let query_router = Arc::new(QueryRouter::new(engine, checkin_source, providers));

    let app = with_service_routes(wellbeing_service, query_router)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "wellbeing decision engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
