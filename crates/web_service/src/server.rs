use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use quiz_core::{
    EngineConfig, ExamRegistry, KeyValueStore, MemoryStore, ResultsSink, SessionEngine,
};
use results_client::HttpResultsSink;
use twilio_client::{TwilioApi, TwilioClient, TwilioConfig};

use crate::config::ServiceConfig;
use crate::controllers::{
    exam_controller, outbound_controller, sms_controller, voice_controller,
};

pub struct AppState {
    pub registry: Arc<ExamRegistry>,
    pub engine: Arc<SessionEngine>,
    pub twilio: Arc<dyn TwilioApi>,
    pub config: ServiceConfig,
}

const DEFAULT_WORKER_COUNT: usize = 10;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(exam_controller::config)
        .configure(sms_controller::config)
        .configure(voice_controller::config)
        .configure(outbound_controller::config);
}

/// Wire the engine, registry, and telephony client from configuration.
pub fn build_app_state(config: ServiceConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let registry = Arc::new(ExamRegistry::new(store.clone(), config.exam_ttl));

    let sink: Arc<dyn ResultsSink> = Arc::new(HttpResultsSink::new(
        config.results_api_base.clone(),
        config.http_timeout,
    )?);
    let engine = Arc::new(SessionEngine::new(
        store,
        registry.clone(),
        sink,
        EngineConfig {
            session_ttl: config.session_ttl,
        },
    ));

    let twilio: Arc<dyn TwilioApi> = Arc::new(TwilioClient::new(
        TwilioConfig::new(
            config.account_sid.clone(),
            config.auth_token.clone(),
            config.from_number.clone(),
        )
        .with_api_base(config.twilio_api_base.clone())
        .with_timeout(config.http_timeout),
    )?);

    Ok(AppState {
        registry,
        engine,
        twilio,
        config,
    })
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    info!("Starting quiz web service...");

    let port = config.port;
    let app_state = web::Data::new(build_app_state(config)?);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(("0.0.0.0", port))?
    .run();

    info!("Quiz web service listening on port {port}");

    server.await?;
    Ok(())
}
