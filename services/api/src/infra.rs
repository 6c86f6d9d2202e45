use metrics_exporter_prometheus::PrometheusHandle;
use paperflow::config::NormalizationConfig;
use paperflow::correspondents::CorrespondentService;
use paperflow::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_service(config: &NormalizationConfig) -> Result<CorrespondentService, AppError> {
    let service = CorrespondentService::from_config(config)?;
    let rules = service.normalizer().rules();

    info!(
        rules_path = ?config.rules_path,
        aliases = rules.aliases.len(),
        legal_suffixes = rules.legal_suffixes.tokens().len(),
        default_category = %config.default_category,
        min_confidence = config.min_confidence,
        "correspondent rules loaded"
    );

    Ok(service)
}
