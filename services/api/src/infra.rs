use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_board::config::AppConfig;
use talent_board::leaderboard::{BoardCache, CandidateDirectory, GoogleSheetsClient, SheetsGateway};
use tracing::{error, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the candidate directory from configuration. Missing credentials or
/// a client that fails to initialize both downgrade to the empty-board mode
/// instead of refusing to start.
pub(crate) async fn build_directory(config: &AppConfig) -> Arc<CandidateDirectory> {
    let gateway: Option<Box<dyn SheetsGateway>> = match &config.sheets {
        Some(sheets) => match GoogleSheetsClient::connect(sheets).await {
            Ok(client) => Some(Box::new(client)),
            Err(err) => {
                error!(%err, "sheets client initialization failed; starting degraded");
                None
            }
        },
        None => {
            warn!("GOOGLE_SERVICE_ACCOUNT_EMAIL/GOOGLE_PRIVATE_KEY/GOOGLE_SHEET_ID not all set; starting degraded");
            None
        }
    };

    Arc::new(CandidateDirectory::new(
        gateway,
        BoardCache::new(config.board.revalidate()),
    ))
}
