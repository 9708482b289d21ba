//! Web API module for GSurvWeb
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - Session lifecycle and the interactions that drive it
//! - The example data template download

pub mod health;
pub mod response;
pub mod sessions;
pub mod template;

use axum::Router;
use gsurv_core::{Orchestrator, SessionRegistry};
use std::sync::Arc;

use crate::server::TemplateAsset;

pub use health::health_routes;
pub use sessions::sessions_routes;
pub use template::template_routes;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub registry: Arc<SessionRegistry>,
    pub template: Arc<TemplateAsset>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        registry: Arc<SessionRegistry>,
        template: TemplateAsset,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            template: Arc::new(template),
        }
    }
}

/// Create the API router with all `/api/v1` endpoints
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(sessions_routes())
        .merge(template_routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::server::config::TemplateConfig;
    use axum::body::Body;
    use axum::http::Request;
    use gsurv_core::{RunSettings, WorkflowSet};
    use gsurv_data::DatasetLoader;
    use tower::ServiceExt;

    pub fn state_with(settings: RunSettings) -> AppState {
        let orchestrator = Orchestrator::new(
            Arc::new(DatasetLoader::xlsx()),
            WorkflowSet::default(),
            settings,
        )
        .unwrap();
        let template = TemplateAsset::load(&TemplateConfig::default()).unwrap();
        AppState::new(
            Arc::new(orchestrator),
            Arc::new(SessionRegistry::new()),
            template,
        )
    }

    pub fn router(state: AppState) -> Router {
        crate::server::build_router(state, 1024 * 1024)
    }

    /// Send one request and decode the JSON body
    pub async fn send(app: &Router, request: Request<Body>) -> (u16, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
