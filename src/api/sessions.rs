//! Sessions API endpoints
//!
//! POST   /api/v1/sessions              - Create a session and render its first page
//! GET    /api/v1/sessions/:id          - Re-run with no new event
//! DELETE /api/v1/sessions/:id          - End a session
//! POST   /api/v1/sessions/:id/upload   - Upload a workbook (multipart field `file`)
//! DELETE /api/v1/sessions/:id/upload   - Clear the upload widget
//! PUT    /api/v1/sessions/:id/mode     - Select a mode
//! POST   /api/v1/sessions/:id/progress - Mark a phase complete

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use gsurv_core::{AppMode, Interaction, Invocation, InvocationOutcome, Phase, Surface};
use gsurv_data::UploadedFile;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::response::{ApiError, ApiResponse};
use super::AppState;

/// Extension accepted by the upload widget
const ACCEPTED_EXTENSION: &str = "xlsx";

/// One rendered page of a session
#[derive(Debug, Serialize)]
pub struct SessionPage {
    pub session_id: Uuid,
    pub outcome: InvocationOutcome,
    pub page: Surface,
}

impl SessionPage {
    fn new(session_id: Uuid, invocation: Invocation) -> Self {
        Self {
            session_id,
            outcome: invocation.outcome,
            page: invocation.surface,
        }
    }
}

/// Request to select a mode
#[derive(Debug, Deserialize)]
pub struct SelectModeRequest {
    /// Mode label, e.g. "Experiment" or "Data Summary"
    pub mode: String,
}

/// Request to mark a phase complete
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub phase: Phase,
}

type PageResult = Result<Json<ApiResponse<SessionPage>>, ApiError>;

/// Run one invocation while holding the session lock
async fn invoke(state: &AppState, id: Uuid, interaction: Interaction) -> PageResult {
    let session = state
        .registry
        .get(id)
        .await
        .ok_or(gsurv_core::Error::SessionNotFound(id))?;

    let mut guard = session.lock_owned().await;
    let orchestrator = state.orchestrator.clone();
    let invocation =
        tokio::task::spawn_blocking(move || orchestrator.invoke(&mut *guard, interaction))
            .await
            .map_err(|e| ApiError::internal(format!("Invocation task failed: {}", e)))??;

    Ok(Json(ApiResponse::success(SessionPage::new(id, invocation))))
}

/// Create a session and render its first page.
async fn create_session(State(state): State<AppState>) -> PageResult {
    let (id, _) = state.registry.create_session().await;
    info!(session_id = %id, "Session started");
    invoke(&state, id, Interaction::Rerun).await
}

/// Re-run a session.
async fn rerun(State(state): State<AppState>, Path(id): Path<Uuid>) -> PageResult {
    invoke(&state, id, Interaction::Rerun).await
}

/// End a session.
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if state.registry.remove(id).await {
        info!(session_id = %id, "Session ended");
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(gsurv_core::Error::SessionNotFound(id).into())
    }
}

/// Put a workbook into the upload widget.
async fn upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> PageResult {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text(), "invalid_multipart"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.xlsx").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text(), "invalid_multipart"))?;
        file = Some((name, bytes));
        break;
    }

    let (name, bytes) =
        file.ok_or_else(|| ApiError::bad_request("Missing multipart field 'file'", "missing_file"))?;

    let accepted = std::path::Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION));
    if !accepted {
        return Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Only .{} files are accepted: {}", ACCEPTED_EXTENSION, name),
            "unsupported_file_type",
        ));
    }

    debug!(session_id = %id, file = %name, bytes = bytes.len(), "Upload received");
    let upload = tokio::task::spawn_blocking(move || UploadedFile::new(name, bytes.to_vec()))
        .await
        .map_err(|e| ApiError::internal(format!("Upload hashing failed: {}", e)))?;

    invoke(&state, id, Interaction::Upload(upload)).await
}

/// Clear the upload widget.
async fn clear_upload(State(state): State<AppState>, Path(id): Path<Uuid>) -> PageResult {
    invoke(&state, id, Interaction::ClearUpload).await
}

/// Select a mode.
async fn select_mode(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectModeRequest>,
) -> PageResult {
    let mode = request.mode.parse::<AppMode>()?;
    invoke(&state, id, Interaction::SelectMode(mode)).await
}

/// Mark a phase complete under the current mode.
async fn record_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProgressRequest>,
) -> PageResult {
    invoke(&state, id, Interaction::CompletePhase(request.phase)).await
}

/// Create sessions routes
pub fn sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(rerun).delete(delete_session))
        .route(
            "/api/v1/sessions/:id/upload",
            post(upload).delete(clear_upload),
        )
        .route("/api/v1/sessions/:id/mode", put(select_mode))
        .route("/api/v1/sessions/:id/progress", post(record_progress))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{router, send, state_with};
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Router;
    use gsurv_core::{AppMode, Phase, RunSettings};
    use serde_json::{json, Value};
    use std::io::Write;
    use std::time::Duration;
    use uuid::Uuid;

    const BOUNDARY: &str = "gsurv-test-boundary";

    fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(id: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        Request::post(format!("/api/v1/sessions/{id}/upload"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(file_name, content)))
            .unwrap()
    }

    fn json_request(method: &str, uri: String, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn start(app: &Router) -> String {
        let (status, json) = send(
            app,
            Request::post("/api/v1/sessions").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        json["data"]["session_id"].as_str().unwrap().to_string()
    }

    fn template() -> &'static [u8] {
        crate::server::template::EMBEDDED_TEMPLATE
    }

    #[tokio::test]
    async fn test_new_session_awaits_data() {
        let app = router(state_with(RunSettings::default()));
        let (status, json) = send(
            &app,
            Request::post("/api/v1/sessions").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert_eq!(data["outcome"]["kind"], "awaiting_data");
        assert_eq!(data["page"]["template"]["url"], "/api/v1/template");
        assert!(data["page"].get("mode_selector").is_none());
        assert_eq!(data["page"]["session"]["app_mode"], Value::Null);
    }

    #[tokio::test]
    async fn test_upload_then_switch_mode() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;

        let (status, json) = send(&app, upload_request(&id, "cohort.xlsx", template())).await;
        assert_eq!(status, 200);
        let data = &json["data"];
        assert_eq!(
            data["outcome"],
            json!({"kind": "dispatched", "mode": "Interactive", "reset": false})
        );
        assert_eq!(
            data["page"]["mode_selector"]["options"],
            json!(["Interactive", "Experiment", "Data Summary"])
        );
        assert_eq!(data["page"]["session"]["app_mode"], "Interactive");

        let (status, json) = send(
            &app,
            json_request(
                "POST",
                format!("/api/v1/sessions/{id}/progress"),
                json!({"phase": "train"}),
            ),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["data"]["page"]["session"]["train_state"], true);

        let (status, json) = send(
            &app,
            json_request(
                "PUT",
                format!("/api/v1/sessions/{id}/mode"),
                json!({"mode": "Experiment"}),
            ),
        )
        .await;
        assert_eq!(status, 200);
        let data = &json["data"];
        assert_eq!(
            data["outcome"],
            json!({"kind": "dispatched", "mode": "Experiment", "reset": true})
        );
        assert_eq!(data["page"]["session"]["train_state"], false);
        assert_eq!(data["page"]["session"]["prev_app_mode"], "Experiment");

        // Re-run keeps the selection
        let (status, json) = send(
            &app,
            Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["data"]["page"]["session"]["app_mode"], "Experiment");
    }

    #[tokio::test]
    async fn test_data_summary_is_unavailable() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;
        send(&app, upload_request(&id, "cohort.xlsx", template())).await;

        let (status, json) = send(
            &app,
            json_request(
                "PUT",
                format!("/api/v1/sessions/{id}/mode"),
                json!({"mode": "Data Summary"}),
            ),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["data"]["outcome"]["kind"], "unavailable");
    }

    #[tokio::test]
    async fn test_corrupt_upload_reports_error() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;

        let (status, json) = send(&app, upload_request(&id, "broken.xlsx", b"not a workbook")).await;
        assert_eq!(status, 200);
        let data = &json["data"];
        assert_eq!(data["outcome"]["kind"], "load_failed");
        assert!(data["page"].get("mode_selector").is_none());
        let message = data["page"]["notices"][0]["message"].as_str().unwrap();
        assert!(message.starts_with("Error loading broken.xlsx"));
    }

    #[tokio::test]
    async fn test_clear_upload_returns_to_template() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;
        send(&app, upload_request(&id, "cohort.xlsx", template())).await;

        let (status, json) = send(
            &app,
            Request::delete(format!("/api/v1/sessions/{id}/upload"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["data"]["outcome"]["kind"], "awaiting_data");
        // State survives while the widget is empty
        assert_eq!(json["data"]["page"]["session"]["app_mode"], "Interactive");
    }

    #[tokio::test]
    async fn test_rejects_non_xlsx_upload() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;

        let (status, json) = send(&app, upload_request(&id, "cohort.csv", b"a,b\n1,2\n")).await;
        assert_eq!(status, 415);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "unsupported_file_type");
    }

    #[tokio::test]
    async fn test_develop_requires_dev_mode() {
        let app = router(state_with(RunSettings::default()));
        let id = start(&app).await;
        send(&app, upload_request(&id, "cohort.xlsx", template())).await;

        let (status, json) = send(
            &app,
            json_request(
                "PUT",
                format!("/api/v1/sessions/{id}/mode"),
                json!({"mode": "Develop"}),
            ),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(json["code"], "mode_not_offered");

        let (status, json) = send(
            &app,
            json_request(
                "PUT",
                format!("/api/v1/sessions/{id}/mode"),
                json!({"mode": "Survival"}),
            ),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(json["code"], "unknown_mode");
    }

    #[tokio::test]
    async fn test_dev_mode_local_path() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(template()).unwrap();
        let app = router(state_with(RunSettings {
            dev_mode: true,
            local_data_path: Some(file.path().to_path_buf()),
            verbose: false,
        }));

        let (status, json) = send(
            &app,
            Request::post("/api/v1/sessions").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        let data = &json["data"];
        assert_eq!(data["outcome"]["kind"], "dispatched");
        assert_eq!(
            data["page"]["mode_selector"]["options"],
            json!(["Interactive", "Experiment", "Data Summary", "Develop"])
        );
    }

    #[tokio::test]
    async fn test_concurrent_interactions_are_serialized() {
        let state = state_with(RunSettings::default());
        let app = router(state.clone());
        let id = start(&app).await;
        send(&app, upload_request(&id, "cohort.xlsx", template())).await;

        let progress = |phase: &str| {
            json_request(
                "POST",
                format!("/api/v1/sessions/{id}/progress"),
                json!({ "phase": phase }),
            )
        };
        let rerun = || {
            Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap()
        };
        let reselect = json_request(
            "PUT",
            format!("/api/v1/sessions/{id}/mode"),
            json!({"mode": "Interactive"}),
        );

        let results = tokio::join!(
            send(&app, progress("continue")),
            send(&app, progress("train")),
            send(&app, progress("save")),
            send(&app, rerun()),
            send(&app, rerun()),
            send(&app, reselect),
        );
        for status in [
            results.0 .0,
            results.1 .0,
            results.2 .0,
            results.3 .0,
            results.4 .0,
            results.5 .0,
        ] {
            assert_eq!(status, 200);
        }

        let session = state
            .registry
            .get(id.parse::<Uuid>().unwrap())
            .await
            .unwrap();
        let ctx = session.lock().await;
        // create + upload + six concurrent interactions
        assert_eq!(ctx.invocations(), 8);
        assert_eq!(ctx.state().app_mode(), Some(AppMode::Interactive));
        for phase in Phase::ALL {
            assert!(ctx.state().is_complete(phase));
        }
    }

    #[tokio::test]
    async fn test_invocation_waits_for_session_lock() {
        let state = state_with(RunSettings::default());
        let app = router(state.clone());
        let id = start(&app).await;
        let session = state
            .registry
            .get(id.parse::<Uuid>().unwrap())
            .await
            .unwrap();

        let guard = session.lock().await;
        let pending = {
            let app = app.clone();
            let request = Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap();
            tokio::spawn(async move { send(&app, request).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());
        assert_eq!(guard.invocations(), 1);
        drop(guard);

        let (status, _) = pending.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(session.lock().await.invocations(), 2);
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions() {
        let app = router(state_with(RunSettings::default()));
        let (status, json) = send(
            &app,
            Request::get(format!("/api/v1/sessions/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(json["code"], "session_not_found");

        let id = start(&app).await;
        let delete = || {
            Request::delete(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap()
        };
        assert_eq!(send(&app, delete()).await.0, 200);
        assert_eq!(send(&app, delete()).await.0, 404);
    }
}
