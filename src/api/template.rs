//! Example data template download
//!
//! GET /api/v1/template - The example workbook as an attachment

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use super::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

async fn download_template(State(state): State<AppState>) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", state.template.file_name);
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        state.template.bytes.clone(),
    )
}

/// Create template routes
pub fn template_routes() -> Router<AppState> {
    Router::new().route("/api/v1/template", get(download_template))
}
