//! Static file serving handler for CSS/JavaScript assets.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use std::fs;
use std::path::Component;

use crate::state::AppState;

/// Serve static files from the configured asset root.
///
/// Static routes sit outside the session-hydration link: an asset request
/// never touches the session store.
pub async fn serve_static(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    // Reject anything that could escape the asset root.
    let relative = std::path::Path::new(&filename);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return not_found();
    }

    let file_path = state.config.static_root.join(relative);

    match fs::read(&file_path) {
        Ok(contents) => {
            // Determine content type based on extension
            let content_type = if filename.ends_with(".css") {
                "text/css; charset=utf-8"
            } else if filename.ends_with(".js") {
                "application/javascript; charset=utf-8"
            } else if filename.ends_with(".svg") {
                "image/svg+xml"
            } else if filename.ends_with(".png") {
                "image/png"
            } else if filename.ends_with(".ico") {
                "image/x-icon"
            } else {
                "application/octet-stream"
            };

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(contents))
                .unwrap()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("Not Found"))
        .unwrap()
}
