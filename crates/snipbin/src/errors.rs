use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application error type that wraps `anyhow::Error`.
///
/// This allows using `?` on functions that return `Result<_, anyhow::Error>`
/// to automatically convert them into `Result<_, AppError>`. The client only
/// ever sees the generic 500 text; the error itself and a diagnostic trace go
/// to the log, where the request span supplies method and URI.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace = std::backtrace::Backtrace::force_capture();
        tracing::error!(error = %self.0, trace = %trace, "request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            status_text(StatusCode::INTERNAL_SERVER_ERROR),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Respond with a caller-caused status and its canonical description.
///
/// No trace is logged: the caller, not the server, is at fault.
pub fn client_error(status: StatusCode) -> Response {
    (status, status_text(status)).into_response()
}

/// Convenience wrapper around [`client_error`] for 404s.
pub fn not_found() -> Response {
    client_error(StatusCode::NOT_FOUND)
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("").to_string()
}
