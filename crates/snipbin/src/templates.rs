//! Per-request render data and the two-phase render helper.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Utc};
use serde::Serialize;

use snipbin_core::snippet::Snippet;

use crate::{errors::AppError, forms::SnippetForm, session::Session, state::AppState};

/// Everything a page may reference while rendering one request.
///
/// Owned by the handler that builds it and dropped when the response is
/// committed; never shared across requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    /// One-shot notice consumed from the session, if any.
    pub flash: Option<String>,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<SnippetForm>,
}

impl AppState {
    /// Base render data for one request: the current year plus the session's
    /// flash message, consumed on read.
    pub fn new_template_data(&self, session: &Session) -> TemplateData {
        TemplateData {
            current_year: Utc::now().year(),
            flash: session.pop_flash(),
            ..TemplateData::default()
        }
    }

    /// Renders a page through the cache and commits it with `status`.
    ///
    /// The page executes into a private buffer first; only a complete body
    /// is ever turned into a response. On a lookup miss or an execution
    /// fault the buffer is discarded and the client gets the one generic
    /// internal error response — never a truncated page.
    pub fn render(&self, page: &str, status: StatusCode, data: &TemplateData) -> Response {
        match self.templates.render(page, data) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(err) => AppError::from(err).into_response(),
        }
    }
}
