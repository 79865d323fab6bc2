use axum::{extract::State, http::StatusCode, response::Response, Extension};

use crate::{errors::AppError, session::Session, state::AppState};

/// Handler for the home page (GET /): the ten most recent snippets.
pub async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let snippets = state.snippets.latest(10).await?;

    let mut data = state.new_template_data(&session);
    data.snippets = snippets;

    Ok(state.render("home", StatusCode::OK, &data))
}
