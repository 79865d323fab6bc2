use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};

use snipbin_core::snippet::NewSnippet;

use crate::{
    errors::{self, AppError},
    forms::SnippetForm,
    session::Session,
    state::AppState,
};

/// Handler for viewing a single snippet (GET /snippet/view/{id}).
///
/// A malformed or unknown id is a plain 404, indistinguishable from an
/// expired snippet.
pub async fn view(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = id.parse::<i64>().ok().filter(|id| *id > 0) else {
        return Ok(errors::not_found());
    };
    let Some(snippet) = state.snippets.get(id).await? else {
        return Ok(errors::not_found());
    };

    let mut data = state.new_template_data(&session);
    data.snippet = Some(snippet);

    Ok(state.render("view", StatusCode::OK, &data))
}

/// Handler for the snippet creation form (GET /snippet/create).
pub async fn create_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let mut data = state.new_template_data(&session);
    data.form = Some(SnippetForm::default());

    Ok(state.render("create", StatusCode::OK, &data))
}

/// Handler for the snippet creation submission (POST /snippet/create).
///
/// Invalid input re-renders the form with the recorded field errors and the
/// user's values; valid input inserts the snippet, flashes a confirmation,
/// and redirects to the new snippet's page.
pub async fn create_submit(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(mut form): Form<SnippetForm>,
) -> Result<Response, AppError> {
    if !form.validate() {
        let mut data = state.new_template_data(&session);
        data.form = Some(form);
        return Ok(state.render("create", StatusCode::UNPROCESSABLE_ENTITY, &data));
    }

    let id = state
        .snippets
        .insert(&NewSnippet {
            title: form.title.clone(),
            content: form.content.clone(),
            expires_days: form.expires,
        })
        .await?;

    session.set_flash("Snippet successfully created!");

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
