//! The building blocks of the request middleware chain.
//!
//! The chain itself — the authoritative ordering — is assembled in
//! [`crate::app::wrap`]; this module holds the individual links.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, Response as HttpResponse, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use tracing::Span;

use snipbin_core::session::{SessionData, SessionId};

use crate::{
    session::{Session, SESSION_COOKIE},
    state::AppState,
};

/// Span carrying the request identity. Error events logged anywhere further
/// down the chain inherit these fields, so an internal-error report always
/// names the method and URI that triggered it.
pub fn request_span(request: &Request) -> Span {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        client = %client,
    )
}

/// Logs every request before any downstream handler runs.
pub fn log_request(_request: &Request, _span: &Span) {
    tracing::info!("received request");
}

/// Converts a downstream panic into one well-formed generic error response.
///
/// Handler-local state may be inconsistent after an unwind, so the client is
/// told not to reuse the connection.
pub fn recover_panic(err: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    };

    tracing::error!(panic = %detail, "handler panicked");

    HttpResponse::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONNECTION, "close")
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from("Internal Server Error"))
        .expect("panic response must build")
}

/// Session hydration for dynamic routes.
///
/// Loads the state behind the client's session cookie before the handler
/// runs, exposes it as a [`Session`] in the request extensions, and persists
/// it after the handler completes iff something mutated it. Static asset
/// routes are never wrapped by this link.
pub async fn hydrate_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let (id, issued) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (SessionId::new(cookie.value().to_string()), false),
        None => (SessionId::generate(), true),
    };

    let data = match state.sessions.load(&id).await {
        Ok(Some(data)) => data,
        Ok(None) => SessionData::new(),
        Err(err) => {
            // A broken store must not take the request down with it; the
            // user just loses this session's state.
            tracing::error!(error = %err, "failed to load session, starting empty");
            SessionData::new()
        }
    };

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if session.is_dirty() {
        if let Err(err) = state.sessions.save(&id, &session.snapshot()).await {
            tracing::error!(error = %err, "failed to save session");
        } else if issued {
            let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
    }

    response
}
