use axum::{
    http::{header, HeaderValue},
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::{
    errors,
    handlers::{
        pages::home,
        snippets::{create_form, create_submit, view},
        static_files::serve_static,
    },
    middleware::{hydrate_session, log_request, recover_panic, request_span},
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Dynamic routes carry a session; static assets never touch the store.
    let dynamic = Router::new()
        .route("/", get(home))
        .route("/snippet/view/{id}", get(view))
        .route("/snippet/create", get(create_form).post(create_submit))
        .layer(from_fn_with_state(state.clone(), hydrate_session));

    let router = Router::new()
        .merge(dynamic)
        .route("/static/{*path}", get(serve_static))
        .fallback(fallback)
        .with_state(state);

    wrap(router)
}

async fn fallback() -> Response {
    errors::not_found()
}

/// The middleware chain applied to every route.
///
/// The list below is the authoritative order, outermost first:
///
/// 1. panic recovery - outermost so it also catches faults raised inside
///    the logging and session links
/// 2. request logging - span plus an event before any handler runs
/// 3. security headers - stamped on every response; handlers cannot
///    override them, and the buffered renderer means no body bytes exist
///    before these are set
pub(crate) fn wrap(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(recover_panic))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_request(log_request),
            )
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(
                    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com",
                ),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::REFERRER_POLICY,
                HeaderValue::from_static("origin-when-cross-origin"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("deny"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("0"),
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::State,
        http::{Request, StatusCode},
    };
    use chrono::{Datelike, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use snipbin_core::{session::SessionData, snippet::NewSnippet};

    use crate::session::Session;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn seed(state: &AppState, title: &str, content: &str) -> i64 {
        state
            .snippets
            .insert(&NewSnippet {
                title: title.to_string(),
                content: content.to_string(),
                expires_days: 7,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn home_page_renders_with_the_current_year() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let html = body_string(response).await;
        assert!(html.contains("Latest snippets"));
        assert!(html.contains("There's nothing to see here... yet!"));
        assert!(html.contains(&Utc::now().year().to_string()));
    }

    #[tokio::test]
    async fn home_page_lists_latest_snippets() {
        let state = AppState::default();
        seed(&state, "First snippet", "one").await;
        seed(&state, "Second snippet", "two").await;

        let app = create_app(state);
        let response = app.oneshot(get_request("/")).await.unwrap();
        let html = body_string(response).await;

        assert!(html.contains("First snippet"));
        assert!(html.contains("Second snippet"));
        assert!(html.contains("/snippet/view/2"));
    }

    #[tokio::test]
    async fn security_headers_are_set_on_every_response() {
        let app = create_app(AppState::default());

        for uri in ["/", "/no/such/route"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            let headers = response.headers();

            assert_eq!(
                headers[header::CONTENT_SECURITY_POLICY],
                "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com"
            );
            assert_eq!(headers[header::REFERRER_POLICY], "origin-when-cross-origin");
            assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
            assert_eq!(headers[header::X_FRAME_OPTIONS], "deny");
            assert_eq!(headers[header::X_XSS_PROTECTION], "0");
        }
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_canonical_not_found() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/no/such/route")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Not Found");
    }

    #[tokio::test]
    async fn posting_to_a_get_route_is_method_not_allowed() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn view_renders_an_existing_snippet() {
        let state = AppState::default();
        let id = seed(&state, "O snail", "Climb Mount Fuji").await;

        let app = create_app(state);
        let response = app
            .oneshot(get_request(&format!("/snippet/view/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("O snail"));
        assert!(html.contains("Climb Mount Fuji"));
    }

    #[tokio::test]
    async fn view_of_unknown_or_malformed_id_is_not_found() {
        let app = create_app(AppState::default());

        for uri in ["/snippet/view/99", "/snippet/view/abc", "/snippet/view/-1"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn create_form_renders() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/snippet/create")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains(r#"name="content""#));
        assert!(html.contains(r#"name="expires""#));
    }

    #[tokio::test]
    async fn invalid_submission_rerenders_with_field_errors() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/snippet/create")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from("title=&content=still+here&expires=2"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains("This field cannot be blank"));
        assert!(html.contains("This field must equal 1, 7 or 365"));
        // The user's input survives the round trip.
        assert!(html.contains("still here"));
    }

    #[tokio::test]
    async fn valid_submission_redirects_and_flashes_exactly_once() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/snippet/create")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(
                        "title=O+snail&content=Climb+Mount+Fuji&expires=7",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/snippet/view/1");

        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        // The flash shows on the next page...
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Snippet successfully created!"));

        // ...and is gone on the one after.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(!html.contains("Snippet successfully created!"));
    }

    #[tokio::test]
    async fn panicking_handler_yields_one_well_formed_error_response() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let app = wrap(Router::new().route("/boom", get(boom)));

        // Two consecutive faults each independently produce one generic
        // response; the connection is marked non-reusable.
        for _ in 0..2 {
            let response = app.clone().oneshot(get_request("/boom")).await.unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(response.headers()[header::CONNECTION], "close");
            assert_eq!(body_string(response).await, "Internal Server Error");
        }
    }

    #[tokio::test]
    async fn mid_render_failure_leaks_no_partial_body() {
        // The "view" page dereferences `snippet.*`; rendering it without a
        // snippet fails after the layout has produced output. The client
        // must see the generic error body and nothing of the page.
        async fn broken(State(state): State<AppState>) -> Response {
            let data = state.new_template_data(&Session::new(SessionData::new()));
            state.render("view", StatusCode::OK, &data)
        }

        let app = wrap(
            Router::new()
                .route("/broken", get(broken))
                .with_state(AppState::default()),
        );

        let response = app.oneshot(get_request("/broken")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn unregistered_page_is_an_internal_error_not_a_404() {
        async fn missing(State(state): State<AppState>) -> Response {
            let data = state.new_template_data(&Session::new(SessionData::new()));
            state.render("missing.page", StatusCode::OK, &data)
        }

        let app = wrap(
            Router::new()
                .route("/missing", get(missing))
                .with_state(AppState::default()),
        );

        let response = app.oneshot(get_request("/missing")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Internal Server Error");
    }
}
