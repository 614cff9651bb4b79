//! Axum router configuration.
//!
//! Public pages: events index/show, speaker directory, email verification,
//! login. Everything else checks for a session token in its handler.
//! `/static` is served from the configured directory.

use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::method_override;
use crate::state::AppState;

/// Photo limit plus room for the other form fields.
const SPEAKER_FORM_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// The routed application, without method override.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let admin_routes = Router::new()
        .route(
            "/admin/speakers",
            get(handlers::admin_speaker::index).post(handlers::admin_speaker::store),
        )
        .route("/admin/speakers/create", get(handlers::admin_speaker::create))
        .route("/admin/speakers/export", get(handlers::admin_speaker::export))
        .route(
            "/admin/speakers/{id}",
            get(handlers::admin_speaker::show)
                .put(handlers::admin_speaker::update)
                .delete(handlers::admin_speaker::destroy),
        )
        .route("/admin/speakers/{id}/edit", get(handlers::admin_speaker::edit))
        .layer(DefaultBodyLimit::max(SPEAKER_FORM_BODY_LIMIT));

    Router::new()
        .route("/", get(|| async { Redirect::to("/events") }))
        // Events
        .route(
            "/events",
            get(handlers::event::index).post(handlers::event::store),
        )
        .route("/events/create", get(handlers::event::create))
        .route(
            "/events/{id}",
            get(handlers::event::show)
                .put(handlers::event::update)
                .delete(handlers::event::destroy),
        )
        .route("/events/{id}/edit", get(handlers::event::edit))
        .route(
            "/events/{id}/register",
            get(handlers::event::registration_form).post(handlers::event::register),
        )
        .route(
            "/events/{id}/register/success",
            get(handlers::event::registration_success),
        )
        .route(
            "/registrations/{id}",
            axum::routing::delete(handlers::event::cancel_registration),
        )
        // Speakers
        .route("/speakers", get(handlers::speaker::index))
        .route("/speakers/{id}", get(handlers::speaker::show))
        .merge(admin_routes)
        // Auth
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route("/logout", post(handlers::auth::logout))
        .route("/email/verify/{token}", get(handlers::auth::verify_email))
        .route("/health", get(handlers::health::health_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The full service: method override runs before routing.
pub fn build_app(state: AppState) -> method_override::MethodOverride<Router> {
    method_override::layer().layer(build_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::extract::Path;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use axum::Json;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use estrado_types::config::FrontendConfig;

    async fn stub_upstream() -> String {
        let app = Router::new()
            .route(
                "/api/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        Json(json!({"token": "tok-9", "user": {"id": 9, "name": "Ana"}}))
                    } else {
                        Json(json!({"message": "invalid"}))
                    }
                }),
            )
            .route(
                "/api/events",
                get(|| async { Json(json!([{"id": 1, "titulo": "RustConf"}])) }),
            )
            .route(
                "/api/events/{id}",
                axum::routing::delete(|Path(_id): Path<String>| async {
                    Json(json!({"success": true}))
                }),
            )
            .route("/api/ponentes", get(|| async { Json(json!([])) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    async fn app() -> (AppState, method_override::MethodOverride<Router>) {
        let config = FrontendConfig {
            api_base_url: stub_upstream().await,
            request_timeout_secs: 5,
            ..Default::default()
        };
        let state = AppState::init(config).unwrap();
        (state.clone(), build_app(state))
    }

    fn cookie_of(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_with(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn login_request(cookie: Option<&str>, password: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::REFERER, "/login");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
            .body(Body::from(format!("email=ana%40example.org&password={password}")))
            .unwrap()
    }

    fn session_id(cookie: &str) -> &str {
        cookie.trim_start_matches("estrado_session=")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_, app) = app().await;
        let response = app.oneshot(get_with("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn guarded_route_redirects_to_login_with_flash() {
        let (_, app) = app().await;
        let response = app
            .clone()
            .oneshot(get_with("/events/create", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let cookie = cookie_of(&response);

        let page = app.oneshot(get_with("/login", Some(&cookie))).await.unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert!(body_text(page).await.contains("Debes iniciar sesión para continuar"));
    }

    #[tokio::test]
    async fn cookieless_page_views_store_no_sessions() {
        let (state, app) = app().await;
        for _ in 0..200 {
            let response = app.clone().oneshot(get_with("/login", None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }
        let events = app.oneshot(get_with("/events", None)).await.unwrap();
        assert!(body_text(events).await.contains("RustConf"));
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn login_rotates_session_id_then_guarded_route_renders() {
        let (state, app) = app().await;
        let guarded = app
            .clone()
            .oneshot(get_with("/events/create", None))
            .await
            .unwrap();
        let before = cookie_of(&guarded);

        let login = app
            .clone()
            .oneshot(login_request(Some(&before), "secret"))
            .await
            .unwrap();
        assert_eq!(login.headers()[header::LOCATION], "/events");
        let after = cookie_of(&login);
        assert_ne!(after, before);
        assert!(!state.sessions.exists(session_id(&before)));
        assert_eq!(
            state.sessions.credentials(session_id(&after)).0.as_deref(),
            Some("tok-9")
        );

        let create = app
            .clone()
            .oneshot(get_with("/events/create", Some(&after)))
            .await
            .unwrap();
        assert_eq!(create.status(), StatusCode::OK);

        let stale = app
            .oneshot(get_with("/events/create", Some(&before)))
            .await
            .unwrap();
        assert_eq!(stale.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn logout_rotates_session_id() {
        let (state, app) = app().await;
        let id = state.sessions.start();
        state.sessions.authenticate(&id, "tok".into(), None);

        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, format!("estrado_session={id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/events");

        let cookie = cookie_of(&response);
        let new_id = session_id(&cookie);
        assert_ne!(new_id, id);
        assert!(!state.sessions.exists(&id));
        assert_eq!(state.sessions.credentials(new_id), (None, None));
        assert!(state.sessions.load(new_id).flashed.flash.unwrap().is_success());
    }

    #[tokio::test]
    async fn failed_login_goes_back_with_email() {
        let (_, app) = app().await;
        let login = app.clone().oneshot(login_request(None, "wrong")).await.unwrap();
        assert_eq!(login.headers()[header::LOCATION], "/login");
        let cookie = cookie_of(&login);

        let page = body_text(app.oneshot(get_with("/login", Some(&cookie))).await.unwrap()).await;
        assert!(page.contains("Credenciales inválidas"));
        assert!(page.contains("ana@example.org"));
    }

    #[tokio::test]
    async fn method_override_reaches_delete_handler() {
        let (state, app) = app().await;
        let id = state.sessions.start();
        state.sessions.authenticate(&id, "tok".into(), None);

        let request = Request::builder()
            .method("POST")
            .uri("/events/1?_method=DELETE")
            .header(header::COOKIE, format!("estrado_session={id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/events");
        assert!(
            state
                .sessions
                .load(&id)
                .flashed
                .flash
                .unwrap()
                .is_success()
        );
    }
}
