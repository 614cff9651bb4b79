//! Login, logout, and email verification.

use serde_json::Value;
use tracing::{error, info};

use estrado_types::session::{RequestContext, SessionUser};

use crate::endpoint::{Endpoint, dispatch};
use crate::form::{LoginForm, filled};
use crate::outcome::{Outcome, Route, View};
use crate::service::{Submission, submit};
use crate::upstream::UpstreamApi;

pub const VERIFY_FALLBACK_MESSAGE: &str = "Hubo un problema al verificar tu correo electrónico. Por favor, intenta nuevamente o contacta a soporte.";
const LOGGED_IN: &str = "Sesión iniciada correctamente";
const LOGIN_FAILED: &str = "Credenciales inválidas";
const LOGGED_OUT: &str = "Sesión cerrada";
pub const LOGIN_REQUIRED: &str = "Debes iniciar sesión para continuar";

/// Credentials handed back by a successful login, to be stored in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGrant {
    pub token: String,
    pub user: Option<SessionUser>,
}

/// Result of a login attempt: what to show, and what to keep.
#[derive(Debug)]
pub struct LoginResult {
    pub outcome: Outcome,
    pub grant: Option<SessionGrant>,
}

pub struct AuthService<A: UpstreamApi> {
    api: A,
}

impl<A: UpstreamApi> AuthService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Confirm an email address. Never fails: upstream errors render the
    /// page with `success = false` and a fixed message.
    pub async fn verify_email(&self, ctx: &RequestContext, token: &str) -> Outcome {
        let body = serde_json::json!({ "token": token });
        let view = View::new("auth/verify-email");

        match dispatch(&self.api, ctx, Endpoint::VerifyEmail, Some(&body), None).await {
            Ok(response) => {
                let success = Endpoint::VerifyEmail.success_rule().accepts(&response);
                let message = response.get("message").cloned().unwrap_or(Value::Null);
                Outcome::Render(view.with("success", success.into()).with("message", message))
            }
            Err(e) => {
                error!(error = %e, token, "Email verification failed");
                Outcome::Render(
                    view.with("success", false.into())
                        .with("message", VERIFY_FALLBACK_MESSAGE.into()),
                )
            }
        }
    }

    pub fn login_form(&self) -> Outcome {
        Outcome::Render(View::new("auth/login"))
    }

    /// Exchange credentials for an upstream token.
    pub async fn login(&self, ctx: &RequestContext, form: LoginForm) -> LoginResult {
        if let Err(e) = form.validate() {
            return LoginResult {
                outcome: Outcome::invalid(e.errors, form.old_input()),
                grant: None,
            };
        }

        let body = serde_json::json!({
            "email": filled(&form.email),
            "password": form.password,
        });

        match submit(&self.api, ctx, Endpoint::Login, Some(&body), None).await {
            Submission::Accepted(response) => {
                let token = response
                    .get("token")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let user = response
                    .get("user")
                    .cloned()
                    .and_then(|u| serde_json::from_value::<SessionUser>(u).ok());
                info!(user = ?user.as_ref().map(|u| &u.id), "Login accepted");
                LoginResult {
                    outcome: Outcome::redirect_success(Route::EventsIndex, LOGGED_IN),
                    grant: Some(SessionGrant { token, user }),
                }
            }
            Submission::Rejected | Submission::Failed(_) => LoginResult {
                outcome: Outcome::back_with_input(LOGIN_FAILED, form.old_input()),
                grant: None,
            },
        }
    }

    pub fn logout(&self) -> Outcome {
        Outcome::redirect_success(Route::EventsIndex, LOGGED_OUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Method;
    use crate::testing::StubApi;
    use estrado_types::error::UpstreamError;
    use serde_json::json;

    #[tokio::test]
    async fn test_verify_email_success() {
        let api = StubApi::new().respond(
            Method::Post,
            "/v1/verify-email",
            json!({"success": true, "message": "Correo verificado"}),
        );
        let svc = AuthService::new(api);
        let outcome = svc.verify_email(&RequestContext::anonymous(), "abc").await;
        let view = outcome.view().unwrap();
        assert_eq!(view.template, "auth/verify-email");
        assert_eq!(view.get("success"), Some(&json!(true)));
        assert_eq!(view.get("message"), Some(&json!("Correo verificado")));
        assert_eq!(svc.api.calls()[0].body, Some(json!({"token": "abc"})));
    }

    #[tokio::test]
    async fn test_verify_email_without_flag() {
        let api = StubApi::new().respond(Method::Post, "/v1/verify-email", json!({"error": "x"}));
        let outcome = AuthService::new(api)
            .verify_email(&RequestContext::anonymous(), "abc")
            .await;
        let view = outcome.view().unwrap();
        assert_eq!(view.get("success"), Some(&json!(false)));
        assert_eq!(view.get("message"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_verify_email_error_renders_fallback() {
        let api = StubApi::new().fail(
            Method::Post,
            "/v1/verify-email",
            UpstreamError::Status {
                status: 410,
                message: "Token expirado".into(),
            },
        );
        let outcome = AuthService::new(api)
            .verify_email(&RequestContext::anonymous(), "abc")
            .await;
        let view = outcome.view().expect("always renders");
        assert_eq!(view.get("success"), Some(&json!(false)));
        assert_eq!(view.get("message"), Some(&json!(VERIFY_FALLBACK_MESSAGE)));
    }

    #[tokio::test]
    async fn test_login_grants_session() {
        let api = StubApi::new().respond(
            Method::Post,
            "/login",
            json!({"token": "t-1", "user": {"id": 42, "name": "Ana"}}),
        );
        let svc = AuthService::new(api);
        let form = LoginForm {
            email: Some(" ana@example.org ".into()),
            password: Some("secreto".into()),
        };
        let result = svc.login(&RequestContext::anonymous(), form).await;
        assert!(result.outcome.is_redirect_to(&Route::EventsIndex));
        let grant = result.grant.unwrap();
        assert_eq!(grant.token, "t-1");
        assert_eq!(grant.user.unwrap().id, json!(42));
        assert_eq!(
            svc.api.calls()[0].body.as_ref().unwrap()["email"],
            "ana@example.org"
        );
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let api = StubApi::new().fail(
            Method::Post,
            "/login",
            UpstreamError::Status {
                status: 401,
                message: "Unauthorized".into(),
            },
        );
        let form = LoginForm {
            email: Some("ana@example.org".into()),
            password: Some("mal".into()),
        };
        let result = AuthService::new(api).login(&RequestContext::anonymous(), form).await;
        assert!(result.grant.is_none());
        let Outcome::Back(bag) = result.outcome else {
            panic!("expected back");
        };
        assert_eq!(bag.flash.unwrap().message, LOGIN_FAILED);
        assert_eq!(bag.old_input["email"], "ana@example.org");
        assert!(!bag.old_input.contains_key("password"));
    }

    #[tokio::test]
    async fn test_login_validation() {
        let svc = AuthService::new(StubApi::new());
        let result = svc.login(&RequestContext::anonymous(), LoginForm::default()).await;
        assert!(result.grant.is_none());
        assert!(svc.api.calls().is_empty());
    }
}
