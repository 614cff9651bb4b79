//! Admin speaker management: list, show, create, edit, delete, export.

use std::path::PathBuf;

use tracing::info;

use estrado_types::session::RequestContext;

use crate::endpoint::Endpoint;
use crate::form::SpeakerForm;
use crate::outcome::{Outcome, Route, View};
use crate::payload::speaker_payload;
use crate::service::{ErrorDisclosure, Submission, fetch, submit};
use crate::upstream::UpstreamApi;

const LIST_FAILED: &str = "No se pudieron cargar los ponentes";
const LOAD_FAILED: &str = "No se pudo cargar el ponente";
const CREATED: &str = "Ponente creado exitosamente";
const CREATE_FAILED: &str = "Error al crear el ponente";
const UPDATED: &str = "Ponente actualizado exitosamente";
const UPDATE_FAILED: &str = "Error al actualizar el ponente";
const DELETED: &str = "Ponente eliminado exitosamente";
const DELETE_FAILED: &str = "Error al eliminar el ponente";
const EXPORT_FAILED: &str = "Error al exportar los datos de los ponentes";

/// Controller for `/admin/speakers`.
pub struct SpeakerAdminService<A: UpstreamApi> {
    api: A,
    disclosure: ErrorDisclosure,
}

impl<A: UpstreamApi> SpeakerAdminService<A> {
    pub fn new(api: A, disclosure: ErrorDisclosure) -> Self {
        Self { api, disclosure }
    }

    /// List speakers (the upstream wraps them under `speakers`).
    pub async fn index(&self, ctx: &RequestContext) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::AdminSpeakerList).await {
            Some(ponentes) => {
                Outcome::Render(View::new("admin/speakers/index").with("ponentes", ponentes))
            }
            None => Outcome::back_with_error(LIST_FAILED),
        }
    }

    pub fn create_form(&self) -> Outcome {
        Outcome::Render(View::new("admin/speakers/create"))
    }

    /// Create a speaker, uploading the photo as multipart when present.
    pub async fn store(&self, ctx: &RequestContext, form: SpeakerForm) -> Outcome {
        info!(
            name = ?form.name,
            expertise_areas = ?form.expertise_areas,
            has_file = form.photo.is_some(),
            file = ?form.photo,
            "Speaker store received"
        );

        if let Err(e) = form.validate() {
            return Outcome::invalid(e.errors, form.old_input());
        }

        let body = speaker_payload(&form);
        match submit(&self.api, ctx, Endpoint::SpeakerCreate, Some(&body), form.photo.as_ref()).await {
            Submission::Accepted(response) => {
                info!(response = %response, "Speaker created");
                Outcome::redirect_success(Route::AdminSpeakersIndex, CREATED)
            }
            Submission::Rejected => Outcome::back_with_input(CREATE_FAILED, form.old_input()),
            Submission::Failed(e) => Outcome::back_with_input(
                self.disclosure.message(CREATE_FAILED, &e),
                form.old_input(),
            ),
        }
    }

    /// Show a speaker. The whole response goes to the view unchanged.
    pub async fn show(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::AdminSpeakerShow(id)).await {
            Some(ponente) => Outcome::Render(View::new("admin/speakers/show").with("ponente", ponente)),
            None => Outcome::back_with_error(LOAD_FAILED),
        }
    }

    /// Edit form. Here the upstream response is unwrapped from `speaker`.
    pub async fn edit(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::AdminSpeakerEdit(id)).await {
            Some(ponente) => Outcome::Render(
                View::new("admin/speakers/edit")
                    .with("ponente", ponente)
                    .with("id", id.into()),
            ),
            None => Outcome::back_with_error(LOAD_FAILED),
        }
    }

    pub async fn update(&self, ctx: &RequestContext, id: &str, form: SpeakerForm) -> Outcome {
        info!(
            speaker_id = id,
            name = ?form.name,
            expertise_areas = ?form.expertise_areas,
            has_file = form.photo.is_some(),
            file = ?form.photo,
            "Speaker update received"
        );

        if let Err(e) = form.validate() {
            return Outcome::invalid(e.errors, form.old_input());
        }

        let body = speaker_payload(&form);
        match submit(&self.api, ctx, Endpoint::SpeakerUpdate(id), Some(&body), form.photo.as_ref()).await {
            Submission::Accepted(response) => {
                info!(speaker_id = id, response = %response, "Speaker updated");
                Outcome::redirect_success(Route::AdminSpeakersIndex, UPDATED)
            }
            Submission::Rejected => Outcome::back_with_input(UPDATE_FAILED, form.old_input()),
            Submission::Failed(e) => Outcome::back_with_input(
                self.disclosure.message(UPDATE_FAILED, &e),
                form.old_input(),
            ),
        }
    }

    pub async fn destroy(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match submit(&self.api, ctx, Endpoint::SpeakerDelete(id), None, None).await {
            Submission::Accepted(_) => Outcome::redirect_success(Route::AdminSpeakersIndex, DELETED),
            Submission::Rejected => Outcome::back_with_error(DELETE_FAILED),
            Submission::Failed(e) => Outcome::back_with_error(self.disclosure.message(DELETE_FAILED, &e)),
        }
    }

    /// Download the export file the upstream reports in `file_path`.
    pub async fn export(&self, ctx: &RequestContext) -> Outcome {
        let file_path = fetch(&self.api, ctx, Endpoint::SpeakerExport).await;
        match file_path.as_ref().and_then(|p| p.as_str()) {
            Some(path) if !path.is_empty() => Outcome::Download {
                path: PathBuf::from(path),
            },
            _ => Outcome::back_with_error(EXPORT_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Method, SPEAKER_UPDATED_MESSAGE};
    use crate::form::PHOTO_FIELD;
    use crate::testing::{Call, StubApi};
    use estrado_types::error::UpstreamError;
    use estrado_types::upload::UploadedFile;
    use serde_json::json;

    fn service(api: StubApi) -> SpeakerAdminService<StubApi> {
        SpeakerAdminService::new(api, ErrorDisclosure::Detailed)
    }

    fn ctx() -> RequestContext {
        RequestContext::authenticated("tok", None)
    }

    fn form(areas: Option<&str>) -> SpeakerForm {
        SpeakerForm {
            name: Some("Ana Torres".into()),
            social_links: Some("https://mastodon.social/@ana".into()),
            expertise_areas: areas.map(str::to_string),
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_index_unwraps_speakers_key() {
        let api = StubApi::new().respond(
            Method::Get,
            "/speakers",
            json!({"speakers": [{"id": 1, "name": "Ana"}]}),
        );
        let svc = service(api);
        let outcome = svc.index(&ctx()).await;
        let view = outcome.view().expect("renders");
        assert_eq!(view.template, "admin/speakers/index");
        assert_eq!(view.get("ponentes"), Some(&json!([{"id": 1, "name": "Ana"}])));
    }

    #[tokio::test]
    async fn test_index_empty_goes_back_with_error() {
        let svc = service(StubApi::new().respond(Method::Get, "/speakers", json!({})));
        let outcome = svc.index(&ctx()).await;
        assert!(matches!(outcome, Outcome::Back(_)));
        assert_eq!(outcome.flash().unwrap().message, LIST_FAILED);
    }

    #[tokio::test]
    async fn test_index_upstream_error_treated_as_empty() {
        let api = StubApi::new().fail(
            Method::Get,
            "/speakers",
            UpstreamError::Transport("timeout".into()),
        );
        let outcome = service(api).index(&ctx()).await;
        assert_eq!(outcome.flash().unwrap().message, LIST_FAILED);
    }

    #[tokio::test]
    async fn test_store_success_redirects() {
        let api = StubApi::new().respond(Method::Post, "/speakers", json!({"data_count": 1}));
        let svc = service(api);
        let outcome = svc.store(&ctx(), form(Some("a, b ,c"))).await;

        assert!(outcome.is_redirect_to(&Route::AdminSpeakersIndex));
        assert_eq!(outcome.flash().unwrap().message, CREATED);

        let calls = svc.api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call, Call::Post);
        assert!(calls[0].had_token);
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["expertise_areas"], json!(["a", "b", "c"]));
    }

    #[tokio::test]
    async fn test_store_without_areas_omits_key() {
        let api = StubApi::new().respond(Method::Post, "/speakers", json!({"data_count": 1}));
        let svc = service(api);
        svc.store(&ctx(), form(None)).await;
        let body = svc.api.calls()[0].body.clone().unwrap();
        assert!(body.get("expertise_areas").is_none());
        assert_eq!(body["name"], "Ana Torres");
    }

    #[tokio::test]
    async fn test_store_with_photo_uses_multipart() {
        let api = StubApi::new().respond(Method::Post, "/speakers", json!({"data_count": 1}));
        let svc = service(api);
        let mut input = form(None);
        input.photo = Some(UploadedFile::new(PHOTO_FIELD, "ana.jpg", "image/jpeg", vec![1; 64]));
        let outcome = svc.store(&ctx(), input).await;

        assert!(outcome.is_redirect_to(&Route::AdminSpeakersIndex));
        let calls = svc.api.calls();
        assert_eq!(calls[0].call, Call::PostWithFile);
        assert_eq!(calls[0].file.as_deref(), Some("ana.jpg"));
    }

    #[tokio::test]
    async fn test_store_rejected_goes_back_with_input() {
        let api = StubApi::new().respond(Method::Post, "/speakers", json!({"data_count": 0}));
        let outcome = service(api).store(&ctx(), form(Some("rust"))).await;
        let Outcome::Back(bag) = outcome else {
            panic!("expected back");
        };
        assert_eq!(bag.flash.unwrap().message, CREATE_FAILED);
        assert_eq!(bag.old_input["name"], "Ana Torres");
        assert_eq!(bag.old_input["expertise_areas"], "rust");
    }

    #[tokio::test]
    async fn test_store_failure_flash_contains_error() {
        let err = UpstreamError::Status {
            status: 500,
            message: "Server Error".into(),
        };
        let expected = err.to_string();
        let api = StubApi::new().fail(Method::Post, "/speakers", err);
        let outcome = service(api).store(&ctx(), form(None)).await;
        let Outcome::Back(bag) = outcome else {
            panic!("expected back");
        };
        let message = bag.flash.unwrap().message;
        assert!(message.starts_with("Error al crear el ponente: "));
        assert!(message.contains(&expected));
        assert_eq!(bag.old_input["social_links"], "https://mastodon.social/@ana");
    }

    #[tokio::test]
    async fn test_store_generic_disclosure_hides_detail() {
        let api = StubApi::new().fail(
            Method::Post,
            "/speakers",
            UpstreamError::Transport("10.0.0.4:3050 refused".into()),
        );
        let svc = SpeakerAdminService::new(api, ErrorDisclosure::Generic);
        let outcome = svc.store(&ctx(), form(None)).await;
        assert_eq!(outcome.flash().unwrap().message, CREATE_FAILED);
    }

    #[tokio::test]
    async fn test_store_invalid_skips_upstream() {
        let svc = service(StubApi::new());
        let outcome = svc
            .store(
                &ctx(),
                SpeakerForm {
                    name: None,
                    expertise_areas: Some("rust".into()),
                    ..Default::default()
                },
            )
            .await;
        let Outcome::Back(bag) = outcome else {
            panic!("expected back");
        };
        assert!(bag.flash.is_none());
        assert!(bag.errors.contains_key("name"));
        assert_eq!(bag.old_input["expertise_areas"], "rust");
        assert!(svc.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_show_passes_root_payload() {
        let payload = json!({"speaker": {"id": 4, "name": "Luis"}});
        let api = StubApi::new().respond(Method::Get, "/speakers/4", payload.clone());
        let outcome = service(api).show(&ctx(), "4").await;
        assert_eq!(outcome.view().unwrap().get("ponente"), Some(&payload));
    }

    #[tokio::test]
    async fn test_edit_requires_speaker_key() {
        let api = StubApi::new()
            .respond(Method::Get, "/speakers/4", json!({"speaker": {"id": 4}}))
            .respond(Method::Get, "/speakers/4", json!({"id": 4}));
        let svc = service(api);

        let outcome = svc.edit(&ctx(), "4").await;
        let view = outcome.view().unwrap();
        assert_eq!(view.template, "admin/speakers/edit");
        assert_eq!(view.get("ponente"), Some(&json!({"id": 4})));

        let outcome = svc.edit(&ctx(), "4").await;
        assert_eq!(outcome.flash().unwrap().message, LOAD_FAILED);
    }

    #[tokio::test]
    async fn test_update_success_requires_exact_message() {
        let api = StubApi::new()
            .respond(Method::Put, "/speakers/4", json!({"message": SPEAKER_UPDATED_MESSAGE}))
            .respond(Method::Put, "/speakers/4", json!({"message": "ok"}));
        let svc = service(api);

        let outcome = svc.update(&ctx(), "4", form(None)).await;
        assert!(outcome.is_redirect_to(&Route::AdminSpeakersIndex));
        assert_eq!(outcome.flash().unwrap().message, UPDATED);

        let outcome = svc.update(&ctx(), "4", form(None)).await;
        assert_eq!(outcome.flash().unwrap().message, UPDATE_FAILED);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_input() {
        let api = StubApi::new().fail(
            Method::Put,
            "/speakers/4",
            UpstreamError::Decode("expected value".into()),
        );
        let outcome = service(api).update(&ctx(), "4", form(Some("a,b"))).await;
        let Outcome::Back(bag) = outcome else {
            panic!("expected back");
        };
        assert!(bag.flash.unwrap().message.contains("expected value"));
        assert_eq!(bag.old_input["expertise_areas"], "a,b");
    }

    #[tokio::test]
    async fn test_update_with_photo_uses_put_with_file() {
        let api = StubApi::new().respond(
            Method::Put,
            "/speakers/4",
            json!({"message": SPEAKER_UPDATED_MESSAGE}),
        );
        let svc = service(api);
        let mut input = form(None);
        input.photo = Some(UploadedFile::new(PHOTO_FIELD, "x.gif", "image/gif", vec![1]));
        svc.update(&ctx(), "4", input).await;
        assert_eq!(svc.api.calls()[0].call, Call::PutWithFile);
    }

    #[tokio::test]
    async fn test_destroy() {
        let api = StubApi::new()
            .respond(Method::Delete, "/speakers/4", json!({"success": true}))
            .respond(Method::Delete, "/speakers/4", json!({"success": false}))
            .fail(Method::Delete, "/speakers/4", UpstreamError::Transport("reset".into()));
        let svc = service(api);

        let outcome = svc.destroy(&ctx(), "4").await;
        assert_eq!(outcome.flash().unwrap().message, DELETED);
        assert!(outcome.is_redirect_to(&Route::AdminSpeakersIndex));

        let outcome = svc.destroy(&ctx(), "4").await;
        assert_eq!(outcome.flash().unwrap().message, DELETE_FAILED);

        let outcome = svc.destroy(&ctx(), "4").await;
        assert!(matches!(outcome, Outcome::Back(_)));
        assert!(outcome.flash().unwrap().message.contains("reset"));
    }

    #[tokio::test]
    async fn test_export() {
        let api = StubApi::new()
            .respond(Method::Get, "/speakers/export", json!({"file_path": "/tmp/ponentes.csv"}))
            .respond(Method::Get, "/speakers/export", json!({"status": "queued"}));
        let svc = service(api);

        assert_eq!(
            svc.export(&ctx()).await,
            Outcome::Download {
                path: PathBuf::from("/tmp/ponentes.csv")
            }
        );
        assert_eq!(svc.export(&ctx()).await.flash().unwrap().message, EXPORT_FAILED);
    }
}
