//! Event pages, event administration, and event registration.

use serde_json::Value;
use tracing::{info, warn};

use estrado_types::payload::{Payload, number_field, scalar_to_string};
use estrado_types::session::RequestContext;

use crate::endpoint::Endpoint;
use crate::form::EventForm;
use crate::outcome::{Outcome, Route, View};
use crate::payload::event_payload;
use crate::service::{ErrorDisclosure, Submission, fetch, submit};
use crate::upstream::UpstreamApi;

const CREATED: &str = "Evento creado exitosamente";
const CREATE_FAILED: &str = "No se pudo crear el evento";
const UPDATED: &str = "Evento actualizado exitosamente";
const UPDATE_FAILED: &str = "No se pudo actualizar el evento";
const DELETED: &str = "Evento eliminado exitosamente";
const DELETE_FAILED: &str = "No se pudo eliminar el evento";
const NOT_FOUND: &str = "El evento no se ha encontrado";
const AVAILABILITY_FAILED: &str = "No se pudo verificar la disponibilidad del evento";
const NO_SLOTS: &str = "No hay plazas disponibles para este evento";
const LOGIN_REQUIRED: &str = "Debes iniciar sesión para registrarte";
const REGISTER_FAILED: &str = "No se pudo completar el registro";
const REGISTERED: &str = "Registro completado con éxito";
const REGISTRATION_NOT_FOUND: &str = "No se encontró el registro del evento";
const CANCELLED: &str = "Registro cancelado con éxito";
const CANCEL_FAILED: &str = "No se pudo cancelar el registro";

/// Controller for `/events` and `/registrations`.
pub struct EventService<A: UpstreamApi> {
    api: A,
    disclosure: ErrorDisclosure,
}

/// Open places left, a missing or non-numeric count meaning none.
fn has_open_slots(availability: &Payload) -> bool {
    number_field(availability, "available_slots").is_some_and(|slots| slots > 0.0)
}

impl<A: UpstreamApi> EventService<A> {
    pub fn new(api: A, disclosure: ErrorDisclosure) -> Self {
        Self { api, disclosure }
    }

    /// List events. Renders even when the upstream returned nothing.
    pub async fn index(&self, ctx: &RequestContext) -> Outcome {
        let events = fetch(&self.api, ctx, Endpoint::EventList)
            .await
            .unwrap_or(Value::Null);
        Outcome::Render(View::new("events/index").with("events", events))
    }

    pub async fn create_form(&self, ctx: &RequestContext) -> Outcome {
        let ponentes = fetch(&self.api, ctx, Endpoint::SpeakerOptions)
            .await
            .unwrap_or(Value::Null);
        Outcome::Render(View::new("events/create").with("ponentes", ponentes))
    }

    pub async fn store(&self, ctx: &RequestContext, form: EventForm) -> Outcome {
        if let Err(e) = form.validate() {
            return Outcome::invalid(e.errors, form.old_input());
        }

        let body = event_payload(&form);
        match submit(&self.api, ctx, Endpoint::EventCreate, Some(&body), None).await {
            Submission::Accepted(_) => Outcome::redirect_success(Route::EventsIndex, CREATED),
            Submission::Rejected => Outcome::back_with_input(CREATE_FAILED, form.old_input()),
            Submission::Failed(e) => Outcome::back_with_input(
                self.disclosure.message(CREATE_FAILED, &e),
                form.old_input(),
            ),
        }
    }

    pub async fn show(&self, ctx: &RequestContext, id: &str) -> Outcome {
        let event = fetch(&self.api, ctx, Endpoint::EventShow(id))
            .await
            .unwrap_or(Value::Null);
        Outcome::Render(View::new("events/show").with("event", event).with("id", id.into()))
    }

    pub async fn edit(&self, ctx: &RequestContext, id: &str) -> Outcome {
        let event = fetch(&self.api, ctx, Endpoint::EventShow(id))
            .await
            .unwrap_or(Value::Null);
        let ponentes = fetch(&self.api, ctx, Endpoint::SpeakerOptions)
            .await
            .unwrap_or(Value::Null);
        Outcome::Render(
            View::new("events/edit")
                .with("event", event)
                .with("ponentes", ponentes)
                .with("id", id.into()),
        )
    }

    pub async fn update(&self, ctx: &RequestContext, id: &str, form: EventForm) -> Outcome {
        if let Err(e) = form.validate() {
            return Outcome::invalid(e.errors, form.old_input());
        }

        let body = event_payload(&form);
        match submit(&self.api, ctx, Endpoint::EventUpdate(id), Some(&body), None).await {
            Submission::Accepted(_) => {
                Outcome::redirect_success(Route::EventsShow(id.to_string()), UPDATED)
            }
            Submission::Rejected => Outcome::back_with_input(UPDATE_FAILED, form.old_input()),
            Submission::Failed(e) => Outcome::back_with_input(
                self.disclosure.message(UPDATE_FAILED, &e),
                form.old_input(),
            ),
        }
    }

    pub async fn destroy(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match submit(&self.api, ctx, Endpoint::EventDelete(id), None, None).await {
            Submission::Accepted(_) => Outcome::redirect_success(Route::EventsIndex, DELETED),
            Submission::Rejected => Outcome::back_with_error(DELETE_FAILED),
            Submission::Failed(e) => Outcome::back_with_error(self.disclosure.message(DELETE_FAILED, &e)),
        }
    }

    /// Registration confirmation page: the event must exist and have places.
    pub async fn registration_form(&self, ctx: &RequestContext, id: &str) -> Outcome {
        let Some(event) = fetch(&self.api, ctx, Endpoint::EventShow(id)).await else {
            return Outcome::redirect_error(Route::EventsIndex, NOT_FOUND);
        };

        let Some(availability) = fetch(&self.api, ctx, Endpoint::EventAvailability(id)).await else {
            return Outcome::redirect_error(Route::EventsIndex, AVAILABILITY_FAILED);
        };

        if !has_open_slots(&availability) {
            return Outcome::redirect_error(Route::EventsShow(id.to_string()), NO_SLOTS);
        }

        Outcome::Render(
            View::new("events/register")
                .with("event", event)
                .with("availability", availability)
                .with("id", id.into()),
        )
    }

    /// Register the session user for an event.
    ///
    /// Checks run in order: availability fetch, open places, session user.
    /// No registration call is made unless all three pass.
    pub async fn register(&self, ctx: &RequestContext, id: &str) -> Outcome {
        let event_page = Route::EventsShow(id.to_string());

        let Some(availability) = fetch(&self.api, ctx, Endpoint::EventAvailability(id)).await else {
            return Outcome::redirect_error(event_page, AVAILABILITY_FAILED);
        };

        if !has_open_slots(&availability) {
            return Outcome::redirect_error(event_page, NO_SLOTS);
        }

        let Some(user) = &ctx.user else {
            return Outcome::redirect_error(event_page, LOGIN_REQUIRED);
        };

        let body = serde_json::json!({ "user_id": user.id });
        match submit(&self.api, ctx, Endpoint::EventRegister(id), Some(&body), None).await {
            Submission::Accepted(response) => {
                let event_id = response
                    .get("event_id")
                    .and_then(scalar_to_string)
                    .unwrap_or_else(|| id.to_string());
                info!(event_id = %event_id, user_id = %user.id, "Registered for event");
                Outcome::redirect_success(Route::RegistrationSuccess(event_id), REGISTERED)
            }
            Submission::Rejected => Outcome::redirect_error(event_page, REGISTER_FAILED),
            Submission::Failed(e) => {
                Outcome::redirect_error(event_page, self.disclosure.message(REGISTER_FAILED, &e))
            }
        }
    }

    pub async fn registration_success(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::EventRegistration(id)).await {
            Some(registration) => Outcome::Render(
                View::new("events/registration-success").with("registration", registration),
            ),
            None => Outcome::redirect_error(Route::EventsIndex, REGISTRATION_NOT_FOUND),
        }
    }

    pub async fn cancel_registration(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match submit(&self.api, ctx, Endpoint::RegistrationCancel(id), None, None).await {
            Submission::Accepted(_) => Outcome::redirect_success(Route::EventsIndex, CANCELLED),
            Submission::Rejected => Outcome::back_with_error(CANCEL_FAILED),
            Submission::Failed(e) => {
                warn!(registration_id = id, "Registration cancel failed");
                Outcome::back_with_error(self.disclosure.message(CANCEL_FAILED, &e))
            }
        }
    }
}
