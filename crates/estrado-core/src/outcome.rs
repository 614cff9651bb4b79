//! What a controller action decided to do.
//!
//! The web layer maps each variant to an HTTP response: `Render` becomes an
//! HTML page, `Redirect` and `Back` become redirects that leave data in the
//! session for the next request, `Download` streams a local file.

use std::path::PathBuf;

use serde_json::{Map, Value};

use estrado_types::flash::{Flash, FlashBag, FormErrors, OldInput};

/// Named routes of the front-end that actions redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    EventsIndex,
    EventsShow(String),
    RegistrationSuccess(String),
    AdminSpeakersIndex,
    Login,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::EventsIndex => "/events".to_string(),
            Route::EventsShow(id) => format!("/events/{id}"),
            Route::RegistrationSuccess(id) => format!("/events/{id}/register/success"),
            Route::AdminSpeakersIndex => "/admin/speakers".to_string(),
            Route::Login => "/login".to_string(),
        }
    }
}

/// A template name plus the variables it consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub template: &'static str,
    pub context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.context.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(View),
    Redirect { to: Route, flash: Flash },
    /// Return to the previous page, carrying a flash and the submitted input.
    Back(FlashBag),
    Download { path: PathBuf },
}

impl Outcome {
    pub fn redirect_success(to: Route, message: impl Into<String>) -> Self {
        Outcome::Redirect {
            to,
            flash: Flash::success(message),
        }
    }

    pub fn redirect_error(to: Route, message: impl Into<String>) -> Self {
        Outcome::Redirect {
            to,
            flash: Flash::error(message),
        }
    }

    pub fn back_with_error(message: impl Into<String>) -> Self {
        Outcome::Back(FlashBag {
            flash: Some(Flash::error(message)),
            ..Default::default()
        })
    }

    /// Back with an error flash and the submitted fields re-populated.
    pub fn back_with_input(message: impl Into<String>, old_input: OldInput) -> Self {
        Outcome::Back(FlashBag {
            flash: Some(Flash::error(message)),
            old_input,
            errors: FormErrors::new(),
        })
    }

    /// Back after a validation failure: field errors plus the old input, no flash.
    pub fn invalid(errors: FormErrors, old_input: OldInput) -> Self {
        Outcome::Back(FlashBag {
            flash: None,
            old_input,
            errors,
        })
    }

    /// The flash this outcome carries, if any.
    pub fn flash(&self) -> Option<&Flash> {
        match self {
            Outcome::Redirect { flash, .. } => Some(flash),
            Outcome::Back(bag) => bag.flash.as_ref(),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Render(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_redirect_to(&self, route: &Route) -> bool {
        matches!(self, Outcome::Redirect { to, .. } if to == route)
    }
}
