//! Submitted forms and their validation rules.
//!
//! Validation runs before any upstream call. A failure sends the user back
//! with per-field messages and the submitted input; nothing is forwarded.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use estrado_types::error::ValidationError;
use estrado_types::flash::OldInput;
use estrado_types::upload::UploadedFile;

/// Form and upstream field carrying the speaker photo.
pub const PHOTO_FIELD: &str = "photo_url";

/// Largest accepted speaker photo (2048 KB).
pub const MAX_PHOTO_BYTES: usize = 2048 * 1024;

pub const PHOTO_EXTENSIONS: &[&str] = &["jpeg", "png", "jpg", "gif", "webp"];

const PHOTO_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const MAX_NAME_CHARS: usize = 255;

/// Value of a field that was supplied and is not blank.
pub fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(errors: &mut ValidationError, field: &str, label: &str, value: &Option<String>) -> bool {
    if filled(value).is_none() {
        errors.add(field, format!("El campo {label} es obligatorio."));
        return false;
    }
    true
}

fn push_old(old: &mut OldInput, field: &str, value: &Option<String>) {
    if let Some(v) = value {
        old.insert(field.to_string(), v.clone());
    }
}

/// Admin speaker create/update form (multipart).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakerForm {
    pub name: Option<String>,
    pub social_links: Option<String>,
    pub expertise_areas: Option<String>,
    #[serde(skip)]
    pub photo: Option<UploadedFile>,
}

impl SpeakerForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if required(&mut errors, "name", "nombre", &self.name)
            && self.name.as_deref().map_or(0, |n| n.chars().count()) > MAX_NAME_CHARS
        {
            errors.add(
                "name",
                format!("El campo nombre no debe ser mayor que {MAX_NAME_CHARS} caracteres."),
            );
        }

        if let Some(photo) = &self.photo {
            validate_photo(&mut errors, photo);
        }

        errors.into_result()
    }

    /// Text fields to re-populate the form with.
    pub fn old_input(&self) -> OldInput {
        let mut old = OldInput::new();
        push_old(&mut old, "name", &self.name);
        push_old(&mut old, "social_links", &self.social_links);
        push_old(&mut old, "expertise_areas", &self.expertise_areas);
        old
    }
}

fn validate_photo(errors: &mut ValidationError, photo: &UploadedFile) {
    let mime = photo.content_type.to_ascii_lowercase();
    if !PHOTO_MIME_TYPES.contains(&mime.as_str()) {
        errors.add(PHOTO_FIELD, "El campo foto debe ser una imagen.");
    }

    let extension_ok = photo
        .extension()
        .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()));
    if !extension_ok {
        errors.add(
            PHOTO_FIELD,
            format!(
                "El campo foto debe ser un archivo de tipo: {}.",
                PHOTO_EXTENSIONS.join(", ")
            ),
        );
    }

    if photo.len() > MAX_PHOTO_BYTES {
        errors.add(
            PHOTO_FIELD,
            format!(
                "El campo foto no debe ser mayor que {} kilobytes.",
                MAX_PHOTO_BYTES / 1024
            ),
        );
    }
}

/// Event create/update form (urlencoded).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventForm {
    pub titulo: Option<String>,
    pub tipo: Option<String>,
    pub ponente_id: Option<String>,
    pub fecha: Option<String>,
    pub hora_inicio: Option<String>,
    pub hora_fin: Option<String>,
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

impl EventForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        required(&mut errors, "titulo", "título", &self.titulo);
        required(&mut errors, "tipo", "tipo", &self.tipo);

        if required(&mut errors, "ponente_id", "ponente", &self.ponente_id)
            && filled(&self.ponente_id).and_then(|v| v.parse::<i64>().ok()).is_none()
        {
            errors.add("ponente_id", "El campo ponente debe ser un número entero.");
        }

        if required(&mut errors, "fecha", "fecha", &self.fecha)
            && filled(&self.fecha)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
                .is_none()
        {
            errors.add("fecha", "El campo fecha no es una fecha válida.");
        }

        let mut start = None;
        if required(&mut errors, "hora_inicio", "hora de inicio", &self.hora_inicio) {
            start = filled(&self.hora_inicio).and_then(parse_time);
            if start.is_none() {
                errors.add("hora_inicio", "El campo hora de inicio no corresponde con el formato H:i.");
            }
        }

        let mut end = None;
        if required(&mut errors, "hora_fin", "hora de fin", &self.hora_fin) {
            end = filled(&self.hora_fin).and_then(parse_time);
            if end.is_none() {
                errors.add("hora_fin", "El campo hora de fin no corresponde con el formato H:i.");
            }
        }

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.add("hora_fin", "La hora de fin debe ser posterior a la hora de inicio.");
            }
        }

        errors.into_result()
    }

    pub fn old_input(&self) -> OldInput {
        let mut old = OldInput::new();
        push_old(&mut old, "titulo", &self.titulo);
        push_old(&mut old, "tipo", &self.tipo);
        push_old(&mut old, "ponente_id", &self.ponente_id);
        push_old(&mut old, "fecha", &self.fecha);
        push_old(&mut old, "hora_inicio", &self.hora_inicio);
        push_old(&mut old, "hora_fin", &self.hora_fin);
        old
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        required(&mut errors, "email", "correo electrónico", &self.email);
        required(&mut errors, "password", "contraseña", &self.password);
        errors.into_result()
    }

    /// The password is never re-populated.
    pub fn old_input(&self) -> OldInput {
        let mut old = OldInput::new();
        push_old(&mut old, "email", &self.email);
        old
    }
}
