//! Multipart extraction for the admin speaker forms.

use axum::extract::{FromRequest, Multipart, Request};

use estrado_core::form::{PHOTO_FIELD, SpeakerForm};
use estrado_types::upload::UploadedFile;

use crate::http::error::AppError;
use crate::state::AppState;

/// A [`SpeakerForm`] read from `multipart/form-data`.
///
/// An empty file part (a file input left blank) counts as no photo.
pub struct SpeakerMultipart(pub SpeakerForm);

impl FromRequest<AppState> for SpeakerMultipart {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut form = SpeakerForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == PHOTO_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !bytes.is_empty() {
                    form.photo = Some(UploadedFile::new(
                        PHOTO_FIELD,
                        file_name,
                        content_type,
                        bytes.to_vec(),
                    ));
                }
                continue;
            }

            let slot = match name.as_str() {
                "name" => &mut form.name,
                "social_links" => &mut form.social_links,
                "expertise_areas" => &mut form.expertise_areas,
                _ => continue,
            };
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            *slot = Some(text);
        }

        Ok(Self(form))
    }
}
