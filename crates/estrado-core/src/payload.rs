//! Outgoing request bodies built from validated forms.

use serde_json::{Map, Value, json};

use crate::form::{EventForm, SpeakerForm, filled};

/// Split a comma-separated free-text list, trimming each element.
///
/// Empty elements are kept (`"a,,b"` gives three entries).
pub fn split_expertise_areas(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Body for speaker create/update.
///
/// `social_links` is always sent (null when absent or blank);
/// `expertise_areas` only when it was filled in.
pub fn speaker_payload(form: &SpeakerForm) -> Value {
    let mut body = Map::new();
    body.insert(
        "name".to_string(),
        json!(form.name.as_deref().map(str::trim).unwrap_or_default()),
    );
    body.insert(
        "social_links".to_string(),
        json!(filled(&form.social_links)),
    );

    if filled(&form.expertise_areas).is_some() {
        let raw = form.expertise_areas.as_deref().unwrap_or_default();
        body.insert(
            "expertise_areas".to_string(),
            json!(split_expertise_areas(raw)),
        );
    }

    Value::Object(body)
}

/// Body for event create/update. Fields are forwarded as submitted.
pub fn event_payload(form: &EventForm) -> Value {
    json!({
        "titulo": form.titulo,
        "tipo": form.tipo,
        "ponente_id": form.ponente_id,
        "fecha": form.fecha,
        "hora_inicio": form.hora_inicio,
        "hora_fin": form.hora_fin,
    })
}
