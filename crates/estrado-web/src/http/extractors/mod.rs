//! Request extractors: session, login guard, speaker multipart form.

pub mod session;
pub mod speaker_form;
