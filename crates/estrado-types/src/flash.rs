//! Flash messages and re-populated form input.
//!
//! A flash lives for exactly one request after the one that set it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Previously submitted form fields, keyed by field name.
pub type OldInput = BTreeMap<String, String>;

/// Validation messages, keyed by field name.
pub type FormErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl fmt::Display for FlashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashKind::Success => write!(f, "success"),
            FlashKind::Error => write!(f, "error"),
        }
    }
}

/// A one-shot status message shown after a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == FlashKind::Success
    }
}

/// Everything carried over to the next request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashBag {
    pub flash: Option<Flash>,
    #[serde(default)]
    pub old_input: OldInput,
    #[serde(default)]
    pub errors: FormErrors,
}

impl FlashBag {
    pub fn is_empty(&self) -> bool {
        self.flash.is_none() && self.old_input.is_empty() && self.errors.is_empty()
    }
}
