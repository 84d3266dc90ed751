//! Form field descriptors and submitted-form access.
//!
//! The host platform renders forms and posts submissions back; this crate
//! only describes which fields to render ([`FieldSpec`]) and reads the
//! values that come back ([`FormData`]). Submitted text passes through
//! [`sanitize_text`] before it is stored, mirroring the host's own
//! text-field sanitizer.

use std::collections::HashMap;

use serde::Serialize;

/// A single text field the host should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name in the submitted form; doubles as the metadata key.
    pub id: &'static str,
    /// User-visible label.
    pub label: &'static str,
    /// Current value to prefill.
    pub value: String,
    /// Input placeholder, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Help text shown next to the field, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// Submitted form parameters, keyed by field id.
///
/// A field can be present with an empty value (the user cleared the input)
/// or absent entirely (the form never carried it); save callbacks
/// distinguish the two.
#[derive(Debug, Clone, Default)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    /// Create an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a submitted value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Get a submitted value; `None` if the field was not part of the form.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for FormData {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Clean a submitted text value the way the host's text-field sanitizer
/// does: drop tags and control characters, collapse whitespace runs, trim.
///
/// This is generic form hygiene, not phone validation - phone values are
/// otherwise stored exactly as typed.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        if in_tag {
            if c == '>' {
                in_tag = false;
            }
        } else if c == '<' {
            in_tag = true;
        } else if c.is_control() {
            cleaned.push(' ');
        } else {
            cleaned.push(c);
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
