//! Form structs and their validation rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use snipbin_core::validator::{self, Validator};

/// Permitted snippet lifetimes, in days.
const PERMITTED_EXPIRES: [i64; 3] = [1, 7, 365];

/// The snippet creation form.
///
/// Decoded from the request body by axum's `Form` extractor; `field_errors`
/// is filled in by [`SnippetForm::validate`] and rendered back to the user
/// alongside their input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_expires")]
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub field_errors: HashMap<String, String>,
}

impl Default for SnippetForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: default_expires(),
            field_errors: HashMap::new(),
        }
    }
}

fn default_expires() -> i64 {
    365
}

impl SnippetForm {
    /// Runs every field check, records the failures, and reports whether
    /// the form passed.
    pub fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.check_field(
            validator::not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        v.check_field(
            validator::max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(
            validator::not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        v.check_field(
            validator::permitted_value(&self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );

        let valid = v.is_valid();
        self.field_errors = v.field_errors;
        valid
    }
}
