use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationErrors;

pub static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"));

/// Field-level messages collected from the validator derive plus anything the
/// handler adds itself (uniqueness conflicts). Rendered next to the inputs on
/// the re-rendered form.
#[derive(Debug, Default, Clone)]
pub struct FormErrors {
    by_field: HashMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.by_field
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.by_field.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, errs) in errors.field_errors() {
            let name = field.to_string();
            for e in errs {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "This value is invalid.".to_string());
                out.add(&name, message);
            }
        }
        out
    }
}
