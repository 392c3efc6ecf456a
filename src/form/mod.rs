pub mod fields;
pub mod input;
pub mod validation;

pub use fields::{Field, FieldKind, Section};
pub use input::form_from_json;
pub use validation::{validate, FieldErrors, RawForm};

use crate::models::{Flag, PropertyAttributes};
use tracing::debug;

/// What a submission attempt produced
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A request is already in flight; nothing was validated or emitted
    Blocked,
    /// At least one field failed; the errors are attached to the form
    Invalid(FieldErrors),
    /// Every field passed; hand this payload to the orchestrator
    Ready(PropertyAttributes),
}

/// Property form state: raw input plus the errors of the last submission
#[derive(Debug, Clone, Default)]
pub struct PropertyForm {
    raw: RawForm,
    errors: FieldErrors,
}

impl PropertyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &RawForm {
        &self.raw
    }

    /// Errors from the last submission that the user has not edited away yet
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Edit a field. A pending error on that field is cleared.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), String> {
        self.raw.set(field, value)?;
        self.errors.clear_field(field);
        Ok(())
    }

    pub fn toggle(&mut self, field: Field) -> Option<Flag> {
        let flag = self.raw.toggle(field)?;
        self.errors.clear_field(field);
        Some(flag)
    }

    /// Validate everything and emit the payload only if it all passes.
    ///
    /// `loading` is the orchestrator's in-flight flag; while it is set the
    /// submit control is disabled and the attempt is a no-op.
    pub fn submit(&mut self, loading: bool) -> SubmitOutcome {
        if loading {
            debug!("Submit ignored, a prediction is already in flight");
            return SubmitOutcome::Blocked;
        }

        match validate(&self.raw) {
            Ok(attrs) => {
                self.errors = FieldErrors::default();
                SubmitOutcome::Ready(attrs)
            }
            Err(errors) => {
                debug!("Form blocked by {} invalid field(s): {}", errors.len(), errors);
                self.errors = errors.clone();
                SubmitOutcome::Invalid(errors)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_emits_payload_when_valid() {
        let mut form = PropertyForm::new();
        match form.submit(false) {
            SubmitOutcome::Ready(attrs) => assert_eq!(attrs.bedrooms, 3),
            other => panic!("expected Ready, got {:?}", other),
        }
        assert!(form.errors().is_empty());
    }

    #[test]
    fn submit_is_blocked_while_loading() {
        let mut form = PropertyForm::new();
        form.set(Field::Bedrooms, "99").unwrap();
        assert_eq!(form.submit(true), SubmitOutcome::Blocked);
        // Nothing was validated, so no errors were attached
        assert!(form.errors().is_empty());
    }

    #[test]
    fn invalid_submit_keeps_field_errors_until_edited() {
        let mut form = PropertyForm::new();
        form.set(Field::Bathrooms, "9").unwrap();
        form.set(Field::Stories, "0").unwrap();

        let outcome = form.submit(false);
        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.len() == 2));
        assert!(form.errors().get(Field::Bathrooms).is_some());

        form.set(Field::Bathrooms, "2").unwrap();
        assert!(form.errors().get(Field::Bathrooms).is_none());
        assert!(form.errors().get(Field::Stories).is_some());

        form.set(Field::Stories, "1").unwrap();
        assert!(matches!(form.submit(false), SubmitOutcome::Ready(_)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = PropertyForm::new();
        form.toggle(Field::GuestRoom);
        form.set(Field::Area, "x").unwrap();
        let _ = form.submit(false);
        form.reset();
        assert_eq!(form.raw(), &RawForm::default());
        assert!(form.errors().is_empty());
    }
}
