use std::cell::RefCell;
use std::collections::HashMap;

use wslp_types::{FormField, SubmissionInput};

/// The form surface the controller reads on submit and clears on success.
pub trait ReturnForm {
    fn snapshot(&self) -> SubmissionInput;
    fn reset(&self);
}

/// In-memory form keyed by field.
#[derive(Debug, Default)]
pub struct FormState {
    fields: RefCell<HashMap<FormField, String>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &SubmissionInput) -> Self {
        let form = Self::new();
        for field in FormField::ALL {
            form.set(field, input.field(field));
        }
        form
    }

    pub fn set(&self, field: FormField, value: &str) {
        self.fields.borrow_mut().insert(field, value.to_owned());
    }

    pub fn value(&self, field: FormField) -> String {
        self.fields
            .borrow()
            .get(&field)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.borrow().values().all(String::is_empty)
    }
}

impl ReturnForm for FormState {
    fn snapshot(&self) -> SubmissionInput {
        SubmissionInput {
            source_token_address: self.value(FormField::SourceTokenAddress),
            amount: self.value(FormField::Amount),
            destination_address: self.value(FormField::DestinationAddress),
        }
    }

    fn reset(&self) {
        self.fields.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_and_reset() {
        let form = FormState::new();
        assert!(form.is_empty());

        form.set(FormField::Amount, "2.5");
        form.set(FormField::DestinationAddress, "simpleledger:qq");
        assert!(!form.is_empty());

        let input = form.snapshot();
        assert_eq!(input.amount, "2.5");
        assert_eq!(input.source_token_address, "");

        form.reset();
        assert!(form.is_empty());
        assert_eq!(form.snapshot(), SubmissionInput::default());
    }

    #[test]
    fn with_input_fills_every_field() {
        let input = SubmissionInput {
            source_token_address: "0xabc".to_owned(),
            amount: "1".to_owned(),
            destination_address: "simpleledger:qq".to_owned(),
        };
        assert_eq!(FormState::with_input(&input).snapshot(), input);
    }
}
